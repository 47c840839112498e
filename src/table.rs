//! Row building and rendering for the classification tables.
//!
//! Rendering targets are deliberately writer-generic: the aligned text table
//! goes into any `fmt::Write` and CSV into any `io::Write`, so the binaries
//! stay thin and the formats stay unit-testable.

use crate::classify::Classification;
use crate::tags::Tag;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::fmt;
use std::io;

#[derive(Clone, Debug, Eq, PartialEq)]
/// One output row: service prefix, permission name, matched tags.
pub struct Row {
    pub service: String,
    pub permission: String,
    pub tags: BTreeSet<Tag>,
}

impl Row {
    /// One boolean per tag, in the fixed column order.
    pub fn flags(&self) -> [bool; Tag::ALL.len()] {
        Tag::ALL.map(|tag| self.tags.contains(&tag))
    }
}

/// Header row shared by the table and CSV outputs.
pub fn table_headers() -> Vec<&'static str> {
    let mut headers = vec!["service", "permission"];
    headers.extend(Tag::ALL.iter().map(|tag| tag.as_str()));
    headers
}

/// One row per (service, permission) pair, in stable order.
pub fn create_permissions_table(classification: &Classification) -> Vec<Row> {
    classification
        .entries()
        .map(|(service, permission, tags)| Row {
            service: service.as_str().to_string(),
            permission: permission.as_str().to_string(),
            tags: tags.clone(),
        })
        .collect()
}

/// The subset of rows where MUTATING or SIDE_EFFECT is set.
///
/// A permission carrying both tags still yields exactly one row.
pub fn create_mutating_table(classification: &Classification) -> Vec<Row> {
    create_permissions_table(classification)
        .into_iter()
        .filter(|row| row.tags.contains(&Tag::Mutating) || row.tags.contains(&Tag::SideEffect))
        .collect()
}

/// Render rows as an aligned text table with a header and separator line.
pub fn render_table(rows: &[Row], writer: &mut impl fmt::Write) -> fmt::Result {
    let headers = table_headers();
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        widths[0] = widths[0].max(row.service.len());
        widths[1] = widths[1].max(row.permission.len());
        for (idx, flag) in row.flags().iter().enumerate() {
            widths[idx + 2] = widths[idx + 2].max(flag.to_string().len());
        }
    }

    write_table_line(writer, &headers, &widths)?;
    let separators: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let separator_refs: Vec<&str> = separators.iter().map(String::as_str).collect();
    write_table_line(writer, &separator_refs, &widths)?;

    for row in rows {
        let flags = row.flags().map(|flag| flag.to_string());
        let mut cells: Vec<&str> = vec![&row.service, &row.permission];
        cells.extend(flags.iter().map(String::as_str));
        write_table_line(writer, &cells, &widths)?;
    }
    Ok(())
}

fn write_table_line(writer: &mut impl fmt::Write, cells: &[&str], widths: &[usize]) -> fmt::Result {
    for (idx, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            write!(writer, "  ")?;
        }
        if idx + 1 == cells.len() {
            // No trailing padding on the last column.
            write!(writer, "{cell}")?;
        } else {
            write!(writer, "{cell:<width$}")?;
        }
    }
    writeln!(writer)
}

/// Write rows as CSV: header first, booleans as `true`/`false`.
pub fn write_csv(rows: &[Row], writer: &mut impl io::Write) -> Result<()> {
    write_csv_record(writer, table_headers().into_iter())
        .context("writing CSV header")?;
    for row in rows {
        let flags = row.flags().map(|flag| flag.to_string());
        let cells = [row.service.as_str(), row.permission.as_str()]
            .into_iter()
            .chain(flags.iter().map(String::as_str));
        write_csv_record(writer, cells)
            .with_context(|| format!("writing CSV row for {}", row.permission))?;
    }
    Ok(())
}

fn write_csv_record<'a>(
    writer: &mut impl io::Write,
    cells: impl Iterator<Item = &'a str>,
) -> io::Result<()> {
    for (idx, cell) in cells.enumerate() {
        if idx > 0 {
            write!(writer, ",")?;
        }
        write!(writer, "{}", csv_field(cell))?;
    }
    writeln!(writer)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One compact JSON object per row for NDJSON pipelines.
pub fn ndjson_row(row: &Row) -> Value {
    let mut tags = serde_json::Map::new();
    for (tag, flag) in Tag::ALL.iter().zip(row.flags()) {
        tags.insert(tag.as_str().to_string(), Value::Bool(flag));
    }
    json!({
        "service": row.service,
        "permission": row.permission,
        "tags": tags,
    })
}
