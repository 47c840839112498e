//! Catalog linter: validate the permission catalog and print a summary.
//!
//! Loading through `CatalogIndex` performs the full contract check (JSON
//! Schema, schema version, uniqueness invariants); this binary exists so CI
//! and catalog editors get a non-zero exit plus a readable report without
//! generating any tables.

use anyhow::{Context, Result, anyhow, bail};
use permtag::{
    CatalogIndex, Classification, Tag, create_permissions_table, find_repo_root,
    resolve_catalog_path,
};
use std::env;
use std::fmt;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let repo_root = find_repo_root().ok();
    let catalog_path = resolve_catalog_path(repo_root.as_deref(), cli.catalog_path.as_deref())?;
    let index = CatalogIndex::load(&catalog_path)
        .with_context(|| format!("linting catalog {}", catalog_path.display()))?;

    let mut output = String::new();
    render_summary(&index, &mut output).context("rendering lint summary")?;
    print!("{output}");
    Ok(())
}

fn render_summary(index: &CatalogIndex, writer: &mut impl fmt::Write) -> fmt::Result {
    let classification = Classification::classify(index);
    let rows = create_permissions_table(&classification);

    let tag_counts: Vec<String> = Tag::ALL
        .iter()
        .map(|tag| {
            let count = rows.iter().filter(|row| row.tags.contains(tag)).count();
            format!("{}={}", tag.as_str(), count)
        })
        .collect();
    let untagged = rows.iter().filter(|row| row.tags.is_empty()).count();

    writeln!(writer, "catalog lint summary")?;
    writeln!(writer, "==========================")?;
    writeln!(writer, "catalog key : {}", classification.catalog_key().0)?;
    writeln!(writer, "description : {}", index.catalog().description)?;
    writeln!(writer, "services    : {}", index.service_count())?;
    writeln!(writer, "permissions : {}", index.permission_count())?;
    writeln!(writer, "tag counts  : {}", tag_counts.join(", "))?;
    writeln!(writer, "untagged    : {untagged}")?;
    Ok(())
}

struct Cli {
    catalog_path: Option<PathBuf>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut catalog_path = None;

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--catalog" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--catalog requires a value"))?;
                    catalog_path = Some(PathBuf::from(
                        value
                            .into_string()
                            .map_err(|_| anyhow!("--catalog must be valid UTF-8"))?,
                    ));
                }
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(Self { catalog_path })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: catalog-lint [--catalog PATH]\n\nOptions:\n  --catalog PATH Override the permission catalog path (or set PERMTAG_CATALOG).\n  --help         Show this help text."
    );
    std::process::exit(code);
}
