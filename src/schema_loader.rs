//! JSON Schema loader for the catalog contract.
//!
//! Compiles `schema/permission_catalog.schema.json` into a validator and
//! extracts the `schema_version` const so the index can enforce the allowed
//! catalog versions before trusting any entries.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
    // Keeps the compiled schema's backing document alive; `JSONSchema`
    // borrows it for its whole lifetime.
    #[allow(dead_code)]
    raw: Arc<Value>,
}

/// Controls version enforcement before compilation.
#[derive(Default)]
pub(crate) struct SchemaLoadOptions<'a> {
    /// Override the schema_version const when provided (used to align the
    /// compiled schema with the version declared by the catalog file).
    pub expected_version: Option<&'a str>,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

pub(crate) fn load_json_schema(
    path: &Path,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let mut schema_value: Value = serde_json::from_reader(
        File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
    )
    .with_context(|| format!("parsing schema {}", path.display()))?;

    let schema_version = match options.expected_version {
        Some(version) => version.to_string(),
        None => extract_schema_version(&schema_value)
            .ok_or_else(|| anyhow!("schema missing schema_version const"))?,
    };

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    if options.expected_version.is_some() {
        let target = schema_value
            .pointer_mut(SCHEMA_VERSION_POINTER)
            .ok_or_else(|| {
                anyhow!("schema missing pointer {SCHEMA_VERSION_POINTER} for schema_version const")
            })?;
        *target = Value::String(schema_version.clone());
    }

    let raw = Arc::new(schema_value);
    let raw_static: &'static Value = unsafe { &*(Arc::as_ptr(&raw)) };
    let compiled = JSONSchema::compile(raw_static)
        .with_context(|| format!("compiling schema {}", path.display()))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
        raw,
    })
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema.pointer(SCHEMA_VERSION_POINTER).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
