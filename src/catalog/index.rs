//! Indexed view of a permission catalog instance.
//!
//! The index enforces the expected catalog schema version and flattens the
//! catalog into a deterministic service-prefix → actions map. It is
//! intentionally strict about duplicates and unknown schema versions so the
//! tagger never computes rows from a mismatched or ambiguous catalog.

use crate::catalog::load_catalog_from_path;
use crate::catalog::{CatalogKey, PermissionCatalog, PermissionName, ServiceName};
use crate::schema_loader::{SchemaLoadOptions, load_json_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// The repository currently ships a single catalog; reject unexpected versions
// rather than risk tagging rows against a mismatched keyword contract.
const DEFAULT_SCHEMA_VERSION: &str = "permission_catalog_v1";

#[derive(Debug)]
/// Permission catalog plus a derived map keyed by service prefix.
pub struct CatalogIndex {
    catalog_key: CatalogKey,
    catalog: PermissionCatalog,
    by_service: BTreeMap<ServiceName, BTreeSet<PermissionName>>,
}

impl CatalogIndex {
    /// Load and validate the catalog from disk.
    ///
    /// Validates the document against the catalog JSON Schema, checks the
    /// schema version, and enforces the uniqueness invariants: one entry per
    /// service prefix, one entry per (service, permission) pair.
    pub fn load(path: &Path) -> Result<Self> {
        validate_against_schema(path)?;

        let catalog =
            load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        validate_catalog_key(&catalog.key)?;
        let by_service = build_index(&catalog)?;
        Ok(Self {
            catalog_key: catalog.key.clone(),
            catalog,
            by_service,
        })
    }

    /// The catalog key declared in the loaded file.
    pub fn key(&self) -> &CatalogKey {
        &self.catalog_key
    }

    /// Access the underlying catalog (titles, description).
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Iterates service prefixes in stable order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceName> {
        self.by_service.keys()
    }

    /// Iterates (service prefix, actions) pairs in stable order.
    pub fn entries(&self) -> impl Iterator<Item = (&ServiceName, &BTreeSet<PermissionName>)> {
        self.by_service.iter()
    }

    pub fn service_count(&self) -> usize {
        self.by_service.len()
    }

    pub fn permission_count(&self) -> usize {
        self.by_service.values().map(BTreeSet::len).sum()
    }
}

fn validate_catalog_key(key: &CatalogKey) -> Result<()> {
    if key.0.is_empty() {
        bail!("schema_version must not be empty");
    }

    if !key
        .0
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!("schema_version must match ^[A-Za-z0-9_.-]+$, got {}", key.0);
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(&key.0) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            key.0,
            allowed
        );
    }

    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([default_catalog_schema_version()])
}

fn default_catalog_schema_version() -> String {
    catalog_schema_version_from_disk().unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string())
}

fn catalog_schema_version_from_disk() -> Option<String> {
    let path = canonical_catalog_schema_path();
    let file = File::open(path).ok()?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).ok()?;
    value
        .pointer("/properties/schema_version/const")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn canonical_catalog_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/permission_catalog.schema.json")
}

fn build_index(
    catalog: &PermissionCatalog,
) -> Result<BTreeMap<ServiceName, BTreeSet<PermissionName>>> {
    if catalog.services.is_empty() {
        bail!("catalog contains no services");
    }

    let mut map: BTreeMap<ServiceName, BTreeSet<PermissionName>> = BTreeMap::new();
    for (title, entry) in &catalog.services {
        if entry.prefix.trim().is_empty() {
            bail!("service '{title}' has an empty prefix");
        }
        if !entry
            .prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            bail!(
                "service '{title}' prefix must match ^[A-Za-z0-9_.-]+$, got {}",
                entry.prefix
            );
        }

        let service = ServiceName(entry.prefix.clone());
        if map.contains_key(&service) {
            bail!("duplicate service prefix {}", entry.prefix);
        }

        let mut actions = BTreeSet::new();
        for action in &entry.actions {
            if action.0.trim().is_empty() {
                bail!("service '{title}' contains an empty action name");
            }
            if !actions.insert(action.clone()) {
                bail!(
                    "duplicate permission {} under service {}",
                    action.0,
                    entry.prefix
                );
            }
        }
        map.insert(service, actions);
    }
    Ok(map)
}

fn validate_against_schema(catalog_path: &Path) -> Result<()> {
    let catalog_file = File::open(catalog_path)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let catalog_value: Value = serde_json::from_reader(BufReader::new(catalog_file))
        .with_context(|| format!("parsing catalog {}", catalog_path.display()))?;

    let catalog_version = catalog_value
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let schema_path = resolve_catalog_schema_path(catalog_path);
    let allowed = allowed_schema_versions();
    let schema = load_json_schema(
        &schema_path,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            expected_version: Some(&catalog_version),
        },
    )
    .with_context(|| format!("loading catalog schema {}", schema_path.display()))?;

    if let Err(errors) = schema.compiled.validate(&catalog_value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "permission catalog {} failed schema validation:\n{}",
            catalog_path.display(),
            details
        );
    }
    Ok(())
}

fn resolve_catalog_schema_path(catalog_path: &Path) -> PathBuf {
    if let Some(base) = catalog_path.parent().and_then(|p| p.parent()) {
        let candidate = base.join("schema/permission_catalog.schema.json");
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/permission_catalog.schema.json")
}
