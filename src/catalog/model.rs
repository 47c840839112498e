//! Deserializable representation of `schema/permissions.json`.
//!
//! The types mirror the catalog schema so the tagger and tests can reason
//! about permission data without ad-hoc JSON handling. Use `CatalogIndex` for
//! validation and stable iteration; use these structs when the raw catalog
//! surface is required (titles, descriptions).

use crate::catalog::identity::{CatalogKey, PermissionName};
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
/// Full permission catalog as stored on disk.
pub struct PermissionCatalog {
    #[serde(rename = "schema_version")]
    pub key: CatalogKey,
    pub description: String,
    /// Service title (e.g., `Amazon S3`) to its permission entry. The title
    /// is display metadata only; rows are keyed by `ServiceEntry::prefix`.
    pub services: BTreeMap<String, ServiceEntry>,
}

#[derive(Clone, Debug, Deserialize)]
/// One service's namespace prefix and the actions it exposes.
pub struct ServiceEntry {
    pub prefix: String,
    pub actions: Vec<PermissionName>,
}

/// Read and parse a permission catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<PermissionCatalog> {
    let data = fs::read_to_string(path)?;
    let catalog: PermissionCatalog = serde_json::from_str(&data)?;
    Ok(catalog)
}
