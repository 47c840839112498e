use serde::{Deserialize, Serialize};

/// Versioned key for a permission catalog (e.g., `permission_catalog_v1`).
///
/// Stored alongside emitted rows' provenance so consumers can tell which
/// catalog snapshot a table was computed from.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Provider namespace prefix that groups permissions (e.g., `s3`).
///
/// This is the value rendered in the `service` column; the human-readable
/// service title is only catalog metadata.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(pub String);

/// A named allowable action within a service (e.g., `CreateBucket`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionName(pub String);

impl ServiceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PermissionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
