//! Permission catalog wiring.
//!
//! This module wraps the JSON catalog under `schema/permissions.json` so the
//! binaries can load a validated snapshot and expose consistent identifiers.
//! Types here mirror the schema fields; callers use `CatalogIndex` for
//! validated, deterministically ordered access.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{CatalogKey, PermissionName, ServiceName};
pub use index::CatalogIndex;
pub use model::{PermissionCatalog, ServiceEntry, load_catalog_from_path};
