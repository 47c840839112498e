//! Shared library for the permtag CLI.
//!
//! The crate exposes the permission catalog types, the keyword tagger, and
//! the table/CSV/NDJSON renderers used by the binaries. Public functions here
//! form the contract the binaries depend on: repository discovery, catalog
//! path resolution, and the classification pipeline documented in README.md.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod classify;
pub mod table;
pub mod tags;

pub(crate) mod schema_loader;

pub use catalog::{
    CatalogIndex, CatalogKey, PermissionCatalog, PermissionName, ServiceEntry, ServiceName,
    load_catalog_from_path,
};
pub use classify::Classification;
pub use table::{
    Row, create_mutating_table, create_permissions_table, ndjson_row, render_table, table_headers,
    write_csv,
};
pub use tags::Tag;

const CATALOG_RELATIVE_PATH: &str = "schema/permissions.json";
const MANIFEST: &str = "Cargo.toml";

/// Returns true when `candidate` looks like the repository root.
///
/// The root detection is intentionally strict: both the shipped catalog and
/// the crate manifest must be present so path resolution never walks past the
/// workspace boundary into an unrelated checkout.
fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(CATALOG_RELATIVE_PATH).is_file() && candidate.join(MANIFEST).is_file()
}

/// Verifies that an explicit `PERMTAG_ROOT` hint points at a valid repo.
fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository root.
///
/// Search order: honor `PERMTAG_ROOT` if it points at a real repo, climb up
/// from the current executable, then climb up from the working directory.
/// Callers may treat failure as non-fatal when an explicit catalog path is
/// available.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("PERMTAG_ROOT") {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate permtag repository root. Set PERMTAG_ROOT to the cloned repository or pass --catalog."
    );
}

/// Canonical location of the shipped catalog inside a repository.
pub fn default_catalog_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CATALOG_RELATIVE_PATH)
}

/// Resolve the catalog file to load.
///
/// Precedence mirrors the CLI contract: explicit `--catalog` override, then
/// the `PERMTAG_CATALOG` environment variable, then the shipped catalog under
/// the repository root. Relative overrides are resolved against the root when
/// one is known.
pub fn resolve_catalog_path(
    repo_root: Option<&Path>,
    override_path: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(repo_relative(repo_root, path));
    }
    if let Ok(env_path) = env::var("PERMTAG_CATALOG") {
        if !env_path.trim().is_empty() {
            return Ok(repo_relative(repo_root, Path::new(&env_path)));
        }
    }
    if let Some(root) = repo_root {
        return Ok(default_catalog_path(root));
    }
    bail!(
        "Unable to resolve a permission catalog. Pass --catalog, set PERMTAG_CATALOG, or run from a permtag repository."
    )
}

fn repo_relative(base: Option<&Path>, candidate: &Path) -> PathBuf {
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else if let Some(root) = base {
        root.join(candidate)
    } else {
        candidate.to_path_buf()
    }
}
