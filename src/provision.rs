//! Idempotent provisioning of the backend's on-disk directory layout.
//!
//! The backend assumes its working directories exist before initialization
//! runs, so the controller provisions them ahead of spawning the worker.
//! Root resolution is *not* done here — callers pass the resolved root (see
//! [`crate::app_dirs::root_dir`]), which keeps this module portable and
//! independently testable.

use std::path::{Path, PathBuf};

use crate::error::{Result, SupervisorError};

/// Subdirectories the backend requires, relative to the resolved root.
///
/// Order matters only in that parents precede children; the backend never
/// interprets the contents from the supervisor's side.
const REQUIRED_SUBDIRS: &[&str] = &[
    "cache",
    "cache/db",
    "cache/http_server",
    "cache/token",
    "result",
    "log",
];

/// The ordered set of absolute directories provisioned under a root.
///
/// Computed once per [`ensure`] call; immutable afterwards. Two calls on the
/// same root produce equal sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySet {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl DirectorySet {
    /// The root the set was computed from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The provisioned directories, parents before children.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of directories in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the set is empty (never the case for [`ensure`] output).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Create the backend's directory layout under `root`, returning the set.
///
/// Idempotent: directories that already exist are not an error. Failures
/// from the filesystem itself (permissions, unwritable storage) propagate
/// as [`SupervisorError::Provisioning`].
///
/// # Errors
///
/// Returns an error if any directory cannot be created.
pub fn ensure(root: &Path) -> Result<DirectorySet> {
    let mut paths = Vec::with_capacity(REQUIRED_SUBDIRS.len());
    let mut created = 0usize;

    for subdir in REQUIRED_SUBDIRS {
        let path = root.join(subdir);
        if !path.is_dir() {
            std::fs::create_dir_all(&path).map_err(|e| {
                SupervisorError::Provisioning(format!("create {}: {e}", path.display()))
            })?;
            created += 1;
        }
        paths.push(path);
    }

    tracing::debug!(
        root = %root.display(),
        created,
        total = paths.len(),
        "backend directories provisioned"
    );

    Ok(DirectorySet {
        root: root.to_path_buf(),
        paths,
    })
}

/// Directories from the required layout that do not yet exist under `root`.
#[must_use]
pub fn missing(root: &Path) -> Vec<PathBuf> {
    REQUIRED_SUBDIRS
        .iter()
        .map(|subdir| root.join(subdir))
        .filter(|path| !path.is_dir())
        .collect()
}
