//! Platform root-directory resolution for the shell.
//!
//! The supervisor needs a writable root under which the backend's working
//! directories live. Where that root sits is a platform decision: the app's
//! private storage on mobile, a local data directory on desktop. The [`dirs`]
//! crate makes that resolution sandbox-transparent, so the same code works
//! inside and outside an app sandbox.
//!
//! # Environment Overrides
//!
//! All paths can be overridden for testing or custom deployments:
//! - `AUTOPCR_ROOT_DIR` — overrides [`root_dir`]
//! - `AUTOPCR_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Backend working-directory root.
///
/// Everything the backend writes (cache, results, logs) lives under this
/// directory; see [`crate::provision`] for the layout created beneath it.
///
/// Resolves to `dirs::data_dir()/autopcr/` by default. Override with the
/// `AUTOPCR_ROOT_DIR` environment variable.
#[must_use]
pub fn root_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AUTOPCR_ROOT_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("autopcr"))
        .unwrap_or_else(|| PathBuf::from("/tmp/autopcr-data"))
}

/// Shell config directory.
///
/// Resolves to `dirs::config_dir()/autopcr/` by default. Override with the
/// `AUTOPCR_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AUTOPCR_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("autopcr"))
        .unwrap_or_else(|| PathBuf::from("/tmp/autopcr-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
