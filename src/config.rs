//! Configuration types for the service supervisor.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for the supervisor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Backend bind address and liveness endpoint.
    pub backend: BackendConfig,
    /// Readiness probe scheduling and timeout.
    pub probe: ProbeConfig,
}

/// Backend endpoint configuration.
///
/// The backend always binds locally; the shell is the only intended client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Host the backend binds to (local-only).
    pub host: String,
    /// Port the backend binds to.
    pub port: u16,
    /// Path that responds once the serve loop is accepting requests.
    pub liveness_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 13_200,
            liveness_path: "/daily/".to_owned(),
        }
    }
}

impl BackendConfig {
    /// Socket address the worker hands to the backend's serve loop.
    ///
    /// # Errors
    ///
    /// Returns an error if `host:port` does not parse as a socket address.
    pub fn bind_addr(&self) -> crate::error::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                crate::error::SupervisorError::Config(format!(
                    "invalid bind address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }

    /// Full URL of the liveness endpoint the probe polls.
    #[must_use]
    pub fn liveness_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.liveness_path)
    }
}

/// Readiness probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Constant polling period in milliseconds.
    pub interval_ms: u64,
    /// Per-request timeout in milliseconds. Keeps a hung backend from ever
    /// blocking the foreground; a stall degrades to "still starting".
    pub timeout_ms: u64,
    /// Optional ceiling on probe attempts before giving up with a terminal
    /// failure. `None` polls forever: backend warm-up (DB init plus job
    /// registration) has no fixed upper bound, so "not ready yet" is the
    /// expected common case.
    pub max_attempts: Option<u32>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            timeout_ms: 1_000,
            max_attempts: None,
        }
    }
}

impl ProbeConfig {
    /// Polling period as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SupervisorConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::SupervisorError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SupervisorError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path under the platform config dir.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }
}
