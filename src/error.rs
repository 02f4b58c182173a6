//! Error types for the service supervisor.
//!
//! Transient probe failures (connection refused / timeout while the backend
//! warms up) are deliberately *not* errors — they surface as unsuccessful
//! [`ProbeResult`](crate::probe::ProbeResult) values and are retried.

/// Top-level error type for the supervisor.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// Directory provisioning failed; aborts start before the worker spawns.
    #[error("provisioning error: {0}")]
    Provisioning(String),

    /// Backend initialization or job registration failed inside the worker.
    #[error("worker init error: {0}")]
    WorkerInit(String),

    /// The serve loop exited with an error after bring-up.
    #[error("serve loop error: {0}")]
    ServeLoop(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Lifecycle misuse (e.g. `start()` on an already-started controller).
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SupervisorError>;
