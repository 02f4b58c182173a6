//! Observable supervisor status and worker-boundary notifications.

use serde::{Deserialize, Serialize};

/// Lifecycle status of the supervised backend.
///
/// Exactly one instance exists per supervised worker, owned by the
/// [`LifecycleController`](crate::lifecycle::LifecycleController) and
/// published through a watch channel. Transitions are monotonic except
/// `Stopped`, which is reachable from any state on explicit stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ServiceStatus {
    /// `start()` has not been called yet.
    NotStarted,
    /// The worker is running bring-up; the probe has not seen the backend
    /// listening yet.
    Starting,
    /// The backend answered a liveness check. Sticky for the probe's
    /// lifetime: the serve loop runs until stop or a fatal fault.
    Ready,
    /// The worker reported a fatal error, or the probe gave up under a
    /// configured attempt ceiling.
    Failed {
        /// Human-readable reason, shown to the user by the foreground.
        reason: String,
    },
    /// The supervisor was stopped cooperatively.
    Stopped,
}

impl ServiceStatus {
    /// Returns `true` for states the supervisor never leaves on its own.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Stopped)
    }

    /// Returns `true` if the backend is serving.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Starting => write!(f, "starting"),
            Self::Ready => write!(f, "ready"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Terminal notifications crossing the worker → foreground boundary.
///
/// Faults are never thrown across the execution-context boundary; they are
/// converted into a `Failed` event at the worker boundary and delivered
/// exactly once through the event channel.
#[derive(Debug)]
pub enum WorkerEvent {
    /// The worker hit a fatal error during init, job registration, or the
    /// serve loop, and its execution context is exiting.
    Failed(crate::error::SupervisorError),
    /// The serve loop ended after a cooperative stop.
    Stopped,
}
