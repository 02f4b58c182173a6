//! Backend collaborator contract.
//!
//! The HTTP server, database initialization, and scheduled-job machinery
//! are external to the supervisor; this trait is the seam through which the
//! worker drives them. Implementations report failures as plain error
//! values — the worker tags them with the lifecycle phase they occurred in.

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Opaque error type for backend collaborators.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// The long-running local backend the supervisor brings up and tears down.
///
/// The worker calls the methods in a fixed order on its own execution
/// context: [`init`](Self::init), then [`register_jobs`](Self::register_jobs),
/// then [`serve`](Self::serve). Serving must not begin before both earlier
/// steps complete — scheduled jobs may depend on initialized state.
#[async_trait]
pub trait BackendService: Send + 'static {
    /// Asynchronous database/backend initialization.
    ///
    /// Must complete (or fail) before any request is served.
    async fn init(&mut self) -> Result<(), BackendError>;

    /// Register scheduled jobs. Idempotent; called once, after `init`.
    fn register_jobs(&mut self) -> Result<(), BackendError>;

    /// Run the serve loop bound to `addr` until `cancel` fires.
    ///
    /// Cancellation is cooperative: the loop should observe the token (or
    /// close its listener) between requests rather than aborting in-flight
    /// work. Returning `Ok(())` after cancellation is a clean stop.
    async fn serve(&mut self, addr: SocketAddr, cancel: CancellationToken)
    -> Result<(), BackendError>;
}
