//! Service worker: backend bring-up and serve loop off the foreground.
//!
//! The worker owns a dedicated OS thread running its own single-threaded
//! tokio runtime, so the backend's event loop never competes with (or
//! blocks) the foreground context. Faults are captured at the worker
//! boundary and reported exactly once through the event channel; the thread
//! then exits. Silent worker death would leave the foreground polling
//! forever, so every exit path sends a terminal [`WorkerEvent`].

use std::net::SocketAddr;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backend::BackendService;
use crate::error::{Result, SupervisorError};
use crate::status::WorkerEvent;

/// Handle to a running worker: its thread plus the cooperative stop signal.
///
/// Owned exclusively by the controller; created on start, invalidated on
/// stop or worker exit.
pub struct WorkerHandle {
    thread: Option<std::thread::JoinHandle<()>>,
    cancel: CancellationToken,
}

impl WorkerHandle {
    /// Signal the serve loop to end cooperatively.
    ///
    /// Fire-and-forget: no retry, no forced termination of in-flight
    /// requests. The worker reports [`WorkerEvent::Stopped`] once its loop
    /// actually exits.
    pub fn request_stop(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once the worker thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Wait for the worker thread to exit. Test and teardown helper; the
    /// controller itself never blocks on the worker.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Spawn the worker thread and return immediately.
///
/// Readiness is *not* awaited here — the caller learns the outcome
/// asynchronously, via the probe or via `events`.
///
/// # Errors
///
/// Returns an error if the OS thread cannot be spawned.
pub fn spawn(
    backend: Box<dyn BackendService>,
    addr: SocketAddr,
    events: mpsc::UnboundedSender<WorkerEvent>,
) -> Result<WorkerHandle> {
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    let thread = std::thread::Builder::new()
        .name("autopcr-backend".to_owned())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = events.send(WorkerEvent::Failed(SupervisorError::WorkerInit(
                        format!("worker runtime: {e}"),
                    )));
                    return;
                }
            };

            let outcome = runtime.block_on(run_backend(backend, addr, worker_cancel));
            let event = match outcome {
                Ok(()) => WorkerEvent::Stopped,
                Err(e) => WorkerEvent::Failed(e),
            };
            // The receiver may already be gone if the controller was dropped.
            let _ = events.send(event);
        })?;

    Ok(WorkerHandle {
        thread: Some(thread),
        cancel,
    })
}

/// Backend bring-up and serve loop, in the required order.
async fn run_backend(
    mut backend: Box<dyn BackendService>,
    addr: SocketAddr,
    cancel: CancellationToken,
) -> Result<()> {
    backend
        .init()
        .await
        .map_err(|e| SupervisorError::WorkerInit(e.to_string()))?;

    backend
        .register_jobs()
        .map_err(|e| SupervisorError::WorkerInit(format!("job registration: {e}")))?;

    info!(%addr, "backend entering serve loop");

    match backend.serve(addr, cancel.clone()).await {
        Ok(()) => {
            info!("backend serve loop ended");
            Ok(())
        }
        // Teardown noise after a stop request is not a serve-loop fault.
        Err(e) if cancel.is_cancelled() => {
            warn!("serve loop error during shutdown: {e}");
            Ok(())
        }
        Err(e) => Err(SupervisorError::ServeLoop(e.to_string())),
    }
}
