//! Lifecycle controller: the façade the foreground uses to start, observe,
//! and stop the supervised backend.
//!
//! # Design
//!
//! Two execution contexts cooperate here. The worker (see [`crate::worker`])
//! runs the backend on its own thread and runtime. On the foreground's
//! runtime, a single *monitor task* drives probe ticks and consumes worker
//! events, and publishes status transitions through a latch that never
//! replaces a terminal status; `stop()` is the one other writer and always
//! lands on `Stopped`. The foreground observes through a watch channel and
//! renders however it likes — the controller performs no rendering itself.
//!
//! Controllers are plain instances owned by the composition root; there is
//! no ambient singleton, and independent instances coexist freely in tests.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::BackendService;
use crate::config::{ProbeConfig, SupervisorConfig};
use crate::error::{Result, SupervisorError};
use crate::probe::ReadinessProbe;
use crate::status::{ServiceStatus, WorkerEvent};
use crate::worker::{self, WorkerHandle};

/// Supervises one backend worker and publishes its lifecycle status.
pub struct LifecycleController {
    config: SupervisorConfig,
    root_dir: PathBuf,
    status_tx: Arc<watch::Sender<ServiceStatus>>,
    status_rx: watch::Receiver<ServiceStatus>,
    worker: Option<WorkerHandle>,
    monitor: Option<tokio::task::JoinHandle<()>>,
    shutdown: CancellationToken,
    started: bool,
}

impl LifecycleController {
    /// Create a controller for a backend rooted at `root_dir`.
    ///
    /// Root resolution is the caller's platform decision; see
    /// [`crate::app_dirs::root_dir`] for the default.
    pub fn new(config: SupervisorConfig, root_dir: impl Into<PathBuf>) -> Self {
        let (status_tx, status_rx) = watch::channel(ServiceStatus::NotStarted);
        Self {
            config,
            root_dir: root_dir.into(),
            status_tx: Arc::new(status_tx),
            status_rx,
            worker: None,
            monitor: None,
            shutdown: CancellationToken::new(),
            started: false,
        }
    }

    /// Current published status.
    #[must_use]
    pub fn status(&self) -> ServiceStatus {
        self.status_rx.borrow().clone()
    }

    /// Subscribe to status transitions.
    ///
    /// The receiver marshals updates onto whatever context awaits it, so UI
    /// code can react without touching supervisor internals.
    #[must_use]
    pub fn watch_status(&self) -> watch::Receiver<ServiceStatus> {
        self.status_rx.clone()
    }

    /// Provision directories, spawn the worker, and arm the readiness probe.
    ///
    /// Valid only from `NotStarted`. Returns as soon as the worker thread is
    /// spawned; readiness (or failure) arrives asynchronously through the
    /// status channel. Must be called from within a tokio runtime — the
    /// monitor task runs on it.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Lifecycle`] when called twice,
    /// [`SupervisorError::Provisioning`] when the directory layout cannot be
    /// created (the worker is then never spawned), or
    /// [`SupervisorError::Config`] for an unusable bind address.
    pub fn start(&mut self, backend: Box<dyn BackendService>) -> Result<()> {
        if self.started {
            return Err(SupervisorError::Lifecycle(
                "start() is only valid from NotStarted".to_owned(),
            ));
        }

        // Directory layout must exist before backend initialization runs.
        let dirs = crate::provision::ensure(&self.root_dir)?;
        debug!(count = dirs.len(), "directory layout verified");

        let addr = self.config.backend.bind_addr()?;
        // Probe construction can fail on config grounds; do it before the
        // worker exists so an error here leaves nothing running.
        let probe = ReadinessProbe::new(&self.config)?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = worker::spawn(backend, addr, event_tx)?;

        self.status_tx.send_replace(ServiceStatus::Starting);
        info!(%addr, root = %self.root_dir.display(), "backend worker started");

        self.monitor = Some(tokio::spawn(run_monitor(
            probe,
            self.config.probe.clone(),
            event_rx,
            Arc::clone(&self.status_tx),
            self.shutdown.clone(),
        )));
        self.worker = Some(handle);
        self.started = true;
        Ok(())
    }

    /// Signal the worker to stop cooperatively and disarm the probe.
    ///
    /// Fire-and-forget: in-flight requests are not interrupted, and the call
    /// does not wait for the worker thread to exit. Calling `stop()` twice,
    /// or before `start()`, is a no-op — status stays `NotStarted` when the
    /// controller never started.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        info!("stop requested");
        worker.request_stop();
        self.shutdown.cancel();
        // Explicit stop always lands on Stopped, even over a prior terminal
        // failure. The monitor may still be awaiting an in-flight probe
        // check; its writes go through `publish`, which refuses to replace a
        // terminal status, so a late probe success cannot resurrect `Ready`.
        self.status_tx.send_replace(ServiceStatus::Stopped);
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.request_stop();
        }
        self.shutdown.cancel();
        if let Some(monitor) = self.monitor.take() {
            monitor.abort();
        }
    }
}

/// Publish a monitor-side status transition.
///
/// Terminal statuses latch: once `Failed` or `Stopped` is visible, nothing
/// the monitor later learns (a slow probe success, a straggling worker
/// event) may replace it. The check-and-write is atomic under the watch
/// channel's lock, so it cannot interleave with `stop()`'s write.
fn publish(status: &watch::Sender<ServiceStatus>, next: ServiceStatus) {
    status.send_if_modified(|current| {
        if current.is_terminal() {
            return false;
        }
        *current = next;
        true
    });
}

/// Foreground monitor: drives status transitions after start.
///
/// Consumes worker events and constant-interval probe ticks until a
/// terminal status is reached. The select is biased so a pending stop or
/// worker failure is always handled before another probe tick; a probe
/// check already in flight when `stop()` lands is neutralized by the
/// terminal latch in [`publish`].
async fn run_monitor(
    probe: ReadinessProbe,
    probe_config: ProbeConfig,
    mut events: mpsc::UnboundedReceiver<WorkerEvent>,
    status: Arc<watch::Sender<ServiceStatus>>,
    shutdown: CancellationToken,
) {
    let mut interval = tokio::time::interval(probe_config.interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut attempts: u32 = 0;
    let mut probing = true;

    loop {
        tokio::select! {
            biased;

            () = shutdown.cancelled() => {
                publish(&status, ServiceStatus::Stopped);
                return;
            }

            event = events.recv() => {
                match event {
                    Some(WorkerEvent::Failed(error)) => {
                        warn!("worker reported fatal error: {error}");
                        publish(&status, ServiceStatus::Failed {
                            reason: error.to_string(),
                        });
                    }
                    Some(WorkerEvent::Stopped) => {
                        info!("worker stopped");
                        publish(&status, ServiceStatus::Stopped);
                    }
                    // The worker guarantees a terminal event before exiting;
                    // a closed channel without one means it died silently.
                    None => {
                        publish(&status, ServiceStatus::Failed {
                            reason: "worker exited without reporting a status".to_owned(),
                        });
                    }
                }
                return;
            }

            _ = interval.tick(), if probing => {
                attempts += 1;
                let result = probe.check().await;
                if result.success {
                    info!(attempts, detail = ?result.detail, "backend ready");
                    publish(&status, ServiceStatus::Ready);
                    // Readiness is sticky: stop probing, keep watching the
                    // worker for serve-loop faults or a clean stop.
                    probing = false;
                } else {
                    debug!(attempts, detail = ?result.detail, "backend not ready yet");
                    if let Some(max) = probe_config.max_attempts
                        && attempts >= max
                    {
                        warn!(attempts, "readiness probe gave up");
                        publish(&status, ServiceStatus::Failed {
                            reason: format!("backend not reachable after {attempts} probe attempts"),
                        });
                        return;
                    }
                }
            }
        }
    }
}
