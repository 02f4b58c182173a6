//! Shared helpers for supervisor integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use tokio::sync::{Notify, watch};
use tokio_util::sync::CancellationToken;

use autopcr_shell::{BackendError, BackendService, ServiceStatus, SupervisorConfig};

/// Test doubles for the external backend collaborator.
///
/// `init` can be gated on a [`Notify`] so tests control exactly when
/// bring-up completes; `serve` optionally runs a real HTTP listener with a
/// `/daily/` route so the readiness probe observes genuine socket behavior.
pub struct MockBackend {
    /// When set, `init` waits for one notification before returning.
    pub init_gate: Option<Arc<Notify>>,
    /// When set, `init` fails with this message (after any gate).
    pub init_error: Option<String>,
    /// Whether `serve` actually listens on the bind address.
    pub listen: bool,
    /// Notifying this while serving makes the serve loop fail.
    pub crash: Arc<Notify>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            init_gate: None,
            init_error: None,
            listen: true,
            crash: Arc::new(Notify::new()),
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            init_gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn failing_init(message: &str) -> Self {
        Self {
            init_error: Some(message.to_owned()),
            listen: false,
            ..Self::new()
        }
    }

    /// A backend that initializes fine but never starts listening.
    pub fn never_listening() -> Self {
        Self {
            listen: false,
            ..Self::new()
        }
    }
}

#[async_trait]
impl BackendService for MockBackend {
    async fn init(&mut self) -> Result<(), BackendError> {
        if let Some(gate) = &self.init_gate {
            gate.notified().await;
        }
        match self.init_error.take() {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }

    fn register_jobs(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn serve(
        &mut self,
        addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Result<(), BackendError> {
        let crash = Arc::clone(&self.crash);
        if !self.listen {
            tokio::select! {
                () = cancel.cancelled() => return Ok(()),
                () = crash.notified() => return Err("serve loop crashed".into()),
            }
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let app = Router::new().route("/daily/", get(|| async { "ok" }));
        tokio::select! {
            result = axum::serve(listener, app).into_future() => result.map_err(Into::into),
            () = cancel.cancelled() => Ok(()),
            () = crash.notified() => Err("serve loop crashed".into()),
        }
    }
}

/// Reserve a port on the loopback interface.
///
/// The listener is dropped before the backend binds; the usual transient
/// reuse caveat applies and is acceptable for tests.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// A config with short probe timings pointed at `port` on loopback.
pub fn fast_config(port: u16) -> SupervisorConfig {
    let mut config = SupervisorConfig::default();
    config.backend.port = port;
    config.probe.interval_ms = 50;
    config.probe.timeout_ms = 200;
    config
}

/// Wait (bounded) until the published status satisfies `pred`.
pub async fn wait_for_status(
    rx: &mut watch::Receiver<ServiceStatus>,
    pred: impl Fn(&ServiceStatus) -> bool,
) -> ServiceStatus {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            {
                let status = rx.borrow_and_update().clone();
                if pred(&status) {
                    return status;
                }
            }
            rx.changed().await.expect("status channel closed");
        }
    })
    .await
    .expect("timed out waiting for status")
}
