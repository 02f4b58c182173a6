//! Readiness probing against the backend's liveness endpoint.
//!
//! The probe has no coupling to the worker's internals: it only observes
//! whether the backend is accepting connections, by issuing short-timeout
//! GET requests from the foreground context. Connection refused, timeouts,
//! and HTTP error statuses are all *transient* — the backend simply is not
//! ready yet. Only the worker itself reports fatal errors.

use std::time::Instant;

use crate::config::SupervisorConfig;
use crate::error::{Result, SupervisorError};

/// Outcome of a single probe tick. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// `true` once the liveness endpoint answered with a success status.
    pub success: bool,
    /// Diagnostic detail for the tick (latency on success, failure class
    /// otherwise). Transient failures are logged, not reported as errors.
    pub detail: Option<String>,
}

impl ProbeResult {
    fn ready(latency_ms: u64) -> Self {
        Self {
            success: true,
            detail: Some(format!("{latency_ms}ms")),
        }
    }

    fn not_ready(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }
}

/// Liveness prober for a fixed local endpoint.
pub struct ReadinessProbe {
    url: String,
    client: reqwest::Client,
}

impl ReadinessProbe {
    /// Build a probe for the configured backend liveness endpoint.
    ///
    /// The underlying client carries the configured per-request timeout so a
    /// hung backend can never stall the foreground past one tick budget.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Config`] when the HTTP client cannot be
    /// constructed. A client without the timeout is never substituted.
    pub fn new(config: &SupervisorConfig) -> Result<Self> {
        Self::for_url(config.backend.liveness_url(), config.probe.timeout())
    }

    /// Build a probe for an explicit URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Config`] when the HTTP client cannot be
    /// constructed.
    pub fn for_url(url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SupervisorError::Config(format!("probe HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The endpoint URL this probe polls.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one liveness check.
    ///
    /// Never returns an error: every failure mode collapses into an
    /// unsuccessful [`ProbeResult`] for the caller to retry.
    pub async fn check(&self) -> ProbeResult {
        let start = Instant::now();
        match self.client.get(&self.url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let latency_ms = start.elapsed().as_millis() as u64;
                ProbeResult::ready(latency_ms)
            }
            Ok(resp) => {
                // The endpoint answered but is not serving yet (404 during
                // route registration, 5xx mid-bring-up). Not ready.
                ProbeResult::not_ready(format!("HTTP {}", resp.status().as_u16()))
            }
            Err(e) => ProbeResult::not_ready(classify_transport_error(&e)),
        }
    }
}

/// Classify a reqwest transport error into a short diagnostic label.
fn classify_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "timeout".to_owned()
    } else if err.is_connect() {
        "connection refused".to_owned()
    } else {
        format!("transport error: {err}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn probe_url_from_config() {
        let config = SupervisorConfig::default();
        let probe = ReadinessProbe::new(&config).unwrap();
        assert_eq!(probe.url(), "http://127.0.0.1:13200/daily/");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transient() {
        // Use a port unlikely to be in use.
        let probe =
            ReadinessProbe::for_url("http://127.0.0.1:19999/daily/", Duration::from_secs(1))
                .unwrap();
        let result = probe.check().await;
        assert!(!result.success);
        let detail = result.detail.unwrap();
        assert!(
            detail.contains("connection refused") || detail.contains("timeout"),
            "unexpected detail: {detail}"
        );
    }

    #[tokio::test]
    async fn listening_endpoint_reports_ready() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe =
            ReadinessProbe::for_url(format!("{}/daily/", server.uri()), Duration::from_secs(1))
                .unwrap();
        let result = probe.check().await;
        assert!(result.success, "detail: {:?}", result.detail);
        assert!(result.detail.unwrap().ends_with("ms"));
    }

    #[tokio::test]
    async fn http_error_status_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe =
            ReadinessProbe::for_url(format!("{}/daily/", server.uri()), Duration::from_secs(1))
                .unwrap();
        let result = probe.check().await;
        assert!(!result.success);
        assert_eq!(result.detail.as_deref(), Some("HTTP 503"));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out_within_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let probe = ReadinessProbe::for_url(
            format!("{}/daily/", server.uri()),
            Duration::from_millis(200),
        )
        .unwrap();
        let start = Instant::now();
        let result = probe.check().await;
        assert!(!result.success);
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "probe exceeded its timeout budget"
        );
    }
}
