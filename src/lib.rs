//! AutoPCR shell: supervision of the local backend service.
//!
//! The shell keeps a foreground UI responsive while a long-running local
//! backend (HTTP server, database init, scheduled jobs) runs on its own
//! execution context. This crate implements the supervisor only; the
//! backend itself and the UI are external collaborators.
//!
//! # Architecture
//!
//! - **Provisioning**: [`provision`] creates the backend's directory layout
//!   under a platform-resolved root ([`app_dirs`]) before anything starts.
//! - **Worker**: [`worker`] runs backend bring-up and the serve loop on a
//!   dedicated thread with its own runtime, reporting terminal outcomes
//!   through an event channel instead of throwing across the boundary.
//! - **Probe**: [`probe`] polls the backend's liveness endpoint on a
//!   constant interval with a bounded per-request timeout.
//! - **Controller**: [`lifecycle`] ties the pieces together behind a small
//!   start / watch / stop façade and publishes [`ServiceStatus`].

pub mod app_dirs;
pub mod backend;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod probe;
pub mod provision;
pub mod status;
pub mod worker;

pub use backend::{BackendError, BackendService};
pub use config::{BackendConfig, ProbeConfig, SupervisorConfig};
pub use error::{Result, SupervisorError};
pub use lifecycle::LifecycleController;
pub use probe::{ProbeResult, ReadinessProbe};
pub use provision::DirectorySet;
pub use status::{ServiceStatus, WorkerEvent};
pub use worker::WorkerHandle;
