//! Batch runner for admin add/delete/check across organizations.
//!
//! # Modules
//!
//! - [`rate_limit`]: fixed delay between successive targets
//! - [`reconciler`]: idempotent check-then-act against one organization
//! - [`orchestrator`]: sequential per-job driver, sole writer of its job
//! - [`registry`]: in-memory job store with cancellation tokens
//! - [`service`]: start/snapshot/cancel boundary used by the HTTP layer

pub mod orchestrator;
pub mod rate_limit;
pub mod reconciler;
pub mod registry;
pub mod service;

pub use orchestrator::{BatchOrchestrator, BatchSummary};
pub use rate_limit::RateLimiter;
pub use reconciler::AdminReconciler;
pub use registry::{JobHandle, JobRegistry};
pub use service::{resolve_targets, JobService};
