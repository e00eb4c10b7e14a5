//! Dashboard API client — organizations and organization admins.
//!
//! [`DashboardApi`] is the seam the batch runner is written against;
//! [`HttpConnector`] builds the reqwest-backed implementation per API key.

pub mod client;
pub mod error;
pub mod http;
pub mod models;

pub use client::{DashboardApi, DashboardConnector, NewAdmin};
pub use error::{DashboardError, DashboardResult};
pub use http::{HttpConnector, HttpDashboardClient};
