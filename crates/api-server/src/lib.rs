//! JSON HTTP surface for the admin batch runner.

#![warn(clippy::unwrap_used)]

pub mod handlers;
pub mod models;
pub mod rest;
pub mod router;
pub mod server;

pub use rest::AppState;
pub use router::api_router;
pub use server::ApiServer;
