//! Serving layer: axum prediction endpoint and a reqwest client for it.

pub mod client;
mod config;
mod error;
mod routes;
#[cfg(test)]
mod testing;

pub use client::{ClientError, PredictClient};
pub use config::ServeConfig;
pub use error::ApiError;
pub use routes::{AppState, router, serve};

/// Multipart field carrying the uploaded CSV.
pub const FILE_FIELD: &str = "file";
