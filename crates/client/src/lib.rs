//! Async client for the campus map REST API.
//!
//! Reads are public. Room and project mutations need a bearer token, obtained
//! from [`ApiClient::login`] or restored from a stored session.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
