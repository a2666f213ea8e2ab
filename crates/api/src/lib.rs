//! Seodeck API client utilities.
//!
//! This crate provides everything needed to talk to the SEO micro-agents
//! backend:
//!
//! - [`Config`]: base URL, mock-mode flag, timeout and retry policy resolved
//!   from the environment
//! - [`ApiClient`]: the single `fetch_json` transport with content-type
//!   validation, bounded retries and an opt-in mock short-circuit
//! - [`MockOracle`]: canned JSON payloads served when mock mode is on
//! - typed helpers for each backend endpoint (see [`endpoints`])
//!
//! # Example
//!
//! ```ignore
//! use seodeck_api::{ApiClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new(Config::from_env())?;
//!     let health = client.health().await?;
//!     println!("{}", health.health_status);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
pub mod endpoints;
mod error;
pub mod http;
mod mock;

pub use client::{ApiClient, RequestOptions};
pub use config::{
    API_URL_ENV, Config, DEFAULT_BASE_URL, MAX_RETRIES_ENV, MOCK_MODE_ENV, RETRY_DELAY_ENV, RetryPolicy, TIMEOUT_ENV,
};
pub use error::TransportError;
pub use http::{HttpRequest, HttpResponse, HttpSend, ReqwestSend};
pub use mock::MockOracle;
