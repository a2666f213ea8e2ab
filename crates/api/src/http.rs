//! The HTTP seam used by [`crate::ApiClient`].
//!
//! [`HttpSend`] performs exactly one request attempt. The client layers
//! status handling, content-type validation and retries on top, so tests can
//! substitute a scripted sender without any network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, header};
use seodeck_types::HttpMethod;
use serde_json::Value;

use crate::TransportError;

/// One fully resolved request attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Final header set after merging defaults with caller headers.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A raw response; status interpretation is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpSend: Send + Sync {
    /// Send a single attempt. Only failures to obtain a response are errors;
    /// non-2xx statuses are returned as ordinary responses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpSend`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestSend {
    http: Client,
}

impl ReqwestSend {
    pub fn new() -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(format!("seodeck/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS))
            .build()
            .map_err(|error| TransportError::Network {
                message: format!("failed to build HTTP client: {error}"),
            })?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpSend for ReqwestSend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let mut builder = self.http.request(method, &request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            let encoded = serde_json::to_vec(body).map_err(|error| TransportError::Decode {
                message: format!("failed to encode request body: {error}"),
            })?;
            builder = builder.body(encoded);
        }

        let response = builder.send().await.map_err(|error| {
            if error.is_timeout() {
                TransportError::Timeout {
                    timeout_ms: request.timeout.as_millis() as u64,
                }
            } else {
                TransportError::Network {
                    message: error.to_string(),
                }
            }
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|error| TransportError::Network {
            message: format!("failed to read response body: {error}"),
        })?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}
