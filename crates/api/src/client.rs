use std::{sync::Arc, time::Instant};

use rand::Rng;
use seodeck_types::HttpMethod;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    Config, MockOracle, TransportError,
    error::snippet,
    http::{HttpRequest, HttpResponse, HttpSend, ReqwestSend},
};

const DEFAULT_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Caller-controlled parts of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Merged over the default JSON content-type; caller values win on
    /// conflicting (case-insensitive) names.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: HttpMethod::Get,
            ..Self::default()
        }
    }

    pub fn post(body: Option<Value>) -> Self {
        Self {
            method: HttpMethod::Post,
            body,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// The one transport used by every backend call.
///
/// Cloning is cheap; the sender and mock oracle are shared.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<Config>,
    sender: Arc<dyn HttpSend>,
    oracle: Arc<MockOracle>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client that talks to the network through `reqwest`.
    pub fn new(config: Config) -> Result<Self, TransportError> {
        Ok(Self::with_parts(config, Arc::new(ReqwestSend::new()?), Arc::new(MockOracle::new())))
    }

    pub fn with_parts(config: Config, sender: Arc<dyn HttpSend>, oracle: Arc<MockOracle>) -> Self {
        Self {
            config: Arc::new(config),
            sender,
            oracle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_mock(&self) -> bool {
        self.config.mock_mode
    }

    /// Fetch `path` and return its JSON body.
    ///
    /// In mock mode the mock oracle answers immediately and no request is
    /// made. Otherwise:
    /// - a non-2xx status fails with the status code, status text and the
    ///   first 200 characters of the body
    /// - a 2xx response whose content-type is not JSON fails closed
    /// - an empty 2xx body yields `null`
    /// - network errors, timeouts and 502/503/504 on GET requests are retried
    ///   according to the configured [`crate::RetryPolicy`]; a POST is sent
    ///   once since the backend may already be running it
    pub async fn fetch_json(&self, path: &str, options: RequestOptions) -> Result<Value, TransportError> {
        if self.config.mock_mode {
            debug!(method = %options.method, path = %path, "serving request from mock oracle");
            return Ok(self.oracle.respond(path));
        }

        let request = HttpRequest {
            method: options.method,
            url: self.config.url_for(path),
            headers: merge_headers(&options.headers),
            body: options.body,
            timeout: self.config.timeout,
        };
        let retry = self.config.retry;
        let replayable = request.method.is_idempotent();
        let mut attempt = 0;
        loop {
            let start = Instant::now();
            let outcome = self.attempt(request.clone()).await;
            match outcome {
                Ok(value) => {
                    debug!(
                        method = %request.method,
                        path = %path,
                        attempt,
                        duration_ms = start.elapsed().as_millis(),
                        "http request completed"
                    );
                    return Ok(value);
                }
                Err(error) if replayable && error.is_retryable() && attempt < retry.max_retries => {
                    let delay = retry.delay_for(attempt, rand::rng().random::<f64>());
                    warn!(
                        method = %request.method,
                        path = %path,
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "http request failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    warn!(
                        method = %request.method,
                        path = %path,
                        attempt,
                        status = ?error.status(),
                        duration_ms = start.elapsed().as_millis(),
                        error = %error,
                        "http request failed"
                    );
                    return Err(error);
                }
            }
        }
    }

    /// [`ApiClient::fetch_json`] followed by deserialization into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, TransportError> {
        let value = self.fetch_json(path, options).await?;
        serde_json::from_value(value).map_err(|error| TransportError::Decode {
            message: format!("unexpected response shape for {path}: {error}"),
        })
    }

    async fn attempt(&self, request: HttpRequest) -> Result<Value, TransportError> {
        let response = self.sender.send(request).await?;
        interpret_response(response)
    }
}

fn interpret_response(response: HttpResponse) -> Result<Value, TransportError> {
    if !response.is_success() {
        return Err(TransportError::Status {
            status: response.status,
            status_text: response.status_text,
            snippet: snippet(&response.body),
        });
    }
    let content_type = response.content_type.unwrap_or_default();
    if !is_json_media_type(&content_type) {
        // An empty body carries no content to mislabel.
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Err(TransportError::ContentType {
            content_type,
            snippet: snippet(&response.body),
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|error| TransportError::Decode {
        message: format!("{error}; body: {}", snippet(&response.body)),
    })
}

/// `application/json` and any `+json` structured-syntax suffix, ignoring
/// parameters such as `charset`.
fn is_json_media_type(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    media_type == "application/json" || (media_type.starts_with("application/") && media_type.ends_with("+json"))
}

fn merge_headers(caller: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = vec![(DEFAULT_CONTENT_TYPE.0.to_string(), DEFAULT_CONTENT_TYPE.1.to_string())];
    for (name, value) in caller {
        merged.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        merged.push((name.clone(), value.clone()));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: String::new(),
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        }
    }

    #[test]
    fn caller_headers_override_defaults_case_insensitively() {
        let merged = merge_headers(&[
            ("content-type".into(), "application/merge-patch+json".into()),
            ("X-Trace".into(), "abc".into()),
        ]);
        assert_eq!(
            merged,
            vec![
                ("content-type".to_string(), "application/merge-patch+json".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
        assert_eq!(merge_headers(&[]), vec![("Content-Type".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn json_media_types() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("Application/JSON; charset=utf-8"));
        assert!(is_json_media_type("application/problem+json"));
        assert!(!is_json_media_type("text/html; charset=utf-8"));
        assert!(!is_json_media_type(""));
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(interpret_response(response(204, None, "")), Ok(Value::Null));
        assert_eq!(interpret_response(response(200, Some("application/json"), "  ")), Ok(Value::Null));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let error = interpret_response(response(200, Some("application/json"), "{not json")).unwrap_err();
        assert!(matches!(error, TransportError::Decode { .. }), "{error:?}");
    }
}
