use thiserror::Error;

/// Maximum number of response-body characters carried in an error.
pub(crate) const SNIPPET_CHARS: usize = 200;

/// A failed backend call, normalized to a single type carrying a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {status_text}: {snippet}")]
    Status {
        status: u16,
        status_text: String,
        snippet: String,
    },
    /// The server answered 2xx with something other than JSON.
    #[error("expected a JSON response but received content-type '{content_type}': {snippet}")]
    ContentType { content_type: String, snippet: String },
    /// The request never produced a response.
    #[error("network error: {message}")]
    Network { message: String },
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// The response claimed to be JSON but did not parse, or did not match
    /// the expected shape.
    #[error("invalid JSON response: {message}")]
    Decode { message: String },
}

impl TransportError {
    /// Whether a retry could plausibly succeed: connection failures, timeouts
    /// and gateway-class statuses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => matches!(status, 502..=504),
            Self::ContentType { .. } | Self::Decode { .. } => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The first [`SNIPPET_CHARS`] characters of a response body.
pub(crate) fn snippet(body: &str) -> String {
    body.trim().chars().take(SNIPPET_CHARS).collect()
}
