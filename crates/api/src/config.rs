//! Environment-derived client configuration.
//!
//! Configuration is an explicit value handed to [`crate::ApiClient`]; nothing
//! here is process-global. [`Config::resolve`] takes a lookup function so that
//! tests can resolve configuration without touching the real environment.

use std::{env, str::FromStr, time::Duration};

use tracing::warn;

/// Backend used when `SEODECK_API_URL` is absent or blank.
pub const DEFAULT_BASE_URL: &str = "https://seo-backend-ver2.onrender.com";

pub const API_URL_ENV: &str = "SEODECK_API_URL";
pub const MOCK_MODE_ENV: &str = "SEODECK_USE_MOCK_DATA";
pub const TIMEOUT_ENV: &str = "SEODECK_TIMEOUT_SECS";
pub const MAX_RETRIES_ENV: &str = "SEODECK_MAX_RETRIES";
pub const RETRY_DELAY_ENV: &str = "SEODECK_RETRY_DELAY_MS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
/// Upper bound for the exponent so that large retry counts cannot overflow
/// the computed delay.
const MAX_BACKOFF_SHIFT: u32 = 10;

/// Bounded exponential backoff applied to retryable transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made after the first one.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    /// Delay before retry number `attempt` (zero-based): `base * 2^attempt`
    /// plus up to half of that again, scaled by `jitter` in `[0, 1)`.
    pub fn delay_for(&self, attempt: u32, jitter: f64) -> Duration {
        let backoff = self.base_delay.saturating_mul(1 << attempt.min(MAX_BACKOFF_SHIFT));
        let jitter = jitter.clamp(0.0, 1.0);
        let extra_nanos = (backoff.as_nanos() as f64 * 0.5 * jitter) as u64;
        backoff + Duration::from_nanos(extra_nanos)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix joined with every request path. Not validated; a malformed URL
    /// surfaces as a network error at call time.
    pub base_url: String,
    /// Serve every request from the mock oracle instead of the network.
    pub mock_mode: bool,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mock_mode: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// - the base URL is trimmed; blank or absent falls back to
    ///   [`DEFAULT_BASE_URL`]
    /// - mock mode is on only for the exact string `"true"`
    /// - numeric settings fall back to their defaults when unparseable
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|trimmed| !trimmed.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mock_mode = lookup(MOCK_MODE_ENV).as_deref() == Some("true");
        let timeout_secs = parse_or_default(&lookup, TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS);
        let max_retries = parse_or_default(&lookup, MAX_RETRIES_ENV, DEFAULT_MAX_RETRIES);
        let retry_delay_ms = parse_or_default(&lookup, RETRY_DELAY_ENV, DEFAULT_RETRY_DELAY_MS);

        Self {
            base_url,
            mock_mode,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy {
                max_retries,
                base_delay: Duration::from_millis(retry_delay_ms),
            },
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Join the base URL with an API-relative path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

fn parse_or_default<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = key, value = %raw, "ignoring unparseable setting");
            default
        }),
    }
}
