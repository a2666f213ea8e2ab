use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of one successful operation invocation.
///
/// Operation endpoints answer with a `{ status, result }` envelope by
/// convention only. Payloads without that shape are kept whole in `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Application-level status code such as `SUCCESS` or `FAILED`.
    pub status: Option<String>,
    /// The payload shown to the operator.
    pub result: Value,
    /// The untouched response body.
    pub raw: Value,
}

impl ExecutionResult {
    pub fn from_payload(payload: Value) -> Self {
        let status = payload.get("status").and_then(Value::as_str).map(str::to_string);
        let result = match payload.get("result") {
            Some(inner) if status.is_some() => inner.clone(),
            _ => payload.clone(),
        };
        Self {
            status,
            result,
            raw: payload,
        }
    }

    /// The `source_url` the backend analyzed, when it reports one.
    pub fn source_url(&self) -> Option<&str> {
        self.result.get("source_url").and_then(Value::as_str)
    }

    /// True unless the backend reported an explicit non-success status.
    pub fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|status| status.eq_ignore_ascii_case("success"))
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.result).unwrap_or_else(|_| self.result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unwraps_status_envelope() {
        let result = ExecutionResult::from_payload(json!({
            "status": "SUCCESS",
            "result": { "ssl_score": 100, "source_url": "https://example.com" }
        }));
        assert_eq!(result.status.as_deref(), Some("SUCCESS"));
        assert_eq!(result.result["ssl_score"], 100);
        assert_eq!(result.source_url(), Some("https://example.com"));
        assert!(result.is_success());
    }

    #[test]
    fn keeps_bespoke_payloads_whole() {
        let payload = json!({ "message": "All agents executed", "successful": 3 });
        let result = ExecutionResult::from_payload(payload.clone());
        assert_eq!(result.status, None);
        assert_eq!(result.result, payload);
        assert!(result.is_success());
    }

    #[test]
    fn failed_status_is_not_success() {
        let result = ExecutionResult::from_payload(json!({ "status": "FAILED", "result": {} }));
        assert!(!result.is_success());
    }
}
