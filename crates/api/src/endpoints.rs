//! Typed helpers for the backend's HTTP surface.
//!
//! | Path | Method |
//! |---|---|
//! | `/health` | GET |
//! | `/agents` | GET |
//! | `/agent_dependencies` | GET |
//! | `/execution_log?limit=&offset=` | GET |
//! | `/trigger_agent/{name}` | POST `{url?}` |
//! | `/trigger_phase/{phase}` | POST `{url?}` |
//! | `/seo_orchestration_core` | POST `{url?}` |
//! | `/trigger_all_agents?retry_failed=&max_retries=` | POST |
//! | `/reset_agents` | POST |

use seodeck_types::{
    AgentListing, DependencyGraph, ExecutionLog, ExecutionResult, HealthSnapshot, ResetSummary, TriggerAllSummary,
};
use serde_json::{Map, Value};

use crate::{ApiClient, RequestOptions, TransportError};

/// Body carrying only the optional target URL.
pub fn url_body(url: Option<&str>) -> Value {
    let mut body = Map::new();
    if let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) {
        body.insert("url".into(), Value::String(url.to_string()));
    }
    Value::Object(body)
}

impl ApiClient {
    pub async fn health(&self) -> Result<HealthSnapshot, TransportError> {
        self.fetch("/health", RequestOptions::get()).await
    }

    pub async fn agents(&self) -> Result<AgentListing, TransportError> {
        self.fetch("/agents", RequestOptions::get()).await
    }

    pub async fn agent_dependencies(&self) -> Result<DependencyGraph, TransportError> {
        self.fetch("/agent_dependencies", RequestOptions::get()).await
    }

    pub async fn execution_log(&self, limit: usize, offset: usize) -> Result<ExecutionLog, TransportError> {
        let path = format!("/execution_log?limit={limit}&offset={offset}");
        self.fetch(&path, RequestOptions::get()).await
    }

    pub async fn trigger_agent(&self, agent: &str, url: Option<&str>) -> Result<ExecutionResult, TransportError> {
        self.post_for_result(&format!("/trigger_agent/{agent}"), Some(url_body(url)))
            .await
    }

    pub async fn trigger_phase(&self, phase: &str, url: Option<&str>) -> Result<ExecutionResult, TransportError> {
        self.post_for_result(&format!("/trigger_phase/{phase}"), Some(url_body(url)))
            .await
    }

    pub async fn orchestrate(&self, url: Option<&str>) -> Result<ExecutionResult, TransportError> {
        self.post_for_result("/seo_orchestration_core", Some(url_body(url))).await
    }

    pub async fn trigger_all_agents(
        &self,
        retry_failed: bool,
        max_retries: u32,
    ) -> Result<TriggerAllSummary, TransportError> {
        let path = format!("/trigger_all_agents?retry_failed={retry_failed}&max_retries={max_retries}");
        self.fetch(&path, RequestOptions::post(None)).await
    }

    pub async fn reset_agents(&self) -> Result<ResetSummary, TransportError> {
        self.fetch("/reset_agents", RequestOptions::post(None)).await
    }

    /// POST to an operation endpoint and wrap the answer as an
    /// [`ExecutionResult`]. A `None` body sends no body at all.
    pub async fn post_for_result(&self, path: &str, body: Option<Value>) -> Result<ExecutionResult, TransportError> {
        let payload = self.fetch_json(path, RequestOptions::post(body)).await?;
        Ok(ExecutionResult::from_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_body_omits_blank_urls() {
        assert_eq!(url_body(None), serde_json::json!({}));
        assert_eq!(url_body(Some("   ")), serde_json::json!({}));
        assert_eq!(url_body(Some(" https://example.com ")), serde_json::json!({ "url": "https://example.com" }));
    }
}
