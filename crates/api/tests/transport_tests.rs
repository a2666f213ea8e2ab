use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use seodeck_api::{
    ApiClient, Config, HttpRequest, HttpResponse, HttpSend, MockOracle, RequestOptions, RetryPolicy, TransportError,
};
use seodeck_types::{AgentStatus, HttpMethod};
use serde_json::json;

/// Replays scripted outcomes and records every request it sees.
#[derive(Default)]
struct ScriptedSend {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedSend {
    fn new(outcomes: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().expect("seen lock").len()
    }

    fn last_request(&self) -> HttpRequest {
        self.seen.lock().expect("seen lock").last().cloned().expect("at least one request")
    }
}

#[async_trait]
impl HttpSend for ScriptedSend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().expect("seen lock").push(request);
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .expect("scripted response available")
    }
}

fn reply(status: u16, content_type: &str, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        status_text: match status {
            200 => "OK",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "",
        }
        .to_string(),
        content_type: Some(content_type.to_string()),
        body: body.to_string(),
    })
}

fn live_config() -> Config {
    Config::default()
        .with_base_url("http://localhost:8000")
        .with_retry(RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        })
}

fn client_with(sender: Arc<ScriptedSend>, config: Config) -> ApiClient {
    ApiClient::with_parts(config, sender, Arc::new(MockOracle::seeded(7)))
}

#[tokio::test]
async fn server_error_carries_status_code_and_body_snippet() {
    let sender = ScriptedSend::new(vec![reply(500, "text/plain", "database unavailable")]);
    let client = client_with(sender.clone(), live_config());

    let error = client.fetch_json("/health", RequestOptions::get()).await.unwrap_err();

    assert_eq!(error.status(), Some(500));
    let message = error.to_string();
    assert!(message.contains("500"), "{message}");
    assert!(message.contains("Internal Server Error"), "{message}");
    assert!(message.contains("database unavailable"), "{message}");
    assert_eq!(sender.calls(), 1, "500 is not retried");
}

#[tokio::test]
async fn html_response_fails_closed() {
    let sender = ScriptedSend::new(vec![reply(200, "text/html", "<html>login</html>")]);
    let client = client_with(sender.clone(), live_config());

    let error = client.fetch_json("/health", RequestOptions::get()).await.unwrap_err();

    match error {
        TransportError::ContentType { content_type, snippet } => {
            assert_eq!(content_type, "text/html");
            assert_eq!(snippet, "<html>login</html>");
        }
        other => panic!("expected content-type error, got {other:?}"),
    }
    assert_eq!(sender.calls(), 1);
}

#[tokio::test]
async fn gateway_errors_are_retried_until_success() {
    let sender = ScriptedSend::new(vec![
        reply(503, "text/plain", "warming up"),
        Err(TransportError::Network {
            message: "connection reset".into(),
        }),
        reply(200, "application/json", r#"{"health_status":"GOOD"}"#),
    ]);
    let client = client_with(sender.clone(), live_config());

    let value = client.fetch_json("/health", RequestOptions::get()).await.expect("third attempt succeeds");

    assert_eq!(value, json!({ "health_status": "GOOD" }));
    assert_eq!(sender.calls(), 3);
}

#[tokio::test]
async fn retries_stop_after_the_configured_budget() {
    let sender = ScriptedSend::new(vec![
        Err(TransportError::Timeout { timeout_ms: 10 }),
        Err(TransportError::Timeout { timeout_ms: 10 }),
        Err(TransportError::Timeout { timeout_ms: 10 }),
    ]);
    let client = client_with(sender.clone(), live_config());

    let error = client.fetch_json("/agents", RequestOptions::get()).await.unwrap_err();

    assert_eq!(error, TransportError::Timeout { timeout_ms: 10 });
    assert_eq!(sender.calls(), 3, "one attempt plus two retries");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let sender = ScriptedSend::new(vec![reply(404, "application/json", r#"{"detail":"Not Found"}"#)]);
    let client = client_with(sender.clone(), live_config());

    let error = client.fetch_json("/missing", RequestOptions::get()).await.unwrap_err();

    assert_eq!(error.status(), Some(404));
    assert_eq!(sender.calls(), 1);
}

#[tokio::test]
async fn request_carries_url_body_and_merged_headers() {
    let sender = ScriptedSend::new(vec![reply(200, "application/json; charset=utf-8", r#"{"status":"SUCCESS"}"#)]);
    let client = client_with(sender.clone(), live_config());

    let options = RequestOptions::post(Some(json!({ "url": "https://example.com" }))).with_header("X-Request-Id", "42");
    client.fetch_json("/seo_orchestration_core", options).await.expect("success");

    let request = sender.last_request();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "http://localhost:8000/seo_orchestration_core");
    assert_eq!(request.body, Some(json!({ "url": "https://example.com" })));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("x-request-id"), Some("42"));
    assert_eq!(request.timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn mock_mode_never_touches_the_network() {
    let sender = ScriptedSend::new(vec![]);
    let client = client_with(sender.clone(), live_config().with_mock_mode(true));

    let health = client.health().await.expect("mock health");
    let agents = client.agents().await.expect("mock agents");
    let logs = client.execution_log(50, 0).await.expect("mock logs");
    let graph = client.agent_dependencies().await.expect("mock graph");

    assert_eq!(health.health_status, "EXCELLENT");
    assert_eq!(agents.agents.len(), 5);
    assert_eq!(agents.agents[0].status, AgentStatus::Success);
    assert!(!logs.logs.is_empty());
    assert!(graph.dependency_graph.contains_key("local_seo_agent"));
    assert_eq!(sender.calls(), 0);
}

#[tokio::test]
async fn typed_helpers_reject_unexpected_shapes() {
    let sender = ScriptedSend::new(vec![reply(200, "application/json", r#"{"agents": "not-a-list"}"#)]);
    let client = client_with(sender, live_config());

    let error = client.agents().await.unwrap_err();

    assert!(matches!(error, TransportError::Decode { .. }), "{error:?}");
}

#[tokio::test]
async fn null_counters_do_not_fail_dashboard_fetches() {
    let sender = ScriptedSend::new(vec![
        reply(
            200,
            "application/json",
            r#"{"health_status":"GOOD","total_agents":5,"successful_agents":null,"failed_agents":1,"success_percentage":null,"uptime":null}"#,
        ),
        reply(
            200,
            "application/json",
            r#"{"total_entries":2,"returned":null,"logs":[{"agent":"technical_seo_agent","success":true,"message":null,"timestamp":null},{"agent":null,"success":null,"message":"ok","timestamp":"2024-10-01T12:00:00Z"}]}"#,
        ),
    ]);
    let client = client_with(sender.clone(), live_config());

    let health = client.health().await.expect("health with null counters");
    assert_eq!(health.successful_agents, 0);
    assert_eq!(health.success_percentage, 0.0);
    assert_eq!(health.pending_agents(), 4);

    let log = client.execution_log(50, 0).await.expect("log with null fields");
    assert_eq!(log.total_entries, 2);
    assert_eq!(log.returned, 0);
    assert_eq!(log.logs.len(), 2);
    assert_eq!(log.logs[0].message, "");
    assert!(log.logs[0].parsed_timestamp().is_none());
    assert_eq!(log.logs[1].agent, "");
    assert!(!log.logs[1].success);
    assert_eq!(sender.calls(), 2);
}

#[tokio::test]
async fn timed_out_post_is_sent_exactly_once() {
    let sender = ScriptedSend::new(vec![
        Err(TransportError::Timeout { timeout_ms: 30_000 }),
        reply(200, "application/json", r#"{"message":"reset"}"#),
    ]);
    let client = client_with(sender.clone(), live_config());

    let error = client.reset_agents().await.unwrap_err();

    assert_eq!(error, TransportError::Timeout { timeout_ms: 30_000 });
    assert_eq!(sender.calls(), 1, "POST is never replayed");
    assert_eq!(sender.last_request().method, HttpMethod::Post);
}

#[tokio::test]
async fn gateway_error_on_post_is_not_retried() {
    let sender = ScriptedSend::new(vec![reply(503, "text/plain", "warming up")]);
    let client = client_with(sender.clone(), live_config());

    let error = client
        .fetch_json("/trigger_agent/technical_seo_agent", RequestOptions::post(None))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert_eq!(sender.calls(), 1);
}

#[test]
fn canonical_mock_paths_are_deterministic() {
    let oracle = MockOracle::new();
    for path in [
        "/health",
        "/agents",
        "/agent_dependencies",
        "/execution_log",
        "/seo_orchestration_core",
        "/trigger_all_agents",
        "/reset_agents",
        "/trigger_agent/technical_seo_agent",
        "/trigger_phase/phase_1_foundation",
        "/ssl_https_check",
    ] {
        let first = serde_json::to_string(&oracle.respond(path)).expect("encode");
        let second = serde_json::to_string(&oracle.respond(path)).expect("encode");
        assert_eq!(first, second, "{path}");
    }
}

#[test]
fn query_string_is_ignored() {
    let oracle = MockOracle::new();
    assert_eq!(oracle.respond("/execution_log?limit=50&offset=0"), oracle.respond("/execution_log"));
    assert_eq!(
        oracle.respond("/trigger_all_agents?retry_failed=true&max_retries=3"),
        oracle.respond("/trigger_all_agents")
    );
}

#[test]
fn prefixed_operation_paths_reach_their_fixture() {
    let oracle = MockOracle::new();
    let payload = oracle.respond("/technical_seo/ssl_https_check");
    assert_eq!(payload["status"], "SUCCESS");
    assert_eq!(payload["result"]["ssl_score"], 100);
    assert_eq!(payload, oracle.respond("/ssl_https_check"));
}

#[test]
fn parametric_paths_echo_their_segment() {
    let oracle = MockOracle::new();
    assert_eq!(oracle.respond("/trigger_agent/local_seo_agent")["agent"], "local_seo_agent");
    assert_eq!(oracle.respond("/trigger_phase/phase_3_technical")["phase"], "phase_3_technical");
}

#[test]
fn category_fallback_is_reproducible_with_a_seed() {
    let path = "/technical_seo/brand_new_crawl_probe";
    let first = MockOracle::seeded(42).respond(path);
    let second = MockOracle::seeded(42).respond(path);
    assert_eq!(first, second);

    let score = first["result"]["score"].as_u64().expect("numeric score");
    assert!((70..100).contains(&score), "score {score}");
    assert_eq!(first["result"]["health_status"], "Good");
}

#[test]
fn on_page_fallback_scores_stay_in_range() {
    let oracle = MockOracle::seeded(3);
    for _ in 0..50 {
        let payload = oracle.respond("/experimental_keyword_probe");
        let score = payload["result"]["score"].as_u64().expect("numeric score");
        assert!((60..100).contains(&score), "score {score}");
    }
}

#[test]
fn unknown_paths_get_the_default_envelope() {
    let oracle = MockOracle::new();
    assert_eq!(
        oracle.respond("/nothing_here?x=1"),
        json!({ "message": "Mock data not available for this endpoint", "endpoint": "/nothing_here" })
    );
}
