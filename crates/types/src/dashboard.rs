//! Read-only projections of backend state used by the dashboard screens.
//!
//! The backend owns every invariant here. Fields are defaulted liberally so a
//! backend that omits a counter, or sends it as `null`, does not break the
//! dashboard.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize `null` as `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a backend timestamp. Both RFC 3339 and naive ISO-8601 forms occur;
/// naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
}

impl HealthLevel {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EXCELLENT" => Self::Excellent,
            "GOOD" => Self::Good,
            "FAIR" => Self::Fair,
            "POOR" => Self::Poor,
            _ => Self::Unknown,
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSnapshot {
    #[serde(deserialize_with = "null_default")]
    pub health_status: String,
    #[serde(deserialize_with = "null_default")]
    pub total_agents: u32,
    #[serde(deserialize_with = "null_default")]
    pub successful_agents: u32,
    #[serde(deserialize_with = "null_default")]
    pub failed_agents: u32,
    #[serde(deserialize_with = "null_default")]
    pub success_percentage: f64,
    pub uptime: Option<String>,
    pub timestamp: Option<String>,
}

impl HealthSnapshot {
    pub fn level(&self) -> HealthLevel {
        HealthLevel::parse(&self.health_status)
    }

    pub fn pending_agents(&self) -> u32 {
        self.total_agents
            .saturating_sub(self.successful_agents)
            .saturating_sub(self.failed_agents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    NotRun,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRun => "not_run",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSummary {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub dependencies: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub status: AgentStatus,
    pub last_run: Option<String>,
}

/// `GET /agents`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentListing {
    #[serde(deserialize_with = "null_default")]
    pub agents: Vec<AgentSummary>,
    #[serde(deserialize_with = "null_default")]
    pub total_agents: usize,
    #[serde(deserialize_with = "null_default")]
    pub execution_order: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub agents_with_dependencies: usize,
}

impl AgentListing {
    pub fn count_with_status(&self, status: &AgentStatus) -> usize {
        self.agents.iter().filter(|agent| &agent.status == status).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyNode {
    #[serde(deserialize_with = "null_default")]
    pub dependencies: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub dependents: Vec<String>,
}

/// `GET /agent_dependencies`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyGraph {
    #[serde(deserialize_with = "null_default")]
    pub dependency_graph: IndexMap<String, DependencyNode>,
    #[serde(deserialize_with = "null_default")]
    pub total_agents: usize,
    #[serde(deserialize_with = "null_default")]
    pub agents_with_dependencies: usize,
    #[serde(deserialize_with = "null_default")]
    pub agents_with_dependents: usize,
    pub timestamp: Option<String>,
}

impl DependencyGraph {
    /// Agents with neither dependencies nor dependents.
    pub fn independent_agents(&self) -> impl Iterator<Item = &str> {
        self.dependency_graph
            .iter()
            .filter(|(_, node)| node.dependencies.is_empty() && node.dependents.is_empty())
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    #[serde(deserialize_with = "null_default")]
    pub agent: String,
    #[serde(deserialize_with = "null_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub timestamp: String,
}

impl LogEntry {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// `GET /execution_log?limit=&offset=`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionLog {
    #[serde(deserialize_with = "null_default")]
    pub total_entries: usize,
    #[serde(deserialize_with = "null_default")]
    pub returned: usize,
    #[serde(deserialize_with = "null_default")]
    pub offset: usize,
    #[serde(deserialize_with = "null_default")]
    pub limit: usize,
    #[serde(deserialize_with = "null_default")]
    pub logs: Vec<LogEntry>,
    pub timestamp: Option<String>,
}

impl ExecutionLog {
    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.total_entries.div_ceil(page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentRunResult {
    #[serde(deserialize_with = "null_default")]
    pub agent: String,
    #[serde(deserialize_with = "null_default")]
    pub success: bool,
    pub error: Option<String>,
    pub retries: Option<u32>,
    pub result: Option<Value>,
}

/// `POST /trigger_all_agents`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerAllSummary {
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    #[serde(deserialize_with = "null_default")]
    pub results: Vec<AgentRunResult>,
    #[serde(deserialize_with = "null_default")]
    pub total_agents: usize,
    #[serde(deserialize_with = "null_default")]
    pub successful: usize,
    #[serde(deserialize_with = "null_default")]
    pub failed: usize,
    #[serde(deserialize_with = "null_default")]
    pub success_rate: f64,
    pub timestamp: Option<String>,
}

/// `POST /reset_agents`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetSummary {
    #[serde(deserialize_with = "null_default")]
    pub message: String,
    pub previous_state: Option<Value>,
    pub timestamp: Option<String>,
}
