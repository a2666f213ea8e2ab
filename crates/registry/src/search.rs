//! In-memory operation search across catalogs.
//!
//! Every query token must appear somewhere in an operation's haystack (id,
//! label, description, category and endpoint). Matches are ranked by how
//! closely the query matches the operation id.

use std::borrow::Cow;

use seodeck_types::{Catalog, OperationDescriptor, PanelId};
use serde::Serialize;

const DEFAULT_RESULT_LIMIT: usize = 20;
const EXACT_ID_MATCH_SCORE_BONUS: i64 = 50;
const PREFIX_ID_MATCH_SCORE_BONUS: i64 = 25;
const LABEL_MATCH_SCORE_BONUS: i64 = 10;
const TOKEN_SCORE: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub panel: PanelId,
    pub operation_id: String,
    pub label: String,
    pub endpoint: String,
    pub score: i64,
}

/// Rank operations from `catalogs` against `query`, best first.
pub fn search_catalogs<'a>(catalogs: impl IntoIterator<Item = &'a Catalog>, query: &str) -> Vec<SearchHit> {
    let query_tokens = tokenize_query(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }
    let query_lower = query.trim().to_ascii_lowercase();

    let mut hits: Vec<SearchHit> = catalogs
        .into_iter()
        .flat_map(|catalog| catalog.operations.iter().map(move |operation| (catalog.panel, operation)))
        .filter_map(|(panel, operation)| {
            score_operation(operation, &query_lower, &query_tokens).map(|score| SearchHit {
                panel,
                operation_id: operation.id.clone(),
                label: operation.label.clone(),
                endpoint: operation.endpoint.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|left, right| {
        right
            .score
            .cmp(&left.score)
            .then_with(|| left.panel.cmp(&right.panel))
            .then_with(|| left.operation_id.cmp(&right.operation_id))
    });
    hits.truncate(DEFAULT_RESULT_LIMIT);
    hits
}

fn score_operation(operation: &OperationDescriptor, query_lower: &str, query_tokens: &[String]) -> Option<i64> {
    let haystack = build_haystack(operation).to_ascii_lowercase();
    if !query_tokens.iter().all(|token| haystack.contains(token.as_str())) {
        return None;
    }

    let id_lower = operation.id.to_ascii_lowercase();
    let normalized_query = query_lower.replace(' ', "_");
    let mut score = query_tokens.len() as i64 * TOKEN_SCORE;
    if id_lower.contains(&normalized_query) {
        score += EXACT_ID_MATCH_SCORE_BONUS;
    }
    if query_tokens.first().is_some_and(|token| id_lower.starts_with(token.as_str())) {
        score += PREFIX_ID_MATCH_SCORE_BONUS;
    }
    if operation.label.to_ascii_lowercase().contains(query_lower) {
        score += LABEL_MATCH_SCORE_BONUS;
    }
    Some(score)
}

fn tokenize_query(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| token.to_ascii_lowercase())
        .collect()
}

fn build_haystack(operation: &OperationDescriptor) -> String {
    [
        Cow::Borrowed(operation.id.as_str()),
        normalize_identifier(&operation.id),
        Cow::Borrowed(operation.label.as_str()),
        Cow::Borrowed(operation.description.as_str()),
        Cow::Borrowed(operation.category.as_str()),
        Cow::Borrowed(operation.endpoint.as_str()),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// `ssl_https_check` -> `ssl https check`, so multi-word queries can match ids.
fn normalize_identifier(value: &str) -> Cow<'_, str> {
    if value.bytes().any(|byte| matches!(byte, b'_' | b'-' | b'/')) {
        Cow::Owned(value.replace(['_', '-', '/'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
