use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::engine::SearchQuery;
use crate::error::Error;
use crate::models::*;
use crate::store::RuleStore;

// ============================================================
// Error Handling
// ============================================================

/// Request-shape errors are returned to the client as BAD_REQUEST. Rule
/// loading errors are logged server-side and the client only sees a generic
/// message.
fn store_error(e: Error) -> (StatusCode, String) {
    let msg = e.to_string();

    if e.is_request_error() {
        tracing::warn!("Validation error: {}", msg);
        return (StatusCode::BAD_REQUEST, msg);
    }

    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn parse_scope(scope: &str) -> Result<RuleScope, (StatusCode, String)> {
    scope.parse().map_err(store_error)
}

fn markdown(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Scopes
// ============================================================

pub async fn list_scope_keys(
    State(store): State<RuleStore>,
    Path(scope): Path<String>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let scope = parse_scope(&scope)?;
    store
        .available_scope_keys(scope)
        .map(Json)
        .map_err(store_error)
}

pub async fn resolve_scopes(
    State(store): State<RuleStore>,
    Path((scope, key)): Path<(String, String)>,
) -> Result<Json<ResolvedScopes>, (StatusCode, String)> {
    let request = RuleRequest::new(parse_scope(&scope)?, key);
    store.resolve(&request).map(Json).map_err(store_error)
}

// ============================================================
// Rules
// ============================================================

pub async fn get_rules(
    State(store): State<RuleStore>,
    Path((scope, key)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = RuleRequest::new(parse_scope(&scope)?, key);
    store
        .merged_rules(&request)
        .map(markdown)
        .map_err(store_error)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
    pub scope: Option<String>,
    pub key: Option<String>,
}

pub async fn search_rules(
    State(store): State<RuleStore>,
    Query(params): Query<SearchParams>,
) -> Result<String, (StatusCode, String)> {
    let scope = params.scope.as_deref().map(parse_scope).transpose()?;
    let query = SearchQuery::new(params.keyword, scope, params.key).map_err(store_error)?;
    store.search(&query).map_err(store_error)
}
