//! Request types for MCP tools and prompts.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

use crate::models::RuleScope;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetRulesRequest {
    #[schemars(description = "Scope type: 'project', 'group', 'tech', or 'language'")]
    pub scope: RuleScope,
    #[schemars(description = "Scope key, e.g. a project path like 'org/repo' or a tech like 'react'")]
    #[serde(alias = "id")]
    pub key: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListScopeKeysRequest {
    #[schemars(description = "Scope type: 'project', 'group', 'tech', or 'language'")]
    pub scope: RuleScope,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchRulesRequest {
    #[schemars(description = "Keyword to search for (case-insensitive)")]
    pub keyword: String,
    #[schemars(description = "Optional: limit the search to rules for this scope. Requires key.")]
    #[serde(default)]
    pub scope: Option<RuleScope>,
    #[schemars(description = "Optional: scope key to limit the search to. Requires scope.")]
    #[serde(default, alias = "id")]
    pub key: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResolveScopesRequest {
    #[schemars(description = "Scope type: 'project', 'group', 'tech', or 'language'")]
    pub scope: RuleScope,
    #[schemars(description = "Scope key to resolve")]
    #[serde(alias = "id")]
    pub key: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DevelopmentRulesArgs {
    #[schemars(description = "Scope type: 'project', 'group', 'tech', or 'language'")]
    pub scope: RuleScope,
    #[schemars(description = "Scope key")]
    pub key: String,
}
