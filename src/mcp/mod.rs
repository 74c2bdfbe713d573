//! MCP server exposing scoped development rules.

mod types;

pub use types::*;

use rmcp::{
    handler::server::{router::prompt::PromptRouter, tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
        ListPromptsResult, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParam, PromptMessage, PromptMessageRole, RawResource,
        RawResourceTemplate, ReadResourceRequestParam, ReadResourceResult, Resource,
        ResourceContents, ResourceTemplate, ServerInfo,
    },
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};

use crate::engine::SearchQuery;
use crate::error::Error;
use crate::models::*;
use crate::store::RuleStore;

/// URI scheme for rule resources: `rules://{scope}/{key}`.
pub const RULES_URI_SCHEME: &str = "rules://";

#[derive(Clone)]
pub struct McpServer {
    store: RuleStore,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

impl McpServer {
    pub fn new(store: RuleStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    /// Map store errors: bad requests become `invalid_params`, anything
    /// wrong with the rules on disk becomes `internal_error`.
    fn store_err(e: Error) -> McpError {
        if e.is_request_error() {
            McpError::invalid_params(e.to_string(), None)
        } else {
            tracing::error!("Rule store error: {}", e);
            McpError::internal_error(e.to_string(), None)
        }
    }

    /// Split `rules://{scope}/{key}` into a request. Keys may contain `/`.
    pub fn parse_rules_uri(uri: &str) -> Result<RuleRequest, McpError> {
        let rest = uri.strip_prefix(RULES_URI_SCHEME).ok_or_else(|| {
            McpError::invalid_params(format!("Unknown resource URI: {}", uri), None)
        })?;
        let (scope, key) = rest
            .split_once('/')
            .filter(|(scope, key)| !scope.is_empty() && !key.is_empty())
            .ok_or_else(|| McpError::invalid_params("Scope and key are required", None))?;
        let scope = scope
            .parse::<RuleScope>()
            .map_err(|_| McpError::invalid_params(format!("Invalid scope: {}", scope), None))?;
        Ok(RuleRequest::new(scope, key))
    }

    // ============================================================
    // Tool logic, shared by the MCP tools and the test helpers
    // ============================================================

    pub fn test_get_rules(&self, scope: RuleScope, key: &str) -> Result<String, McpError> {
        self.store
            .merged_rules(&RuleRequest::new(scope, key))
            .map_err(Self::store_err)
    }

    pub fn test_list_scope_keys(&self, scope: RuleScope) -> Result<String, McpError> {
        let keys = self
            .store
            .available_scope_keys(scope)
            .map_err(Self::store_err)?;

        if keys.is_empty() {
            return Ok(format!("No {} keys defined.", scope));
        }

        let list: Vec<String> = keys.iter().map(|key| format!("- {}", key)).collect();
        Ok(format!("Available {} keys:\n\n{}", scope, list.join("\n")))
    }

    pub fn test_search_rules(
        &self,
        keyword: &str,
        scope: Option<RuleScope>,
        key: Option<&str>,
    ) -> Result<String, McpError> {
        let query = SearchQuery::new(keyword, scope, key.map(str::to_string))
            .map_err(Self::store_err)?;
        self.store.search(&query).map_err(Self::store_err)
    }

    pub fn test_resolve_scopes(
        &self,
        scope: RuleScope,
        key: &str,
    ) -> Result<ResolvedScopes, McpError> {
        self.store
            .resolve(&RuleRequest::new(scope, key))
            .map_err(Self::store_err)
    }

    pub fn test_get_mcp_instructions(&self) -> Result<String, McpError> {
        self.store.instructions().map_err(Self::store_err)
    }

    pub fn test_list_resources(&self) -> Result<Vec<Resource>, McpError> {
        let entries = self.store.all_scope_keys().map_err(Self::store_err)?;

        Ok(entries
            .into_iter()
            .flat_map(|(scope, keys)| {
                keys.into_iter().map(move |key| {
                    let mut raw = RawResource::new(
                        format!("{}{}/{}", RULES_URI_SCHEME, scope, key),
                        format!("{}-{}", scope, key),
                    );
                    raw.description = Some(format!("Rules for {} {}", scope, key));
                    raw.mime_type = Some("text/markdown".to_string());
                    raw.no_annotation()
                })
            })
            .collect())
    }

    pub fn test_list_resource_templates(&self) -> Vec<ResourceTemplate> {
        vec![RawResourceTemplate {
            uri_template: format!("{}{{scope}}/{{key}}", RULES_URI_SCHEME),
            name: "rules".to_string(),
            title: None,
            description: Some(
                "Merged development rules for a scope (project, group, tech, language) and key"
                    .to_string(),
            ),
            mime_type: Some("text/markdown".to_string()),
        }
        .no_annotation()]
    }

    pub fn test_read_resource(&self, uri: &str) -> Result<String, McpError> {
        let request = Self::parse_rules_uri(uri)?;
        self.store.merged_rules(&request).map_err(Self::store_err)
    }

    pub fn test_development_rules_prompt(
        &self,
        scope: RuleScope,
        key: &str,
    ) -> Result<String, McpError> {
        let rules = self.test_get_rules(scope, key)?;
        Ok(format!(
            "Here are the development rules for {}:{}:\n\n{}",
            scope, key, rules
        ))
    }
}

#[tool_router]
impl McpServer {
    #[tool(
        description = "Get the merged development rules for a scope and key. Resolves the key through the rules manifest (project memberships, tech dependencies, and the global group) and returns every matching rule as one markdown document. Call this before writing code for a project."
    )]
    async fn get_rules(
        &self,
        params: Parameters<GetRulesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let rules = self.test_get_rules(req.scope, &req.key)?;
        Ok(CallToolResult::success(vec![Content::text(rules)]))
    }

    #[tool(
        description = "List all keys defined in the rules manifest for a scope. Use this to discover valid keys for get_rules and search_rules."
    )]
    async fn list_scope_keys(
        &self,
        params: Parameters<ListScopeKeysRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.test_list_scope_keys(params.0.scope)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Search for rules containing a keyword (case-insensitive) in their content or description. Optionally limit the search to the rules that apply to a scope and key; scope and key must be provided together."
    )]
    async fn search_rules(
        &self,
        params: Parameters<SearchRulesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let text = self.test_search_rules(&req.keyword, req.scope, req.key.as_deref())?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Show which projects, groups, techs, and languages apply to a scope and key after following manifest memberships and tech dependencies. Useful for understanding why a rule is or is not included."
    )]
    async fn resolve_scopes(
        &self,
        params: Parameters<ResolveScopesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let scopes = self.test_resolve_scopes(req.scope, &req.key)?;

        let json = serde_json::to_string_pretty(&scopes)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get detailed instructions on how to use this MCP server effectively")]
    async fn get_mcp_instructions(&self) -> Result<CallToolResult, McpError> {
        let text = self.test_get_mcp_instructions()?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[prompt_router]
impl McpServer {
    #[prompt(
        name = "development-rules",
        description = "Get development rules as a system prompt for a scope and key (works with any AI editor)"
    )]
    async fn development_rules(
        &self,
        params: Parameters<DevelopmentRulesArgs>,
    ) -> Result<GetPromptResult, McpError> {
        let args = params.0;
        let text = self.test_development_rules_prompt(args.scope, &args.key)?;

        Ok(GetPromptResult {
            description: Some(format!("Development rules for {}:{}", args.scope, args.key)),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "rulekit".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            instructions: Some(
                r#"rulekit serves development rules scoped to projects, groups, techs, and languages.

SCOPES:
- project: a repository or service, e.g. 'org/service'. Expands to its groups, techs, and languages.
- group: a named set of rules shared across projects.
- tech: a framework or tool. Expands through its dependencies to other techs and languages.
- language: a programming language.
A global group from the manifest is included in every request unless USE_GLOBAL_RULES=false.

WORKFLOW:
1. Call list_scope_keys to find your project key (or a group, tech, or language).
2. Call get_rules with that scope and key before writing code.
3. Call search_rules to look up specific guidance by keyword.
4. Call resolve_scopes to see why a rule applies.

Rules are also available as resources at rules://{scope}/{key}, and as the
development-rules prompt."#
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.test_list_resources()?))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            self.test_list_resource_templates(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.test_read_resource(&request.uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

pub async fn run_stdio_server(store: RuleStore) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!(
        "Starting MCP server via stdio (rules: {})",
        store.config().rules_dir.display()
    );

    let service = McpServer::new(store);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
