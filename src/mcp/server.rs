//! MCP Server handler for the harvester.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::{
    mcp::{DetectParams, HarvestParams},
    HarvestError, Harvester, PLUGIN_NAME,
};

/// Harvest MCP Server.
///
/// Implements the MCP ServerHandler trait, exposing the harvester as tools.
///
/// # Tools
///
/// - `harvest` - Harvest a CodeMeta document for a repository
/// - `detect` - Resolve a repository path to provider and project
#[derive(Clone)]
pub struct HarvestServer {
    harvester: Arc<Harvester>,
}

impl HarvestServer {
    /// Create a new HarvestServer configured from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn from_env() -> crate::Result<Self> {
        Ok(Self::new(Harvester::from_env()?))
    }

    /// Create a new HarvestServer with an existing harvester.
    pub fn new(harvester: Harvester) -> Self {
        Self {
            harvester: Arc::new(harvester),
        }
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Decode tool arguments; a missing object decodes as `{}`.
    fn arguments<T: DeserializeOwned>(
        args: serde_json::Map<String, serde_json::Value>,
    ) -> Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(args))
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }

    /// Convert HarvestError to McpError.
    fn to_mcp_error(err: HarvestError) -> McpError {
        match &err {
            HarvestError::NotFound { .. } => McpError::resource_not_found(err.to_string(), None),
            HarvestError::InvalidReference(_)
            | HarvestError::UnsupportedProvider { .. }
            | HarvestError::Config(_) => McpError::invalid_params(err.to_string(), None),
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    /// Handle the `harvest` tool.
    ///
    /// Returns the CodeMeta JSON-LD document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an MCP error if the path is not a supported repository or the
    /// provider request fails.
    pub async fn handle_harvest(&self, params: HarvestParams) -> Result<CallToolResult, McpError> {
        let record = match params.contributors {
            Some(enabled) => {
                let config = self.harvester.config().clone().with_contributors(enabled);
                Harvester::new(config).harvest(&params.path).await
            }
            None => self.harvester.harvest(&params.path).await,
        }
        .map_err(Self::to_mcp_error)?;

        let result = serde_json::to_string_pretty(&record.to_document())
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }

    /// Handle the `detect` tool.
    pub async fn handle_detect(&self, params: DetectParams) -> Result<CallToolResult, McpError> {
        let reference = self
            .harvester
            .detect(&params.path)
            .map_err(Self::to_mcp_error)?;
        let result = serde_json::to_string_pretty(&reference)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }
}

impl ServerHandler for HarvestServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: format!("{PLUGIN_NAME}-harvest"),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "CodeMeta harvester - Read project metadata from GitHub and GitLab repositories."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "harvest",
                "Harvest CodeMeta metadata (name, description, license, dates, \
                 keywords, languages, contributors, links) for a GitHub or GitLab \
                 repository URL.",
                Self::schema::<HarvestParams>(),
            ),
            Tool::new(
                "detect",
                "Resolve a repository URL, SSH remote, or local checkout to its \
                 provider, namespace, and project name without calling any API.",
                Self::schema::<DetectParams>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();

        match request.name.as_ref() {
            "harvest" => self.handle_harvest(Self::arguments(args)?).await,
            "detect" => self.handle_detect(Self::arguments(args)?).await,
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}
