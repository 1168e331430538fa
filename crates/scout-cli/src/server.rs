//! MCP server exposing the scout operations as tools over stdio.
//!
//! Every tool call goes through [`ScoutService::dispatch`], so malformed
//! arguments come back as a `{"success": false, ...}` payload like any other
//! failure. Only an unknown tool name is a protocol error.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    service::{RequestContext, RoleServer},
    transport::stdio,
};
use serde_json::Value;
use tracing::warn;

use scout_core::commands::{Operation, ScoutService, failure_payload};
use scout_core::error::ScoutError;

/// Wrap an operation payload as a single text content block.
fn text_result(payload: Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&payload)
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn tool_definition(operation: &Operation) -> Tool {
    Tool {
        name: operation.name().into(),
        title: None,
        description: Some(operation.description().into()),
        input_schema: Arc::new(operation.input_schema()),
        output_schema: None,
        icons: None,
        annotations: None,
        execution: None,
        meta: None,
    }
}

#[derive(Clone)]
pub struct ScoutServer {
    service: Arc<ScoutService>,
    tools: Arc<Vec<Tool>>,
}

impl ScoutServer {
    pub fn new(service: Arc<ScoutService>) -> Self {
        let tools = Operation::ALL.iter().map(tool_definition).collect();
        Self {
            service,
            tools: Arc::new(tools),
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Run one tool call.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let args = Value::Object(arguments.unwrap_or_default());
        match self.service.dispatch(name, args).await {
            Ok(payload) => text_result(payload),
            Err(err @ ScoutError::UnknownTool(_)) => {
                warn!(tool = %name, "call to unknown tool");
                Err(McpError::invalid_params(err.to_string(), None))
            }
            Err(err) => text_result(failure_payload(&err)),
        }
    }
}

impl ServerHandler for ScoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "scout".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Scout MCP Registry".to_string()),
                icons: None,
                website_url: None,
                description: None,
            },
            instructions: Some(
                "Find MCP servers with search/list, inspect them with get_details, and manage the local settings file with install, uninstall, update_config, list_installed and backup."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools.to_vec(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments).await
    }
}

/// Serve until the client disconnects.
pub async fn serve(service: Arc<ScoutService>) -> anyhow::Result<()> {
    tracing::info!("scout MCP server ready (stdio transport)");
    let running = ScoutServer::new(service).serve(stdio()).await?;
    let reason = running.waiting().await?;
    tracing::info!(?reason, "scout MCP server stopped");
    Ok(())
}
