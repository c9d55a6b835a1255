//! MCP request processing

use serde_json::Value;
use tracing::{debug, error};

use tvmcp_core::ToolInvocation;

use crate::{
    jsonrpc::{error_response, success_response, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION},
    protocol::{
        negotiate_version, CallToolParams, CallToolResult, Implementation, InitializeParams,
        InitializeResult, ListToolsResult, ServerCapabilities, ToolDescriptor, ToolsCapability,
        METHOD_INITIALIZE, METHOD_PING, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, SERVER_NAME,
    },
    McpError, McpResult, ToolRegistry,
};

/// Protocol front of the bridge: answers JSON-RPC messages using a registry
pub struct McpServer {
    registry: ToolRegistry,
    server_info: Implementation,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Process one JSON-RPC message.
    ///
    /// `Ok(None)` for notifications. `Err` only when no request could be
    /// read at all; errors tied to a request are answered with its id.
    pub async fn process_message(&self, body: &[u8]) -> McpResult<Option<JsonRpcResponse>> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            error!("Failed to parse JSON-RPC message: {}", e);
            McpError::Parse(e)
        })?;

        // MCP does not support batches
        if value.is_array() {
            return Err(McpError::InvalidRequest("Batch requests are not supported".to_string()));
        }

        let request: JsonRpcRequest = serde_json::from_value(value)
            .map_err(|e| McpError::InvalidRequest(e.to_string()))?;

        if request.jsonrpc != JSONRPC_VERSION {
            return Ok(Some(error_response(
                request.id,
                McpError::InvalidRequest("Invalid JSON-RPC version".to_string()).to_jsonrpc_error(),
            )));
        }

        debug!(method = %request.method, "processing message");

        if request.is_notification() {
            debug!(method = %request.method, "notification received, ignoring");
            return Ok(None);
        }

        let outcome = match request.method.as_str() {
            METHOD_INITIALIZE => self.handle_initialize(&request),
            METHOD_PING => Ok(serde_json::json!({})),
            METHOD_TOOLS_LIST => self.handle_tools_list(),
            METHOD_TOOLS_CALL => self.handle_tools_call(&request).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        Ok(Some(match outcome {
            Ok(result) => success_response(request.id, result),
            Err(e) => error_response(request.id, e.to_jsonrpc_error()),
        }))
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let params: InitializeParams = params_of(request)?;
        if let Some(client) = &params.client_info {
            debug!(client = %client.name, version = %client.version, "client initialized");
        }

        let response = InitializeResult {
            protocol_version: negotiate_version(&params.protocol_version).to_string(),
            capabilities: ServerCapabilities { tools: ToolsCapability { list_changed: true } },
            server_info: self.server_info.clone(),
            instructions: Some(
                "Control an Android TV device: launch apps, navigate, type, tap and take screenshots."
                    .to_string(),
            ),
        };
        Ok(serde_json::to_value(response)?)
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let tools = self.registry.catalog().iter().map(ToolDescriptor::from).collect();
        Ok(serde_json::to_value(ListToolsResult { tools, next_cursor: None })?)
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let params: CallToolParams = params_of(request)?;
        debug!(tool = %params.name, "calling tool");

        let invocation = ToolInvocation {
            tool_name: params.name,
            arguments: params.arguments.unwrap_or_default(),
        };
        let result = self.registry.dispatch(invocation).await;
        Ok(serde_json::to_value(CallToolResult::from(result))?)
    }
}

fn params_of<T: serde::de::DeserializeOwned>(request: &JsonRpcRequest) -> McpResult<T> {
    let params = request.params.clone().ok_or_else(|| {
        McpError::InvalidParams(format!("Missing params for {}", request.method))
    })?;
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}
