//! MCP Server protocol implementation
//!
//! This module handles the MCP JSON-RPC protocol over stdio: one JSON
//! message per line. Each request is handled on its own task; responses go
//! through a single writer so lines never interleave.

use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use shopgraph_core::{ConnectionManager, QueryExecutor};

use crate::dispatch::Dispatcher;
use crate::error::McpResult;
use crate::{SERVER_INSTRUCTIONS, SERVER_NAME, SERVER_VERSION};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct MCPRequest {
    #[serde(default)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct MCPResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MCPError>,
}

#[derive(Debug, Serialize)]
pub struct MCPError {
    pub code: i32,
    pub message: String,
}

impl MCPResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(MCPError { code, message }),
        }
    }
}

/// Tool call response
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error,
        }
    }

    /// Rendered payload on success; the structured error body otherwise
    fn from_outcome(outcome: McpResult<String>) -> Self {
        match outcome {
            Ok(text) => Self::text(text, false),
            Err(e) => Self::text(format!("{:#}", e.to_structured()), true),
        }
    }
}

/// The MCP server
#[derive(Debug, Clone)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a server whose tools run on `connections`
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self::with_dispatcher(Dispatcher::new(QueryExecutor::new(connections)))
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run the MCP server over stdio
    pub async fn run_stdio(&self) -> io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC until `reader` hits end of input.
    ///
    /// Returns after every in-flight request has written its response.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let server = self.clone();
        let reader_task = tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                let server = server.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(response) = server.handle_line(&line).await {
                        let _ = tx.send(response);
                    }
                });
            }
            Ok::<_, io::Error>(())
        });

        while let Some(response) = rx.recv().await {
            if let Err(e) = write_line(&mut writer, &response).await {
                // Nobody is listening any more; stop taking requests
                reader_task.abort();
                return Err(e);
            }
        }

        reader_task
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    /// Handle one raw line; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<MCPRequest>(line) {
            Ok(request) => self.handle_request(request).await?,
            Err(e) => MCPResponse::failure(Value::Null, -32700, format!("Parse error: {}", e)),
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                None
            }
        }
    }

    /// Handle an MCP request; `None` for notifications
    pub async fn handle_request(&self, request: MCPRequest) -> Option<MCPResponse> {
        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "ping" => serde_json::json!({}),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => match self.handle_tools_call(request.params).await {
                Ok(result) => result,
                Err(e) => return Some(MCPResponse::failure(id, e.error_code(), e.to_string())),
            },
            _ => {
                return Some(MCPResponse::failure(
                    id,
                    -32601,
                    format!("Method not found: {}", request.method),
                ));
            }
        };

        Some(MCPResponse::success(id, result))
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "capabilities": {
                "tools": {}
            },
            "instructions": SERVER_INSTRUCTIONS
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": self.dispatcher.definitions() })
    }

    async fn handle_tools_call(&self, params: Value) -> McpResult<Value> {
        let name = params
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string();

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let outcome = self.call_tool(&name, &arguments).await;
        if let Err(e) = &outcome {
            tracing::warn!(tool = %name, kind = e.kind(), "Tool call failed: {}", e);
        }

        Ok(serde_json::to_value(ToolResult::from_outcome(outcome))?)
    }

    async fn call_tool(&self, name: &str, arguments: &Value) -> McpResult<String> {
        let value = self.dispatcher.invoke(name, arguments).await?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
