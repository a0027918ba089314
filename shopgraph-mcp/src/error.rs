//! Error types for the Shopgraph MCP Server

use serde_json::Value;
use thiserror::Error;

use shopgraph_core::GraphError;

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur in the MCP server
#[derive(Error, Debug)]
pub enum McpError {
    /// No tool with this name in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An argument is missing, has the wrong type, or is out of range
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument { param: String, reason: String },

    /// Configuration, connection or query failure from the core
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    pub(crate) fn invalid(param: &str, reason: impl Into<String>) -> Self {
        McpError::InvalidArgument {
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable kind string returned to callers
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::UnknownTool(_) => "UnknownToolError",
            McpError::InvalidArgument { .. } => "InvalidArgumentError",
            McpError::Graph(e) => e.kind(),
            McpError::Serialization(_) => "SerializationError",
        }
    }

    /// Get error code for MCP protocol
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::UnknownTool(_) => -32601,
            McpError::InvalidArgument { .. } => -32602,
            McpError::Graph(GraphError::Configuration { .. }) => -32001,
            McpError::Graph(GraphError::Connection { .. }) => -32002,
            McpError::Graph(GraphError::QueryExecution { .. } | GraphError::Decode { .. }) => {
                -32003
            }
            McpError::Graph(_) => -32603,
            McpError::Serialization(_) => -32700,
        }
    }

    /// The structured `{kind, code, message}` body sent back to the caller
    pub fn to_structured(&self) -> Value {
        serde_json::json!({
            "kind": self.kind(),
            "code": self.error_code(),
            "message": self.to_string()
        })
    }
}
