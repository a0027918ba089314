//! Tool dispatch
//!
//! Name lookup, argument validation, then the tool's handler. Holds no state
//! of its own beyond the catalog and the shared executor.

use std::sync::Arc;

use serde_json::Value;

use shopgraph_core::QueryExecutor;

use crate::error::{McpError, McpResult};
use crate::tools::{args, customer, recommend, ToolCatalog, ToolDefinition, ToolKind};

/// Routes tool calls to catalog handlers
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: Arc<ToolCatalog>,
    executor: QueryExecutor,
}

impl Dispatcher {
    /// Create a dispatcher over the standard catalog
    pub fn new(executor: QueryExecutor) -> Self {
        Self::with_catalog(ToolCatalog::standard(), executor)
    }

    pub fn with_catalog(catalog: ToolCatalog, executor: QueryExecutor) -> Self {
        Self {
            catalog: Arc::new(catalog),
            executor,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Tool definitions for `tools/list`
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.catalog.definitions()
    }

    /// Invoke `tool_name` with raw JSON `arguments`.
    ///
    /// Unknown names and invalid arguments fail before any query runs.
    pub async fn invoke(&self, tool_name: &str, arguments: &Value) -> McpResult<Value> {
        let spec = self
            .catalog
            .get(tool_name)
            .ok_or_else(|| McpError::UnknownTool(tool_name.to_string()))?;

        let args = args::validate(spec, arguments)?;
        tracing::debug!(tool = tool_name, "Invoking tool");

        match spec.kind {
            ToolKind::SearchCustomer => customer::call(&self.executor, &args).await,
            ToolKind::RecommendProduct => recommend::call(&self.executor, &args).await,
        }
    }
}
