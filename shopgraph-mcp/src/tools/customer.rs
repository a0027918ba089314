//! search_customer tool

use serde_json::Value;

use shopgraph_core::catalog::{self, SEARCH_CUSTOMER};
use shopgraph_core::QueryExecutor;

use super::{Arguments, ParamKind, ParamSpec, ToolKind, ToolSpec};
use crate::error::McpResult;

/// search_customer tool definition
pub fn search_customer_tool() -> ToolSpec {
    ToolSpec {
        name: "search_customer",
        description: "Search for customers by name or email substring (case-insensitive). Returns at most 25 customers with their internal id and element id.",
        params: vec![ParamSpec::required(
            "q",
            ParamKind::String,
            "Search term to match against name or email",
        )
        .non_empty()],
        template: &SEARCH_CUSTOMER,
        kind: ToolKind::SearchCustomer,
    }
}

pub(crate) async fn call(executor: &QueryExecutor, args: &Arguments) -> McpResult<Value> {
    let customers = catalog::search_customer(executor, args.string("q")?).await?;
    tracing::debug!(rows = customers.len(), "search_customer complete");
    Ok(serde_json::to_value(customers)?)
}
