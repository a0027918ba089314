//! recommend_product tool

use serde_json::Value;

use shopgraph_core::catalog::{self, DEFAULT_RECOMMENDATION_LIMIT, RECOMMEND_PRODUCT};
use shopgraph_core::QueryExecutor;

use super::{ArgValue, Arguments, ParamKind, ParamSpec, ToolKind, ToolSpec};
use crate::error::{McpError, McpResult};

/// recommend_product tool definition
pub fn recommend_product_tool() -> ToolSpec {
    ToolSpec {
        name: "recommend_product",
        description: "Recommend products for a customer based on co-purchase behavior. Products the customer already bought are never recommended; results are ordered by score, highest first.",
        params: vec![
            ParamSpec::required(
                "customer_id",
                ParamKind::String,
                "The customer id property value (e.g., domain id), not elementId",
            ),
            ParamSpec::optional(
                "limit",
                ParamKind::Integer,
                "Max number of recommendations",
                ArgValue::Integer(i64::from(DEFAULT_RECOMMENDATION_LIMIT)),
            )
            .range(0, i64::from(u32::MAX)),
        ],
        template: &RECOMMEND_PRODUCT,
        kind: ToolKind::RecommendProduct,
    }
}

pub(crate) async fn call(executor: &QueryExecutor, args: &Arguments) -> McpResult<Value> {
    let customer_id = args.string("customer_id")?;
    let limit = u32::try_from(args.integer("limit")?)
        .map_err(|_| McpError::invalid("limit", "out of range"))?;

    let recommendations = catalog::recommend_product(executor, customer_id, limit).await?;
    tracing::debug!(
        customer_id,
        limit,
        rows = recommendations.len(),
        "recommend_product complete"
    );
    Ok(serde_json::to_value(recommendations)?)
}
