//! search_customer

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::query::{CypherQuery, QueryTemplate};

/// Maximum number of customers one search returns
pub const SEARCH_RESULT_LIMIT: usize = 25;

/// Case-insensitive substring match on name or email, capped at 25 rows.
/// No ordering is imposed.
pub static SEARCH_CUSTOMER: QueryTemplate = QueryTemplate {
    name: "search_customer",
    text: "\
MATCH (c:Customer)
WHERE toLower(c.name) CONTAINS toLower($q)
   OR toLower(c.email) CONTAINS toLower($q)
RETURN {
  id: id(c),
  nodeId: elementId(c),
  name: c.name,
  email: c.email
} AS customer
LIMIT 25",
    params: &["q"],
    columns: &["customer"],
};

/// A customer search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Database identity at query time
    pub id: i64,

    /// Stable element identifier
    #[serde(rename = "nodeId")]
    pub node_id: String,

    pub name: Option<String>,

    pub email: Option<String>,
}

/// Find customers whose name or email contains `q`, ignoring case
pub async fn search_customer(executor: &QueryExecutor, q: &str) -> Result<Vec<Customer>> {
    let query = CypherQuery::new(&SEARCH_CUSTOMER).bind("q", q)?;

    executor
        .execute(&query)
        .await?
        .into_iter()
        .map(|mut row| row.decode(SEARCH_CUSTOMER.name, "customer"))
        .collect()
}
