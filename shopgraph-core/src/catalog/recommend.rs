//! recommend_product
//!
//! Co-purchase collaborative filtering:
//!
//! 1. Find the customer `c` by its domain `id`.
//! 2. Collect the distinct products `p` that `c` bought.
//! 3. Find every other customer who bought any `p`.
//! 4. Collect what those customers bought, minus anything `c` already owns.
//! 5. Score each product by how many (other customer, purchase) paths reach
//!    it, then sort by score descending and productId ascending.
//!
//! A customer that does not exist or never bought anything gets an empty
//! list, not an error.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::query::{CypherQuery, QueryTemplate};

/// Recommendations returned when the caller gives no limit
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 5;

pub static RECOMMEND_PRODUCT: QueryTemplate = QueryTemplate {
    name: "recommend_product",
    text: "\
MATCH (c:Customer {id: $customer_id})-[:PURCHASED]->(:Order)-[:CONTAINS]->(:LineItem)-[:PRODUCT]->(p:Product)
WITH DISTINCT c, p
MATCH (p)<-[:PRODUCT]-(:LineItem)<-[:CONTAINS]-(:Order)<-[:PURCHASED]-(other:Customer)
WHERE other <> c
MATCH (other)-[:PURCHASED]->(:Order)-[:CONTAINS]->(:LineItem)-[:PRODUCT]->(rec:Product)
WHERE NOT (c)-[:PURCHASED]->(:Order)-[:CONTAINS]->(:LineItem)-[:PRODUCT]->(rec)
RETURN {
  productId: rec.id,
  title: rec.title,
  score: count(*)
} AS recommendation
ORDER BY recommendation.score DESC, recommendation.productId ASC
LIMIT $limit",
    params: &["customer_id", "limit"],
    columns: &["recommendation"],
};

/// A recommended product and its co-purchase score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    #[serde(rename = "productId")]
    pub product_id: String,

    pub title: Option<String>,

    /// Co-occurrence count, unweighted
    pub score: i64,
}

/// Recommend up to `limit` products for the customer with domain id `customer_id`
pub async fn recommend_product(
    executor: &QueryExecutor,
    customer_id: &str,
    limit: u32,
) -> Result<Vec<ProductRecommendation>> {
    let query = CypherQuery::new(&RECOMMEND_PRODUCT)
        .bind("customer_id", customer_id)?
        .bind("limit", limit)?;

    executor
        .execute(&query)
        .await?
        .into_iter()
        .map(|mut row| row.decode(RECOMMEND_PRODUCT.name, "recommendation"))
        .collect()
}
