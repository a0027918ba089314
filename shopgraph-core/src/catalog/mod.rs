//! Commerce tool catalog
//!
//! Each tool is a constant [`QueryTemplate`] plus a handler that binds the
//! caller's values, runs the query through the [`QueryExecutor`] and decodes
//! rows into a declared record type.
//!
//! Graph shape the templates assume:
//!
//! ```text
//! (:Customer {id, name, email})
//!     -[:PURCHASED]->(:Order)
//!     -[:CONTAINS]->(:LineItem)
//!     -[:PRODUCT]->(:Product {id, title})
//! ```
//!
//! [`QueryExecutor`]: crate::executor::QueryExecutor

pub mod customer;
pub mod recommend;

pub use customer::{search_customer, Customer, SEARCH_CUSTOMER, SEARCH_RESULT_LIMIT};
pub use recommend::{
    recommend_product, ProductRecommendation, DEFAULT_RECOMMENDATION_LIMIT, RECOMMEND_PRODUCT,
};

use crate::query::QueryTemplate;

/// Every template the catalog can execute
pub fn templates() -> [&'static QueryTemplate; 2] {
    [&SEARCH_CUSTOMER, &RECOMMEND_PRODUCT]
}
