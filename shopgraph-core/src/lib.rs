//! # Shopgraph Core
//!
//! Graph-backed commerce tools for agents:
//!
//! - **Connection management**: one lazily created, process-wide connection
//!   shared by every call
//! - **Query execution**: one scoped session per query, always closed,
//!   rows fully materialized
//! - **Tool catalog**: `search_customer` and `recommend_product`, each a
//!   constant Cypher template with declared parameters and a typed result
//!
//! ## Architecture
//!
//! ```text
//! catalog::search_customer / catalog::recommend_product
//!        │  CypherQuery (template + bound params)
//!        ▼
//! ┌─────────────────┐     ┌───────────────────┐     ┌────────────────┐
//! │  QueryExecutor  │────►│ ConnectionManager │────►│   Connector    │
//! │ session per call│     │  OnceCell handle  │     │ neo4j / memory │
//! └─────────────────┘     └───────────────────┘     └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use shopgraph_core::{catalog, ConnectionManager, InMemoryGraph, Neo4jSettings, QueryExecutor};
//!
//! # tokio_test::block_on(async {
//! let graph = InMemoryGraph::new();
//! graph.add_customer("c1", "Alice Smith", "alice@example.com");
//!
//! let settings = Neo4jSettings::new()
//!     .uri("bolt://localhost:7687")
//!     .username("neo4j")
//!     .password("password");
//! let manager = ConnectionManager::new(Arc::new(settings), Arc::new(graph));
//! let executor = QueryExecutor::new(Arc::new(manager));
//!
//! let customers = catalog::search_customer(&executor, "ALICE").await.unwrap();
//! assert_eq!(customers.len(), 1);
//! # });
//! ```

pub mod catalog;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod memory;
pub mod neo4j;
pub mod query;

pub use catalog::{Customer, ProductRecommendation};
pub use config::{EnvSettings, GraphConfig, Neo4jSettings, SettingsSource};
pub use connection::{ConnectionHandle, ConnectionManager, Connector, GraphConnection, GraphSession};
pub use error::{GraphError, Result};
pub use executor::QueryExecutor;
pub use memory::InMemoryGraph;
pub use neo4j::Neo4jConnector;
pub use query::{CypherQuery, ParamValue, QueryTemplate, Record};
