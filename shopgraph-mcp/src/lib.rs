//! Shopgraph MCP Server Library
//!
//! This crate implements the Model Context Protocol (MCP) server that lets
//! agents search customers and get co-purchase recommendations from a Neo4j
//! commerce graph.
//!
//! ## Architecture
//!
//! ```text
//! Agent (Claude, GPT, etc.)
//!        │  JSON-RPC over stdio
//!        ▼
//! ┌─────────────────┐
//! │   MCP Server    │ ◄── This crate
//! │                 │
//! │  ┌───────────┐  │
//! │  │ Dispatch  │  │ - name lookup
//! │  │           │  │ - argument coercion
//! │  └───────────┘  │
//! │  ┌───────────┐  │
//! │  │   Tools   │  │ - search_customer
//! │  │           │  │ - recommend_product
//! │  └───────────┘  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ shopgraph-core  │
//! │                 │
//! │ Executor │ Conn │
//! │ Catalog  │ Bolt │
//! └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopgraph_core::{ConnectionManager, EnvSettings, Neo4jConnector};
//! use shopgraph_mcp::McpServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let connections = ConnectionManager::new(
//!         Arc::new(EnvSettings::new()),
//!         Arc::new(Neo4jConnector::new()),
//!     );
//!     let server = McpServer::new(Arc::new(connections));
//!
//!     server.run_stdio().await.unwrap();
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod server;
pub mod tools;

pub use dispatch::Dispatcher;
pub use error::{McpError, McpResult};
pub use server::McpServer;
pub use tools::{ToolCatalog, ToolDefinition};

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "neo4j-mcp-ecommerce";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVER_INSTRUCTIONS: &str = "Customer search and product recommendations over an e-commerce graph. \
Use search_customer to find a customer, then pass the customer's domain id (not nodeId) to recommend_product.";
