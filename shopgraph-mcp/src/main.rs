//! Shopgraph MCP Server Binary
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio), credentials from the environment or .env
//! NEO4J_URI=bolt://localhost:7687 NEO4J_USERNAME=neo4j NEO4J_PASSWORD=secret shopgraph-mcp
//!
//! # Or override on the command line
//! shopgraph-mcp --uri bolt://db:7687 --database shop
//! ```

use std::sync::Arc;

use clap::Parser;
use shopgraph_core::{ConnectionManager, EnvSettings, Neo4jConnector, Neo4jSettings};
use shopgraph_mcp::{McpServer, SERVER_NAME};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MCP server exposing customer search and co-purchase recommendations
#[derive(Debug, Parser)]
#[command(name = "shopgraph-mcp", version, about)]
struct Args {
    /// Bolt endpoint URI (overrides NEO4J_URI)
    #[arg(long)]
    uri: Option<String>,

    /// Username (overrides NEO4J_USERNAME)
    #[arg(long)]
    username: Option<String>,

    /// Password (overrides NEO4J_PASSWORD)
    #[arg(long)]
    password: Option<String>,

    /// Target database (overrides NEO4J_DATABASE)
    #[arg(long)]
    database: Option<String>,

    /// Bolt connection pool size
    #[arg(long, default_value_t = shopgraph_core::neo4j::DEFAULT_MAX_CONNECTIONS)]
    max_connections: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (to stderr so it doesn't interfere with stdio MCP)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopgraph_mcp=info,shopgraph_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load .env if present for local development
    dotenv::dotenv().ok();

    let args = Args::parse();

    tracing::info!("Starting {} v{}", SERVER_NAME, env!("CARGO_PKG_VERSION"));

    let overrides = Neo4jSettings {
        uri: args.uri,
        username: args.username,
        password: args.password,
        database: args.database,
    };

    // Nothing connects until the first tool call
    let connections = ConnectionManager::new(
        Arc::new(EnvSettings::with_overrides(overrides)),
        Arc::new(Neo4jConnector::new().max_connections(args.max_connections)),
    );
    let server = McpServer::new(Arc::new(connections));

    tracing::info!("MCP server ready, listening on stdio");
    server.run_stdio().await?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
