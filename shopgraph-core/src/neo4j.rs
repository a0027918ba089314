//! Neo4j backend
//!
//! Uses `neo4rs` for async, pooled Bolt connections. `Graph::connect` only
//! builds the pool, so [`Neo4jConnector`] runs a `RETURN 1` ping to force the
//! real handshake and surface bad credentials on first use.

use std::sync::Arc;

use async_trait::async_trait;
use neo4rs::{BoltType, ConfigBuilder, Graph, Query, Row};
use serde_json::Value;

use crate::config::GraphConfig;
use crate::connection::{Connector, GraphConnection, GraphSession};
use crate::error::{GraphError, Result};
use crate::query::{CypherQuery, ParamValue, Record};

/// Default pool size per process
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;

/// Rows fetched per round-trip
pub const DEFAULT_FETCH_SIZE: usize = 256;

/// Connects to Neo4j over Bolt
#[derive(Debug, Clone)]
pub struct Neo4jConnector {
    max_connections: usize,
    fetch_size: usize,
}

impl Default for Neo4jConnector {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            fetch_size: DEFAULT_FETCH_SIZE,
        }
    }
}

impl Neo4jConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection pool size
    pub fn max_connections(mut self, n: usize) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the fetch size
    pub fn fetch_size(mut self, n: usize) -> Self {
        self.fetch_size = n;
        self
    }
}

#[async_trait]
impl Connector for Neo4jConnector {
    async fn connect(&self, config: &GraphConfig) -> Result<Arc<dyn GraphConnection>> {
        let connection_error = |e: neo4rs::Error| GraphError::Connection {
            uri: config.uri.clone(),
            reason: e.to_string(),
        };

        let neo_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .max_connections(self.max_connections)
            .fetch_size(self.fetch_size)
            .build()
            .map_err(connection_error)?;

        let graph = Graph::connect(neo_config).await.map_err(connection_error)?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(connection_error)?;

        Ok(Arc::new(Neo4jConnection { graph }))
    }
}

/// A pooled Neo4j connection
#[derive(Clone)]
pub struct Neo4jConnection {
    graph: Graph,
}

#[async_trait]
impl GraphConnection for Neo4jConnection {
    async fn open_session(&self, database: Option<&str>) -> Result<Box<dyn GraphSession>> {
        Ok(Box::new(Neo4jSession {
            graph: self.graph.clone(),
            database: database.map(str::to_string),
        }))
    }

    fn name(&self) -> &'static str {
        "neo4j"
    }
}

/// One unit of work on the pool.
///
/// The pooled Bolt connection is checked out for the duration of `run` and
/// returned when the row stream drops, so nothing outlives the query.
pub struct Neo4jSession {
    graph: Graph,
    database: Option<String>,
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&mut self, query: &CypherQuery) -> Result<Vec<Record>> {
        let name = query.name();
        let bolt_query = to_bolt_query(query);

        let mut stream = match &self.database {
            Some(db) => self.graph.execute_on(db.as_str(), bolt_query).await,
            None => self.graph.execute(bolt_query).await,
        }
        .map_err(|e| GraphError::query(name, e))?;

        let mut records = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| GraphError::query(name, e))? {
            records.push(to_record(query, &row)?);
        }

        Ok(records)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

fn to_bolt_query(query: &CypherQuery) -> Query {
    query
        .params()
        .iter()
        .fold(Query::new(query.text().to_string()), |q, (name, value)| {
            q.param(*name, to_bolt(value))
        })
}

fn to_bolt(value: &ParamValue) -> BoltType {
    match value {
        ParamValue::String(s) => BoltType::from(s.as_str()),
        ParamValue::Integer(i) => BoltType::from(*i),
    }
}

/// Pull the template's declared columns out of a Bolt row
fn to_record(query: &CypherQuery, row: &Row) -> Result<Record> {
    query
        .template()
        .columns
        .iter()
        .try_fold(Record::new(), |record, column| {
            let value: Value = row.get(*column).map_err(|e| GraphError::Decode {
                template: query.name().to_string(),
                column: column.to_string(),
                reason: e.to_string(),
            })?;
            Ok(record.with(*column, value))
        })
}
