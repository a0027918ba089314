//! Query execution
//!
//! One call, one session: acquire the shared connection, open a session,
//! drain every row, close the session, and only then hand back the rows or
//! the error.

use std::sync::Arc;

use crate::connection::ConnectionManager;
use crate::error::Result;
use crate::query::{CypherQuery, Record};

/// Runs bound queries against the managed connection
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    connections: Arc<ConnectionManager>,
}

impl QueryExecutor {
    /// Create an executor over a shared connection manager
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    /// The connection manager this executor draws from
    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    /// Execute a query and return all of its rows.
    ///
    /// The session is closed before returning on both the success and the
    /// failure path. If the returned future is dropped mid-query, the
    /// session is released by its `Drop` instead; the shared connection is
    /// untouched either way.
    pub async fn execute(&self, query: &CypherQuery) -> Result<Vec<Record>> {
        query.ensure_bound()?;

        let handle = self.connections.get_connection().await?;
        let mut session = handle.open_session().await?;

        let outcome = session.run(query).await;

        if let Err(e) = session.close().await {
            // Rows are already materialized; a failed close does not void them
            tracing::warn!(query = query.name(), "Failed to close session: {}", e);
        }

        let rows = outcome?;
        tracing::debug!(query = query.name(), rows = rows.len(), "Query complete");
        Ok(rows)
    }
}
