//! Connection management
//!
//! The [`ConnectionManager`] owns the one connection handle a process uses.
//! It is created lazily by the first caller and reused by everyone after.
//!
//! ```text
//!   caller A ──┐
//!   caller B ──┼──► get_connection() ──► OnceCell ──► Connector::connect (once)
//!   caller C ──┘                            │
//!                                           ▼
//!                                   ConnectionHandle (shared)
//!                                           │
//!                            open_session() per query, never shared
//! ```
//!
//! Concurrent first callers wait on the same initialization. A failed
//! attempt leaves the cell empty, so the next call tries again.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::{GraphConfig, SettingsSource};
use crate::error::{GraphError, Result};
use crate::query::{CypherQuery, Record};

/// An established link to a graph database
#[async_trait]
pub trait GraphConnection: Send + Sync {
    /// Open a single-use session, targeting `database` if given
    async fn open_session(&self, database: Option<&str>) -> Result<Box<dyn GraphSession>>;

    /// Backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// A scoped unit of work against a [`GraphConnection`]
///
/// Implementations must release their resources when dropped as well as on
/// [`close`](GraphSession::close), so an abandoned call cannot leak them.
#[async_trait]
pub trait GraphSession: Send {
    /// Run one query and materialize every row
    async fn run(&mut self, query: &CypherQuery) -> Result<Vec<Record>>;

    /// Release the session
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Creates connections from validated configuration
#[async_trait]
pub trait Connector: Send + Sync {
    /// Authenticate and return a ready connection
    async fn connect(&self, config: &GraphConfig) -> Result<Arc<dyn GraphConnection>>;
}

/// The shared connection plus the database sessions should target
#[derive(Clone)]
pub struct ConnectionHandle {
    connection: Arc<dyn GraphConnection>,
    uri: String,
    database: Option<String>,
}

impl ConnectionHandle {
    /// Open a session on the configured database (or the server default)
    pub async fn open_session(&self) -> Result<Box<dyn GraphSession>> {
        self.connection.open_session(self.database.as_deref()).await
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn backend(&self) -> &'static str {
        self.connection.name()
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("backend", &self.connection.name())
            .field("uri", &self.uri)
            .field("database", &self.database)
            .finish()
    }
}

/// Owns the process-wide connection
pub struct ConnectionManager {
    settings: Arc<dyn SettingsSource>,
    connector: Arc<dyn Connector>,
    handle: OnceCell<ConnectionHandle>,
}

impl ConnectionManager {
    /// Create a manager; nothing is read or connected until first use
    pub fn new(settings: Arc<dyn SettingsSource>, connector: Arc<dyn Connector>) -> Self {
        Self {
            settings,
            connector,
            handle: OnceCell::new(),
        }
    }

    /// Get the shared connection, creating it on first use.
    ///
    /// Settings are validated before the connector is touched, so missing
    /// configuration never causes a network attempt.
    pub async fn get_connection(&self) -> Result<&ConnectionHandle> {
        self.handle
            .get_or_try_init(|| async {
                let config = self.settings.load().validate()?;

                tracing::info!(
                    uri = %config.uri,
                    database = config.database.as_deref().unwrap_or("<default>"),
                    "Connecting to graph database"
                );

                let connection = self.connector.connect(&config).await.map_err(|e| {
                    tracing::warn!(uri = %config.uri, "Graph connection failed: {}", e);
                    e
                })?;

                tracing::info!(backend = connection.name(), "Graph connection ready");

                Ok::<_, GraphError>(ConnectionHandle {
                    connection,
                    uri: config.uri,
                    database: config.database,
                })
            })
            .await
    }

    /// Returns true once a connection has been created
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("handle", &self.handle.get())
            .finish()
    }
}
