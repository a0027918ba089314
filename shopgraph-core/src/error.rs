//! Error types for graph operations
//!
//! Every variant maps to a stable kind string that the MCP front-end returns
//! to callers unchanged:
//!
//! | Variant | Kind |
//! |---------|------|
//! | `Configuration` | `ConfigurationError` |
//! | `Connection` | `ConnectionError` |
//! | `QueryExecution`, `Decode` | `QueryExecutionError` |
//! | `UndeclaredParameter`, `UnboundParameter` | `InternalError` |

use thiserror::Error;

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while talking to the graph database
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    // ═══════════════════════════════════════════════════════════════════════
    // Connection lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    /// Required connection settings are missing or empty
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// The connection could not be established (handshake, auth, pool creation)
    #[error("Failed to connect to graph database at '{uri}': {reason}")]
    Connection { uri: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Query execution
    // ═══════════════════════════════════════════════════════════════════════

    /// The database rejected the query or the network failed mid-session
    #[error("Query '{template}' failed: {reason}")]
    QueryExecution { template: String, reason: String },

    /// A returned column could not be mapped into the declared record shape
    #[error("Failed to decode column '{column}' of query '{template}': {reason}")]
    Decode {
        template: String,
        column: String,
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Template binding (catalog programming errors)
    // ═══════════════════════════════════════════════════════════════════════

    /// A parameter was bound that the template does not declare
    #[error("Parameter '{param}' is not declared by query '{template}'")]
    UndeclaredParameter { template: String, param: String },

    /// A declared parameter was left unbound
    #[error("Query '{template}' is missing a value for parameter '{param}'")]
    UnboundParameter { template: String, param: String },
}

impl GraphError {
    /// Stable kind string surfaced to callers
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::Configuration { .. } => "ConfigurationError",
            GraphError::Connection { .. } => "ConnectionError",
            GraphError::QueryExecution { .. } | GraphError::Decode { .. } => {
                "QueryExecutionError"
            }
            GraphError::UndeclaredParameter { .. } | GraphError::UnboundParameter { .. } => {
                "InternalError"
            }
        }
    }

    /// Returns true if the same call might succeed later without any change
    /// on the caller's side.
    ///
    /// Configuration errors need the operator to fix the environment first;
    /// binding errors are bugs.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GraphError::Connection { .. } | GraphError::QueryExecution { .. }
        )
    }

    pub(crate) fn query(template: &str, reason: impl ToString) -> Self {
        GraphError::QueryExecution {
            template: template.to_string(),
            reason: reason.to_string(),
        }
    }
}
