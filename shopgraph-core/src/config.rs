//! Connection settings
//!
//! Settings are read through a [`SettingsSource`] each time the connection
//! manager tries to connect, so a process started with an incomplete
//! environment recovers once the environment is fixed.

use std::fmt;

use crate::error::{GraphError, Result};

/// Environment variable holding the Bolt endpoint URI
pub const ENV_URI: &str = "NEO4J_URI";
/// Environment variable holding the username
pub const ENV_USERNAME: &str = "NEO4J_USERNAME";
/// Environment variable holding the password
pub const ENV_PASSWORD: &str = "NEO4J_PASSWORD";
/// Environment variable holding the optional target database
pub const ENV_DATABASE: &str = "NEO4J_DATABASE";

/// Raw, possibly incomplete connection settings
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Neo4jSettings {
    pub uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl Neo4jSettings {
    /// Create empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URI
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the target database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Neo4jSettings) -> Self {
        Self {
            uri: self.uri.or(fallback.uri),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            database: self.database.or(fallback.database),
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self {
            uri: std::env::var(ENV_URI).ok(),
            username: std::env::var(ENV_USERNAME).ok(),
            password: std::env::var(ENV_PASSWORD).ok(),
            database: std::env::var(ENV_DATABASE).ok(),
        }
    }

    /// Validate into a usable [`GraphConfig`].
    ///
    /// Every missing or empty required value is named in the error. An empty
    /// database name means "use the server default".
    pub fn validate(&self) -> Result<GraphConfig> {
        let missing: Vec<&str> = [
            (ENV_URI, &self.uri),
            (ENV_USERNAME, &self.username),
            (ENV_PASSWORD, &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            let reason = if missing.len() == 1 {
                format!("Environment variable {} is required", missing[0])
            } else {
                format!("Environment variables {} are required", missing.join(", "))
            };
            return Err(GraphError::Configuration { reason });
        }

        Ok(GraphConfig {
            uri: self.uri.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            database: self.database.clone().filter(|db| !db.is_empty()),
        })
    }
}

impl fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}

/// Validated connection configuration
#[derive(Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Where the connection manager gets its settings from
pub trait SettingsSource: Send + Sync {
    /// Load the current settings
    fn load(&self) -> Neo4jSettings;
}

impl SettingsSource for Neo4jSettings {
    fn load(&self) -> Neo4jSettings {
        self.clone()
    }
}

/// Environment-backed settings with explicit overrides (e.g. from CLI flags)
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    overrides: Neo4jSettings,
}

impl EnvSettings {
    /// Read everything from the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer `overrides` over the environment for every field they set
    pub fn with_overrides(overrides: Neo4jSettings) -> Self {
        Self { overrides }
    }
}

impl SettingsSource for EnvSettings {
    fn load(&self) -> Neo4jSettings {
        self.overrides.clone().or(Neo4jSettings::from_env())
    }
}
