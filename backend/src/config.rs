//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::plaid::PlaidEnvironment;
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Document store configuration
    pub store: StoreConfig,
    /// Table names
    pub tables: TableNames,
    /// Plaid configuration
    pub plaid: PlaidConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Which document store backend to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory, lost on restart (offline/local runs)
    Memory,
    /// SQLite database at the given URL
    Sqlite {
        /// `sqlite:` URL or path
        url: String,
    },
}

/// Document store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,
}

/// Physical table names for each logical collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    /// Grubber users
    pub grubber_users: String,
    /// Grubber restaurants
    pub grubber_restaurants: String,
    /// Grubber diets
    pub grubber_diets: String,
    /// Nellet users
    pub nellet_users: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            grubber_users: "grubber-users".to_string(),
            grubber_restaurants: "grubber-restaurants".to_string(),
            grubber_diets: "grubber-diets".to_string(),
            nellet_users: "nellet-users".to_string(),
        }
    }
}

/// Plaid configuration
#[derive(Clone)]
pub struct PlaidConfig {
    /// Plaid client id
    pub client_id: String,
    /// Plaid secret
    pub secret: String,
    /// Target environment
    pub environment: PlaidEnvironment,
    /// Explicit base URL, overrides `environment`
    pub base_url: Option<String>,
}

impl std::fmt::Debug for PlaidConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidConfig")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl PlaidConfig {
    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

/// Default SQLite location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/grubber.db";

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = TableNames::default();

        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            store: StoreConfig {
                backend: store_backend_from_env(),
            },
            tables: TableNames {
                grubber_users: env::var("TABLE_GRUBBER_USERS").unwrap_or(defaults.grubber_users),
                grubber_restaurants: env::var("TABLE_GRUBBER_RESTAURANTS")
                    .unwrap_or(defaults.grubber_restaurants),
                grubber_diets: env::var("TABLE_GRUBBER_DIETS").unwrap_or(defaults.grubber_diets),
                nellet_users: env::var("TABLE_NELLET_USERS").unwrap_or(defaults.nellet_users),
            },
            plaid: PlaidConfig {
                client_id: env::var("PLAID_CLIENT_ID").unwrap_or_default(),
                secret: env::var("PLAID_SECRET").unwrap_or_default(),
                environment: env::var("PLAID_ENV")
                    .ok()
                    .and_then(|e| match e.parse() {
                        Ok(environment) => Some(environment),
                        Err(err) => {
                            tracing::warn!("{}, falling back to sandbox", err);
                            None
                        }
                    })
                    .unwrap_or_default(),
                base_url: env::var("PLAID_BASE_URL").ok().filter(|u| !u.is_empty()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `STORE_BACKEND` wins; otherwise `NODE_ENV=production` selects SQLite
fn store_backend_from_env() -> StoreBackend {
    let database_url = || env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    match env::var("STORE_BACKEND").ok().as_deref() {
        Some("memory") => StoreBackend::Memory,
        Some("sqlite") => StoreBackend::Sqlite { url: database_url() },
        other => {
            if let Some(value) = other {
                tracing::warn!("Unknown STORE_BACKEND {:?}, using NODE_ENV", value);
            }
            let is_offline = env::var("NODE_ENV").map(|e| e != "production").unwrap_or(true);
            if is_offline {
                StoreBackend::Memory
            } else {
                StoreBackend::Sqlite { url: database_url() }
            }
        }
    }
}
