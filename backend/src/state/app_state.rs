//! Application state
//!
//! Holds the injected collaborators: the document store, the table names it
//! is addressed with, and the Plaid client.

use crate::config::{Config, StoreBackend, TableNames};
use crate::plaid::PlaidClient;
use crate::store::{DocumentStore, MemoryStore, SqliteStore, StoreError};
use std::sync::Arc;
use tracing::info;

/// State handle shared by all handlers
pub type SharedState = Arc<AppState>;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    /// Document store for every table
    pub store: Arc<dyn DocumentStore>,
    /// Table names used with `store`
    pub tables: TableNames,
    /// Financial-data API client
    pub plaid: PlaidClient,
}

impl AppState {
    /// Create state from already-built collaborators
    pub fn new(store: Arc<dyn DocumentStore>, tables: TableNames, plaid: PlaidClient) -> Self {
        Self {
            store,
            tables,
            plaid,
        }
    }

    /// Build state from configuration, connecting to the selected store
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let store: Arc<dyn DocumentStore> = match &config.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory document store");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Sqlite { url } => {
                info!("Using SQLite document store");
                Arc::new(SqliteStore::connect(url).await?)
            }
        };

        let plaid = PlaidClient::new(
            reqwest::Client::new(),
            config.plaid.base_url(),
            config.plaid.client_id.clone(),
            config.plaid.secret.clone(),
        );

        Ok(Self::new(store, config.tables.clone(), plaid))
    }

    /// In-memory state with default table names, for tests and local runs
    pub fn in_memory(plaid: PlaidClient) -> Self {
        Self::new(Arc::new(MemoryStore::new()), TableNames::default(), plaid)
    }
}
