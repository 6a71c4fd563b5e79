//! Document store module
//!
//! Key-value persistence for every table the service owns. Documents are
//! JSON objects keyed by their string `id` attribute.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A stored item: a JSON object with a string `id` attribute
pub type Document = Map<String, Value>;

/// Mutation applied to a stored document by [`DocumentStore::update`]
///
/// Returning an error aborts the update and leaves the stored document untouched.
pub type Mutation = Box<dyn FnOnce(&mut Document) -> Result<(), StoreError> + Send>;

/// Name of the key attribute every document carries
pub const KEY_ATTRIBUTE: &str = "id";

/// Errors raised by a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying database failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored body could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document has no string `id` attribute
    #[error("Document is missing a string `{KEY_ATTRIBUTE}` attribute")]
    MissingKey,

    /// The document content does not have the expected shape
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Operations every backend offers
///
/// All operations address a document by table name and key. `update` is the
/// only read-modify-write primitive and is atomic per document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in the table
    async fn scan(&self, table: &str) -> Result<Vec<Document>, StoreError>;

    /// Return the document with the given key, if any
    async fn get(&self, table: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert the document, replacing any existing one with the same key
    async fn put(&self, table: &str, document: Document) -> Result<(), StoreError>;

    /// Delete the document with the given key (no error if absent)
    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;

    /// Atomically apply `mutation` to an existing document
    ///
    /// # Returns
    /// * `Ok(Some(document))` - The document as stored after the mutation
    /// * `Ok(None)` - No document with that key exists; nothing was written
    /// * `Err(StoreError)` - The backend or the mutation failed; nothing was written
    async fn update(
        &self,
        table: &str,
        id: &str,
        mutation: Mutation,
    ) -> Result<Option<Document>, StoreError>;
}

/// Extract the key of a document
pub fn document_key(document: &Document) -> Result<&str, StoreError> {
    document
        .get(KEY_ATTRIBUTE)
        .and_then(Value::as_str)
        .ok_or(StoreError::MissingKey)
}

/// Serialize a typed record into a document
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
