//! Document store contract consumed by the note data source.
//!
//! # Responsibility
//! - Describe the minimal document-store surface the data source needs:
//!   one-shot add/get/set/delete plus live collection listeners.
//! - Host the SQLite-backed implementation used by the CLI and tests.
//!
//! # Invariants
//! - A store handle is constructed once and injected; nothing here is global.
//! - Listeners always receive a full collection snapshot, never a diff.
//! - Dropping a `ListenerRegistration` deregisters its listener.

use crate::db::DbError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod sqlite;

pub use sqlite::SqliteDocumentStore;

/// Field map of one document. The document id is never stored in here.
pub type Fields = serde_json::Map<String, serde_json::Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Live collection callback.
///
/// Invoked with the full current snapshot on registration and after every
/// change to the collection, or once with an error after which the listener
/// is dropped by the store. Implementations must return quickly and must not
/// call back into the store.
pub type SnapshotListener = Arc<dyn Fn(Result<&[Document], &StoreError>) + Send + Sync>;

/// One stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Document store adapter error.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Codec(serde_json::Error),
    InvalidCollection(String),
    InvalidDocumentId(String),
    /// A live listener failed; the subscription is over.
    Listener(String),
    /// Backend failure outside SQLite itself (worker task lost, store gone).
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "invalid document fields: {err}"),
            Self::InvalidCollection(name) => write!(f, "invalid collection name: `{name}`"),
            Self::InvalidDocumentId(id) => write!(f, "invalid document id: `{id}`"),
            Self::Listener(message) => write!(f, "{message}"),
            Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Handle that keeps a collection listener alive.
///
/// The listener is removed when the handle is dropped or `remove` is called.
#[must_use = "dropping the registration removes the listener immediately"]
pub struct ListenerRegistration {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl ListenerRegistration {
    pub fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// A registration with nothing to remove, used when the listener was
    /// rejected or already terminated during registration.
    pub fn detached() -> Self {
        Self { remove: None }
    }

    pub fn remove(mut self) {
        self.run_remove();
    }

    fn run_remove(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.run_remove();
    }
}

impl std::fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

/// Document store operations over named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns its store-assigned id.
    async fn add_document(&self, collection: &str, fields: Fields) -> StoreResult<String>;
    /// Returns `Ok(None)` when the id does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;
    /// Creates or fully overwrites the document with the given id.
    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;
    /// Deleting a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()>;
    /// Registers a live listener on `collection`.
    fn subscribe_collection(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> ListenerRegistration;
}

/// Checks a collection name: non-blank, no path separator.
pub fn validate_collection_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() || name != name.trim() || name.contains('/') {
        return Err(StoreError::InvalidCollection(name.to_string()));
    }
    Ok(())
}

/// Checks a document id: non-blank, no path separator.
pub fn validate_document_id(id: &str) -> StoreResult<()> {
    if id.trim().is_empty() || id.contains('/') {
        return Err(StoreError::InvalidDocumentId(id.to_string()));
    }
    Ok(())
}
