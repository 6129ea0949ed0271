//! SQLite-backed document store with live collection listeners.
//!
//! # Responsibility
//! - Persist schemaless documents (`Fields` as JSON text) per collection.
//! - Re-read and push the full collection snapshot to listeners after every
//!   write that touches it.
//!
//! # Invariants
//! - The connection and the listener table share one lock, so a write, the
//!   snapshot re-read and the dispatch are a single step and listeners see
//!   snapshots in write order.
//! - Snapshot order is insertion order (`seq`); updates keep a document's
//!   position.
//! - A listener that received an error is removed from the table.

use crate::db::{open_db, open_db_in_memory};
use crate::store::{
    validate_collection_name, validate_document_id, Document, DocumentStore, Fields,
    ListenerRegistration, SnapshotListener, StoreError, StoreResult,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Document store over one SQLite connection.
///
/// Cloning is cheap and every clone shares the same connection and
/// listener table.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<StoreState>,
}

struct StoreState {
    conn: Connection,
    listeners: ListenerTable,
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: BTreeMap<u64, ListenerEntry>,
}

struct ListenerEntry {
    collection: String,
    listener: SnapshotListener,
}

impl SqliteDocumentStore {
    /// Opens (or creates) a store database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState {
                    conn,
                    listeners: ListenerTable::default(),
                }),
            }),
        }
    }

    /// Returns how many live listeners are registered on `collection`.
    pub fn listener_count(&self, collection: &str) -> usize {
        self.shared.state.lock().listeners.count(collection)
    }

    async fn run_blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Shared) -> StoreResult<T> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || op(&shared))
            .await
            .map_err(|err| StoreError::Backend(format!("store worker failed: {err}")))?
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn add_document(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        validate_collection_name(collection)?;
        let collection = collection.to_string();
        self.run_blocking(move |shared| shared.insert(&collection, &fields))
            .await
    }

    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;
        let collection = collection.to_string();
        let id = id.to_string();
        self.run_blocking(move |shared| {
            let state = shared.state.lock();
            read_document(&state.conn, &collection, &id)
        })
        .await
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;
        let collection = collection.to_string();
        let id = id.to_string();
        self.run_blocking(move |shared| shared.upsert(&collection, &id, &fields))
            .await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        validate_collection_name(collection)?;
        validate_document_id(id)?;
        let collection = collection.to_string();
        let id = id.to_string();
        self.run_blocking(move |shared| shared.delete(&collection, &id))
            .await
    }

    fn subscribe_collection(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> ListenerRegistration {
        if let Err(err) = validate_collection_name(collection) {
            (*listener)(Err(&err));
            return ListenerRegistration::detached();
        }

        let mut state = self.shared.state.lock();
        // Initial snapshot: a short local read, delivered before any later
        // write can be dispatched because the lock is held throughout.
        match read_collection(&state.conn, collection) {
            Ok(snapshot) => (*listener)(Ok(snapshot.as_slice())),
            Err(err) => {
                warn!(
                    "event=listener_register module=store status=error collection={collection} error={err}"
                );
                (*listener)(Err(&err));
                return ListenerRegistration::detached();
            }
        }
        let listener_id = state.listeners.insert(collection, listener);
        drop(state);

        debug!("event=listener_register module=store status=ok collection={collection} listener_id={listener_id}");
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        ListenerRegistration::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.state.lock().listeners.remove(listener_id);
                debug!("event=listener_remove module=store status=ok listener_id={listener_id}");
            }
        })
    }
}

impl Shared {
    fn insert(&self, collection: &str, fields: &Fields) -> StoreResult<String> {
        let encoded = serde_json::to_string(fields)?;
        let id = new_document_id();
        let mut state = self.state.lock();
        state.conn.execute(
            "INSERT INTO documents (collection, doc_id, fields) VALUES (?1, ?2, ?3);",
            params![collection, id, encoded],
        )?;
        state.publish(collection);
        info!("event=document_add module=store status=ok collection={collection}");
        Ok(id)
    }

    fn upsert(&self, collection: &str, id: &str, fields: &Fields) -> StoreResult<()> {
        let encoded = serde_json::to_string(fields)?;
        let mut state = self.state.lock();
        state.conn.execute(
            "INSERT INTO documents (collection, doc_id, fields) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, doc_id) DO UPDATE SET
                fields = excluded.fields,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![collection, id, encoded],
        )?;
        state.publish(collection);
        info!("event=document_set module=store status=ok collection={collection}");
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut state = self.state.lock();
        let changed = state.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id],
        )?;
        if changed > 0 {
            state.publish(collection);
        }
        info!("event=document_delete module=store status=ok collection={collection} changed={changed}");
        Ok(())
    }
}

impl StoreState {
    fn publish(&mut self, collection: &str) {
        if self.listeners.count(collection) == 0 {
            return;
        }

        match read_collection(&self.conn, collection) {
            Ok(snapshot) => {
                debug!(
                    "event=snapshot_publish module=store status=ok collection={collection} documents={}",
                    snapshot.len()
                );
                self.listeners.dispatch(collection, Ok(snapshot.as_slice()));
            }
            Err(err) => {
                warn!(
                    "event=snapshot_publish module=store status=error collection={collection} error={err}"
                );
                self.listeners.dispatch(collection, Err(&err));
                self.listeners.remove_collection(collection);
            }
        }
    }
}

impl ListenerTable {
    fn insert(&mut self, collection: &str, listener: SnapshotListener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(
            id,
            ListenerEntry {
                collection: collection.to_string(),
                listener,
            },
        );
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    fn remove_collection(&mut self, collection: &str) {
        self.entries.retain(|_, entry| entry.collection != collection);
    }

    fn count(&self, collection: &str) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.collection == collection)
            .count()
    }

    fn dispatch(&self, collection: &str, event: Result<&[Document], &StoreError>) {
        for entry in self
            .entries
            .values()
            .filter(|entry| entry.collection == collection)
        {
            (*entry.listener)(event);
        }
    }
}

fn read_collection(conn: &Connection, collection: &str) -> StoreResult<Vec<Document>> {
    let mut stmt = conn.prepare(
        "SELECT doc_id, fields
         FROM documents
         WHERE collection = ?1
         ORDER BY seq ASC;",
    )?;
    let mut rows = stmt.query([collection])?;
    let mut documents = Vec::new();
    while let Some(row) = rows.next()? {
        let id: String = row.get("doc_id")?;
        let fields: String = row.get("fields")?;
        documents.push(Document {
            id,
            fields: serde_json::from_str(&fields)?,
        });
    }
    Ok(documents)
}

fn read_document(conn: &Connection, collection: &str, id: &str) -> StoreResult<Option<Document>> {
    let fields: Option<String> = conn
        .query_row(
            "SELECT fields FROM documents WHERE collection = ?1 AND doc_id = ?2;",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;

    match fields {
        Some(fields) => Ok(Some(Document {
            id: id.to_string(),
            fields: serde_json::from_str(&fields)?,
        })),
        None => Ok(None),
    }
}

fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::new_document_id;

    #[test]
    fn generated_ids_are_unique_lowercase_hex() {
        let first = new_document_id();
        let second = new_document_id();
        assert_eq!(first.len(), 32);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_ne!(first, second);
    }
}
