//! Note data source for one document collection.

use crate::model::note::NoteId;
use crate::source::record::NoteRecord;
use crate::source::stream::SnapshotStream;
use crate::store::{DocumentStore, StoreResult};
use log::{info, warn};
use std::sync::Arc;

/// Note operations against one collection of an injected document store.
#[derive(Clone)]
pub struct RemoteNoteDataSource {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RemoteNoteDataSource {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns a lazy stream of full collection snapshots.
    ///
    /// Each call yields an independent subscription.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(Arc::clone(&self.store), self.collection.clone())
    }

    /// Looks up one note; both "missing" and "store failed" yield `None`.
    pub async fn fetch_by_id(&self, id: &str) -> Option<NoteRecord> {
        match self.try_fetch_by_id(id).await {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=note_fetch module=source status=error collection={} error={err}",
                    self.collection
                );
                None
            }
        }
    }

    /// Looks up one note, keeping store failures apart from absence.
    pub async fn try_fetch_by_id(&self, id: &str) -> StoreResult<Option<NoteRecord>> {
        match self.store.get_document(&self.collection, id).await? {
            Some(document) => Ok(Some(NoteRecord::from_document(&document)?)),
            None => Ok(None),
        }
    }

    /// Creates a note and returns the store-assigned id. The record's own
    /// id, if any, is ignored.
    pub async fn create(&self, record: &NoteRecord) -> StoreResult<NoteId> {
        let fields = record.to_fields()?;
        let id = self.store.add_document(&self.collection, fields).await?;
        info!(
            "event=note_create module=source status=ok collection={}",
            self.collection
        );
        Ok(id)
    }

    /// Overwrites a note. Store failures are reported as `false`.
    pub async fn update(&self, record: &NoteRecord) -> bool {
        match self.try_update(record).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=note_update module=source status=error collection={} error={err}",
                    self.collection
                );
                false
            }
        }
    }

    pub async fn try_update(&self, record: &NoteRecord) -> StoreResult<()> {
        let fields = record.to_fields()?;
        self.store
            .set_document(&self.collection, &record.id, fields)
            .await
    }

    /// Deletes a note. Store failures are reported as `false`.
    pub async fn delete_by_id(&self, id: &str) -> bool {
        match self.try_delete_by_id(id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=note_delete module=source status=error collection={} error={err}",
                    self.collection
                );
                false
            }
        }
    }

    pub async fn try_delete_by_id(&self, id: &str) -> StoreResult<()> {
        self.store.delete_document(&self.collection, id).await
    }
}
