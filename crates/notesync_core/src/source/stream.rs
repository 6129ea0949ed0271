//! Cancellable snapshot stream over a collection listener.
//!
//! # Invariants
//! - Nothing is registered with the store until the stream is first polled.
//! - After an error item the stream is finished and the listener released.
//! - Dropping the stream releases the listener.

use crate::source::record::NoteRecord;
use crate::store::{
    Document, DocumentStore, ListenerRegistration, SnapshotListener, StoreError, StoreResult,
};
use futures::{Stream, StreamExt};
use log::{debug, warn};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

type SnapshotEvent = StoreResult<Vec<NoteRecord>>;

/// Stream of full note snapshots for one collection.
pub struct SnapshotStream {
    store: Arc<dyn DocumentStore>,
    collection: String,
    state: StreamState,
}

enum StreamState {
    Pending,
    Listening {
        events: UnboundedReceiverStream<SnapshotEvent>,
        _registration: ListenerRegistration,
    },
    Finished,
}

impl SnapshotStream {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self {
            store,
            collection,
            state: StreamState::Pending,
        }
    }

    /// Returns whether the underlying listener is currently registered.
    pub fn is_listening(&self) -> bool {
        matches!(self.state, StreamState::Listening { .. })
    }

    fn start(&self) -> StreamState {
        let (sender, receiver) = mpsc::unbounded_channel();
        let collection = self.collection.clone();
        let listener: SnapshotListener = Arc::new(move |event: Result<&[Document], &StoreError>| {
            let message = match event {
                Ok(documents) => Ok(decode_snapshot(&collection, documents)),
                Err(err) => Err(StoreError::Listener(err.to_string())),
            };
            // The receiver is gone only once the stream is dropped, which
            // also removes this listener.
            let _ = sender.send(message);
        });

        let registration = self.store.subscribe_collection(&self.collection, listener);
        debug!(
            "event=subscribe module=source status=ok collection={}",
            self.collection
        );
        StreamState::Listening {
            events: UnboundedReceiverStream::new(receiver),
            _registration: registration,
        }
    }
}

impl Stream for SnapshotStream {
    type Item = SnapshotEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                StreamState::Pending => this.state = this.start(),
                StreamState::Listening { events, .. } => {
                    let next = match events.poll_next_unpin(cx) {
                        Poll::Ready(next) => next,
                        Poll::Pending => return Poll::Pending,
                    };
                    return match next {
                        Some(Ok(records)) => Poll::Ready(Some(Ok(records))),
                        Some(Err(err)) => {
                            warn!(
                                "event=subscribe module=source status=error collection={} error={}",
                                this.collection, err
                            );
                            this.state = StreamState::Finished;
                            Poll::Ready(Some(Err(err)))
                        }
                        None => {
                            this.state = StreamState::Finished;
                            Poll::Ready(None)
                        }
                    };
                }
                StreamState::Finished => return Poll::Ready(None),
            }
        }
    }
}

impl std::fmt::Debug for SnapshotStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStream")
            .field("collection", &self.collection)
            .field("listening", &self.is_listening())
            .finish()
    }
}

fn decode_snapshot(collection: &str, documents: &[Document]) -> Vec<NoteRecord> {
    documents
        .iter()
        .filter_map(|document| match NoteRecord::from_document(document) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=snapshot_decode module=source status=skipped collection={collection} error={err}"
                );
                None
            }
        })
        .collect()
}
