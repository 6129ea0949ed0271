//! Notes list screen state.
//!
//! # Invariants
//! - Snapshots are applied in arrival order; none is dropped or reordered
//!   before it reaches the watch channel.
//! - A failed feed keeps the last notes and only sets `error`.
//! - Deletes do not touch `notes`; the live feed reflects them.

use crate::model::note::Note;
use crate::presentation::describe;
use crate::usecase::{DeleteNote, NoteUseCases, NotesFeed};
use futures::StreamExt;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const DELETE_FAILED: &str = "Failed to delete note";

/// Observable state of the notes list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListState {
    /// Store-supplied order.
    pub notes: Vec<Note>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for NotesListState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            is_loading: true,
            error: None,
        }
    }
}

/// Reducer for the notes list screen.
///
/// Owns one live subscription for as long as it exists.
pub struct NotesListReducer {
    state: Arc<watch::Sender<NotesListState>>,
    delete_note: DeleteNote,
    feed_task: Option<JoinHandle<()>>,
}

impl NotesListReducer {
    /// Starts consuming the live note feed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(use_cases: &NoteUseCases) -> Self {
        let (sender, _) = watch::channel(NotesListState::default());
        let state = Arc::new(sender);
        let feed = use_cases.get_notes.execute();
        let feed_task = tokio::spawn(run_feed(feed, Arc::clone(&state)));

        Self {
            state,
            delete_note: use_cases.delete_note.clone(),
            feed_task: Some(feed_task),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> NotesListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotesListState> {
        self.state.subscribe()
    }

    /// Requests deletion; only a failure changes state.
    pub async fn delete_note(&self, id: &str) {
        match self.delete_note.execute(id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("event=list_delete module=presentation status=unconfirmed");
            }
            Err(err) => {
                let message = describe(&err, DELETE_FAILED);
                self.state.send_modify(|state| state.error = Some(message));
            }
        }
    }

    /// Clears the error; observers are not woken when there is none.
    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|state| state.error.take().is_some());
    }

    /// Stops the feed and waits until its subscription is released.
    pub async fn close(mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for NotesListReducer {
    fn drop(&mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
    }
}

async fn run_feed(mut feed: NotesFeed, state: Arc<watch::Sender<NotesListState>>) {
    while let Some(event) = feed.next().await {
        match event {
            Ok(notes) => {
                debug!(
                    "event=list_snapshot module=presentation status=ok notes={}",
                    notes.len()
                );
                state.send_modify(|state| {
                    state.notes = notes;
                    state.is_loading = false;
                    state.error = None;
                });
            }
            Err(err) => {
                warn!("event=list_snapshot module=presentation status=error error={err}");
                let message = describe(&err, crate::usecase::UNKNOWN_ERROR_MESSAGE);
                state.send_modify(|state| {
                    state.is_loading = false;
                    state.error = Some(message);
                });
                return;
            }
        }
    }
    debug!("event=list_feed module=presentation status=closed");
}
