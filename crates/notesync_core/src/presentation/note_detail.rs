//! Note detail (create/edit) screen state.
//!
//! # Invariants
//! - Create vs edit mode is fixed at construction.
//! - `SaveLatch` only ever goes from unset to set.
//! - A blank draft never reaches a use case.

use crate::model::note::{is_blank, NoteId};
use crate::presentation::describe;
use crate::usecase::{NoteError, NoteUseCases};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const NOTE_NOT_FOUND: &str = "Note not found";
const LOAD_FAILED: &str = "Failed to load note";
const EMPTY_DRAFT: &str = "Title and description cannot be empty";
const CREATE_FAILED: &str = "Failed to create note";
const UPDATE_FAILED: &str = "Failed to update note";

/// One-way "saved" flag for a screen session.
///
/// Observers treat its transition to set as the signal to leave the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveLatch(bool);

impl SaveLatch {
    pub fn is_set(self) -> bool {
        self.0
    }

    fn set(&mut self) {
        self.0 = true;
    }
}

/// Observable state of the detail screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDetailState {
    /// `None` until a note exists: always set in edit mode, set after the
    /// first successful save in create mode.
    pub id: Option<NoteId>,
    pub title: String,
    pub description: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_edit_mode: bool,
    pub saved: SaveLatch,
}

impl NoteDetailState {
    pub fn is_saved(&self) -> bool {
        self.saved.is_set()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Create,
    Edit(NoteId),
}

/// Reducer for creating a new note or editing an existing one.
pub struct NoteDetailReducer {
    state: Arc<watch::Sender<NoteDetailState>>,
    use_cases: NoteUseCases,
    mode: Mode,
    load_task: Option<JoinHandle<()>>,
}

impl NoteDetailReducer {
    /// Opens the screen. A non-blank `note_id` selects edit mode and starts
    /// loading that note.
    ///
    /// Must be called from within a Tokio runtime when `note_id` is given.
    pub fn new(use_cases: &NoteUseCases, note_id: Option<&str>) -> Self {
        let mode = match note_id {
            Some(id) if !is_blank(id) => Mode::Edit(id.to_string()),
            _ => Mode::Create,
        };

        let initial = match &mode {
            Mode::Create => NoteDetailState::default(),
            Mode::Edit(id) => NoteDetailState {
                id: Some(id.clone()),
                is_edit_mode: true,
                is_loading: true,
                ..NoteDetailState::default()
            },
        };
        let (sender, _) = watch::channel(initial);
        let state = Arc::new(sender);

        let load_task = match &mode {
            Mode::Create => None,
            Mode::Edit(id) => Some(tokio::spawn(load_note(
                use_cases.clone(),
                id.clone(),
                Arc::clone(&state),
            ))),
        };

        Self {
            state,
            use_cases: use_cases.clone(),
            mode,
            load_task,
        }
    }

    pub fn state(&self) -> NoteDetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NoteDetailState> {
        self.state.subscribe()
    }

    pub fn on_title_changed(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|state| state.title = title);
    }

    pub fn on_description_changed(&self, description: impl Into<String>) {
        let description = description.into();
        self.state
            .send_modify(|state| state.description = description);
    }

    /// Saves the current draft: adds in create mode, updates the fixed id
    /// in edit mode.
    pub async fn save_note(&self) {
        let (title, description) = {
            let draft = self.state.borrow();
            (draft.title.clone(), draft.description.clone())
        };
        if is_blank(&title) || is_blank(&description) {
            self.state
                .send_modify(|state| state.error = Some(EMPTY_DRAFT.to_string()));
            return;
        }

        self.state.send_modify(|state| state.is_loading = true);
        match &self.mode {
            Mode::Create => {
                let outcome = self.use_cases.add_note.execute(&title, &description).await;
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    match outcome {
                        Ok(id) => {
                            state.id = Some(id);
                            state.saved.set();
                        }
                        Err(err) => state.error = Some(describe(&err, CREATE_FAILED)),
                    }
                });
            }
            Mode::Edit(id) => {
                let outcome = self
                    .use_cases
                    .update_note
                    .execute(id, &title, &description)
                    .await;
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    match outcome {
                        Ok(true) => state.saved.set(),
                        Ok(false) => state.error = Some(UPDATE_FAILED.to_string()),
                        Err(err) => state.error = Some(describe(&err, UPDATE_FAILED)),
                    }
                });
            }
        }

        let saved = self.state.borrow().is_saved();
        if saved {
            info!("event=detail_save module=presentation status=ok");
        } else {
            warn!("event=detail_save module=presentation status=error");
        }
    }

    pub fn clear_error(&self) {
        self.state
            .send_if_modified(|state| state.error.take().is_some());
    }

    /// Cancels an in-flight load and waits for it to stop.
    pub async fn close(mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for NoteDetailReducer {
    fn drop(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
    }
}

async fn load_note(use_cases: NoteUseCases, id: NoteId, state: Arc<watch::Sender<NoteDetailState>>) {
    let outcome = use_cases.get_note_by_id.execute(&id).await;
    state.send_modify(|state| {
        state.is_loading = false;
        match outcome {
            Ok(Some(note)) => {
                state.title = note.title;
                state.description = note.description;
            }
            Ok(None) => {
                let err = NoteError::NotFound(NOTE_NOT_FOUND.to_string());
                state.error = Some(err.to_string());
            }
            Err(err) => state.error = Some(describe(&err, LOAD_FAILED)),
        }
    });
}
