//! View-state reducers for the list and detail screens.
//!
//! # Responsibility
//! - Fold use-case outcomes into immutable state snapshots that a UI can
//!   observe through `tokio::sync::watch`.
//!
//! # Invariants
//! - Each reducer owns its own subscription and draft; nothing is shared
//!   between screens.
//! - Tearing a reducer down cancels its background work.

pub mod note_detail;
pub mod notes_list;

pub use note_detail::{NoteDetailReducer, NoteDetailState, SaveLatch};
pub use notes_list::{NotesListReducer, NotesListState};

use crate::usecase::NoteError;

fn describe(err: &NoteError, fallback: &str) -> String {
    let message = err.message();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
