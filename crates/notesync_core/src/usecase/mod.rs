//! Note use cases.
//!
//! # Responsibility
//! - One small unit per operation (list, get, add, update, delete), each
//!   with its own validation gate.
//! - Normalize every outcome into `Result<_, NoteError>`.
//!
//! # Invariants
//! - Validation failures are returned before any repository call.
//! - Title and description are trimmed before they are persisted.
//! - Nothing but `NoteError` crosses this boundary upward.

use crate::model::note::is_blank;
use crate::repo::note_repo::{NoteRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod add_note;
mod delete_note;
mod get_note_by_id;
mod get_notes;
mod update_note;

pub use add_note::AddNote;
pub use delete_note::DeleteNote;
pub use get_note_by_id::GetNoteById;
pub use get_notes::{GetNotes, NotesFeed};
pub use update_note::UpdateNote;

pub(crate) const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";
const TITLE_REQUIRED: &str = "Title cannot be empty";
const DESCRIPTION_REQUIRED: &str = "Description cannot be empty";
const ID_REQUIRED: &str = "Note ID cannot be empty";

pub type UseCaseResult<T> = Result<T, NoteError>;

/// Failure taxonomy surfaced to reducers.
///
/// `Display` prints the bare message so callers can show it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    /// A required field was blank; detected before any I/O.
    InvalidArgument(String),
    /// A lookup found nothing.
    NotFound(String),
    /// A store call failed.
    RemoteOperationFailed(String),
    /// The live subscription failed and is over.
    SubscriptionFailed(String),
}

impl NoteError {
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(message)
            | Self::NotFound(message)
            | Self::RemoteOperationFailed(message)
            | Self::SubscriptionFailed(message) => message,
        }
    }
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for NoteError {}

impl From<RepoError> for NoteError {
    fn from(value: RepoError) -> Self {
        let message = non_empty_message(value.to_string());
        match value {
            RepoError::Remote(_) => Self::RemoteOperationFailed(message),
            RepoError::Subscription(_) => Self::SubscriptionFailed(message),
        }
    }
}

fn non_empty_message(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

fn require_not_blank(value: &str, message: &str) -> UseCaseResult<()> {
    if is_blank(value) {
        return Err(NoteError::InvalidArgument(message.to_string()));
    }
    Ok(())
}

/// All five note use cases over one repository.
#[derive(Clone)]
pub struct NoteUseCases {
    pub get_notes: GetNotes,
    pub get_note_by_id: GetNoteById,
    pub add_note: AddNote,
    pub update_note: UpdateNote,
    pub delete_note: DeleteNote,
}

impl NoteUseCases {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self {
            get_notes: GetNotes::new(Arc::clone(&repo)),
            get_note_by_id: GetNoteById::new(Arc::clone(&repo)),
            add_note: AddNote::new(Arc::clone(&repo)),
            update_note: UpdateNote::new(Arc::clone(&repo)),
            delete_note: DeleteNote::new(repo),
        }
    }
}
