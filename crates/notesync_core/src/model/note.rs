//! Note domain model.
//!
//! # Responsibility
//! - Define the `Note` record shared by repository, use cases and reducers.
//! - Provide the blank-input rule used by validation gates.
//!
//! # Invariants
//! - `id` is empty until the store assigns one at creation time.
//! - Once assigned, `id` never changes for the lifetime of the note.

use serde::{Deserialize, Serialize};

/// Store-assigned note identifier.
///
/// The empty string means "not yet persisted".
pub type NoteId = String;

/// Canonical domain record for one note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: String,
}

impl Note {
    /// Creates an unsaved note. The id is left empty for the store to assign.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(NoteId::new(), title, description)
    }

    /// Creates a note with a known id, as read back from the store.
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Returns whether the store has assigned this note an id.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Returns `true` for empty or whitespace-only input.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{is_blank, Note};

    #[test]
    fn new_note_is_not_persisted() {
        let note = Note::new("title", "body");
        assert!(note.id.is_empty());
        assert!(!note.is_persisted());
        assert!(Note::with_id("n1", "title", "body").is_persisted());
    }

    #[test]
    fn blank_covers_empty_and_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank(" a "));
    }
}
