//! Wire form of a note and its document mapping.

use crate::model::note::{Note, NoteId};
use crate::store::{Document, Fields, StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Note as stored in the document collection.
///
/// Only `title` and `description` travel as fields; `id` is the document id.
/// Missing fields decode to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRecord {
    #[serde(skip)]
    pub id: NoteId,
    pub title: String,
    pub description: String,
}

impl NoteRecord {
    /// Decodes a stored document, taking the id from the document itself.
    pub fn from_document(document: &Document) -> StoreResult<Self> {
        let mut record: Self =
            serde_json::from_value(serde_json::Value::Object(document.fields.clone()))?;
        record.id = document.id.clone();
        Ok(record)
    }

    /// Encodes the writable fields of this record.
    pub fn to_fields(&self) -> StoreResult<Fields> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields),
            other => Err(StoreError::Backend(format!(
                "note record encoded to non-object value: {other}"
            ))),
        }
    }

    /// Same record with the id cleared, for store-assigned creation.
    pub fn without_id(mut self) -> Self {
        self.id.clear();
        self
    }
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            description: note.description.clone(),
        }
    }
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note::with_id(record.id, record.title, record.description)
    }
}

#[cfg(test)]
mod tests {
    use super::NoteRecord;
    use crate::model::note::Note;
    use crate::store::Document;
    use serde_json::json;

    #[test]
    fn note_survives_record_mapping_unchanged() {
        let note = Note::with_id("n1", "  Title ", "Body\nline");
        let back = Note::from(NoteRecord::from(&note));
        assert_eq!(back, note);
    }

    #[test]
    fn fields_never_carry_the_id() {
        let record = NoteRecord::from(&Note::with_id("n1", "T", "D"));
        let fields = record.to_fields().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("title"), Some(&json!("T")));
        assert_eq!(fields.get("description"), Some(&json!("D")));
        assert!(!fields.contains_key("id"));
    }

    #[test]
    fn document_decoding_uses_document_id_and_defaults_missing_fields() {
        let fields = json!({ "title": "only title", "id": "ignored" });
        let document = Document {
            id: "doc-7".to_string(),
            fields: fields.as_object().cloned().unwrap(),
        };
        let record = NoteRecord::from_document(&document).unwrap();
        assert_eq!(record.id, "doc-7");
        assert_eq!(record.title, "only title");
        assert_eq!(record.description, "");
    }

    #[test]
    fn document_with_wrong_field_types_is_rejected() {
        let document = Document {
            id: "doc-8".to_string(),
            fields: json!({ "title": 42 }).as_object().cloned().unwrap(),
        };
        assert!(NoteRecord::from_document(&document).is_err());
    }

    #[test]
    fn without_id_clears_only_the_id() {
        let record = NoteRecord::from(&Note::with_id("n1", "T", "D")).without_id();
        assert!(record.id.is_empty());
        assert_eq!(record.title, "T");
    }
}
