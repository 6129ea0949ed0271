use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::usecase::{require_not_blank, UseCaseResult, DESCRIPTION_REQUIRED, TITLE_REQUIRED};
use log::{info, warn};
use std::sync::Arc;

/// Creates a note from a title and description.
#[derive(Clone)]
pub struct AddNote {
    repo: Arc<dyn NoteRepository>,
}

impl AddNote {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// Validates, trims and persists; returns the store-assigned id.
    ///
    /// # Errors
    /// - `InvalidArgument` when title or description is blank.
    /// - `RemoteOperationFailed` when the store rejects the write.
    pub async fn execute(&self, title: &str, description: &str) -> UseCaseResult<NoteId> {
        require_not_blank(title, TITLE_REQUIRED)?;
        require_not_blank(description, DESCRIPTION_REQUIRED)?;

        let note = Note::new(title.trim(), description.trim());
        match self.repo.add_note(&note).await {
            Ok(id) => {
                info!("event=note_add module=usecase status=ok");
                Ok(id)
            }
            Err(err) => {
                warn!("event=note_add module=usecase status=error error={err}");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AddNote;
    use crate::model::note::Note;
    use crate::repo::fake::{FakeNoteRepository, Outcome, RepoCall};
    use crate::usecase::NoteError;
    use std::sync::Arc;

    #[tokio::test]
    async fn blank_fields_fail_before_any_repository_call() {
        let repo = Arc::new(FakeNoteRepository::new());
        let use_case = AddNote::new(repo.clone());

        for (title, description) in [("", "D"), ("   ", "D"), ("T", ""), ("T", " \t\n")] {
            let err = use_case.execute(title, description).await.unwrap_err();
            assert!(matches!(err, NoteError::InvalidArgument(_)), "{title:?}/{description:?}");
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_reported_first() {
        let use_case = AddNote::new(Arc::new(FakeNoteRepository::new()));
        let err = use_case.execute(" ", " ").await.unwrap_err();
        assert_eq!(err.message(), "Title cannot be empty");
    }

    #[tokio::test]
    async fn trims_fields_and_never_sends_an_id() {
        let repo = Arc::new(FakeNoteRepository::new());
        repo.on_add(Outcome::Return("n1".into()));

        let id = AddNote::new(repo.clone())
            .execute("  Buy milk  ", "\t2 litres ")
            .await
            .unwrap();

        assert_eq!(id, "n1");
        assert_eq!(
            repo.calls(),
            vec![RepoCall::Add(Note::new("Buy milk", "2 litres"))]
        );
    }

    #[tokio::test]
    async fn repository_failure_is_reported_with_its_message() {
        let repo = Arc::new(FakeNoteRepository::new());
        repo.on_add(Outcome::Fail("quota exceeded".into()));
        let err = AddNote::new(repo).execute("T", "D").await.unwrap_err();
        assert_eq!(err, NoteError::RemoteOperationFailed("quota exceeded".into()));
    }
}
