use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::usecase::UseCaseResult;
use log::debug;
use std::sync::Arc;

/// Looks up one note. The id is passed through unchecked.
#[derive(Clone)]
pub struct GetNoteById {
    repo: Arc<dyn NoteRepository>,
}

impl GetNoteById {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// Returns `Ok(None)` when no note has this id.
    pub async fn execute(&self, id: &str) -> UseCaseResult<Option<Note>> {
        let note = self.repo.get_note(id).await?;
        debug!(
            "event=note_get module=usecase status=ok found={}",
            note.is_some()
        );
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::GetNoteById;
    use crate::model::note::Note;
    use crate::repo::fake::{FakeNoteRepository, Outcome, RepoCall};
    use crate::usecase::NoteError;
    use std::sync::Arc;

    #[tokio::test]
    async fn returns_found_and_absent_notes() {
        let repo = Arc::new(FakeNoteRepository::new());
        let use_case = GetNoteById::new(repo.clone());

        assert_eq!(use_case.execute("missing").await.unwrap(), None);

        let note = Note::with_id("n1", "X", "Y");
        repo.on_get(Outcome::Return(Some(note.clone())));
        assert_eq!(use_case.execute("n1").await.unwrap(), Some(note));
        assert_eq!(
            repo.calls(),
            vec![RepoCall::Get("missing".into()), RepoCall::Get("n1".into())]
        );
    }

    #[tokio::test]
    async fn repository_failure_becomes_remote_failure() {
        let repo = Arc::new(FakeNoteRepository::new());
        repo.on_get(Outcome::Fail("timeout".into()));
        let err = GetNoteById::new(repo).execute("n1").await.unwrap_err();
        assert_eq!(err, NoteError::RemoteOperationFailed("timeout".into()));
    }
}
