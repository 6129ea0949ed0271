use crate::repo::note_repo::NoteRepository;
use crate::usecase::{require_not_blank, UseCaseResult, ID_REQUIRED};
use log::{info, warn};
use std::sync::Arc;

/// Deletes a note by id.
#[derive(Clone)]
pub struct DeleteNote {
    repo: Arc<dyn NoteRepository>,
}

impl DeleteNote {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// `Ok(false)` means the store did not confirm the delete.
    pub async fn execute(&self, id: &str) -> UseCaseResult<bool> {
        require_not_blank(id, ID_REQUIRED)?;

        match self.repo.delete_note(id).await {
            Ok(confirmed) => {
                info!("event=note_delete module=usecase status=ok confirmed={confirmed}");
                Ok(confirmed)
            }
            Err(err) => {
                warn!("event=note_delete module=usecase status=error error={err}");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DeleteNote;
    use crate::repo::fake::{FakeNoteRepository, Outcome, RepoCall};
    use crate::usecase::NoteError;
    use std::sync::Arc;

    #[tokio::test]
    async fn blank_id_never_reaches_the_repository() {
        let repo = Arc::new(FakeNoteRepository::new());
        let use_case = DeleteNote::new(repo.clone());
        for id in ["", "   "] {
            let err = use_case.execute(id).await.unwrap_err();
            assert!(matches!(err, NoteError::InvalidArgument(_)));
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn passes_the_store_outcome_through() {
        let repo = Arc::new(FakeNoteRepository::new());
        let use_case = DeleteNote::new(repo.clone());
        assert!(use_case.execute("n1").await.unwrap());

        repo.on_delete(Outcome::Return(false));
        assert!(!use_case.execute("n1").await.unwrap());

        repo.on_delete(Outcome::Fail("offline".into()));
        let err = use_case.execute("n1").await.unwrap_err();
        assert_eq!(err, NoteError::RemoteOperationFailed("offline".into()));
        assert_eq!(repo.calls().len(), 3);
        assert_eq!(repo.calls()[0], RepoCall::Delete("n1".into()));
    }
}
