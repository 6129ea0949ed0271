use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::usecase::{
    require_not_blank, UseCaseResult, DESCRIPTION_REQUIRED, ID_REQUIRED, TITLE_REQUIRED,
};
use log::{info, warn};
use std::sync::Arc;

/// Overwrites an existing note.
#[derive(Clone)]
pub struct UpdateNote {
    repo: Arc<dyn NoteRepository>,
}

impl UpdateNote {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// Validates, trims and persists.
    ///
    /// `Ok(false)` means the call ran but the store did not confirm the
    /// write.
    pub async fn execute(&self, id: &str, title: &str, description: &str) -> UseCaseResult<bool> {
        require_not_blank(id, ID_REQUIRED)?;
        require_not_blank(title, TITLE_REQUIRED)?;
        require_not_blank(description, DESCRIPTION_REQUIRED)?;

        let note = Note::with_id(id, title.trim(), description.trim());
        match self.repo.update_note(&note).await {
            Ok(confirmed) => {
                info!("event=note_update module=usecase status=ok confirmed={confirmed}");
                Ok(confirmed)
            }
            Err(err) => {
                warn!("event=note_update module=usecase status=error error={err}");
                Err(err.into())
            }
        }
    }
}
