use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::usecase::NoteError;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;

/// Live note collection as seen by reducers.
pub type NotesFeed = BoxStream<'static, Result<Vec<Note>, NoteError>>;

/// Lists notes as a live feed. No validation.
#[derive(Clone)]
pub struct GetNotes {
    repo: Arc<dyn NoteRepository>,
}

impl GetNotes {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub fn execute(&self) -> NotesFeed {
        self.repo
            .notes()
            .map(|snapshot| snapshot.map_err(NoteError::from))
            .boxed()
    }
}
