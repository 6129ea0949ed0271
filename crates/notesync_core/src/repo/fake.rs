//! Scripted in-memory repository for use-case and reducer tests.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, NoteStream, RepoError, RepoResult};
use crate::store::StoreError;
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Scripted outcome of one repository call.
#[derive(Debug, Clone)]
pub(crate) enum Outcome<T> {
    Return(T),
    Fail(String),
}

impl<T: Clone> Outcome<T> {
    fn resolve(&self) -> RepoResult<T> {
        match self {
            Self::Return(value) => Ok(value.clone()),
            Self::Fail(message) => Err(RepoError::Remote(StoreError::Backend(message.clone()))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RepoCall {
    Get(String),
    Add(Note),
    Update(Note),
    Delete(String),
}

pub(crate) type FeedSender = mpsc::UnboundedSender<RepoResult<Vec<Note>>>;

pub(crate) struct FakeNoteRepository {
    calls: Mutex<Vec<RepoCall>>,
    feed: Mutex<Option<mpsc::UnboundedReceiver<RepoResult<Vec<Note>>>>>,
    get: Mutex<Outcome<Option<Note>>>,
    add: Mutex<Outcome<NoteId>>,
    update: Mutex<Outcome<bool>>,
    delete: Mutex<Outcome<bool>>,
}

impl FakeNoteRepository {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            feed: Mutex::new(None),
            get: Mutex::new(Outcome::Return(None)),
            add: Mutex::new(Outcome::Return("new-id".to_string())),
            update: Mutex::new(Outcome::Return(true)),
            delete: Mutex::new(Outcome::Return(true)),
        }
    }

    /// Attaches a test-driven feed; `notes()` hands it out once.
    pub(crate) fn with_feed() -> (Self, FeedSender) {
        let repo = Self::new();
        let (sender, receiver) = mpsc::unbounded_channel();
        *repo.feed.lock() = Some(receiver);
        (repo, sender)
    }

    pub(crate) fn on_get(&self, outcome: Outcome<Option<Note>>) {
        *self.get.lock() = outcome;
    }

    pub(crate) fn on_add(&self, outcome: Outcome<NoteId>) {
        *self.add.lock() = outcome;
    }

    pub(crate) fn on_update(&self, outcome: Outcome<bool>) {
        *self.update.lock() = outcome;
    }

    pub(crate) fn on_delete(&self, outcome: Outcome<bool>) {
        *self.delete.lock() = outcome;
    }

    pub(crate) fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NoteRepository for FakeNoteRepository {
    fn notes(&self) -> NoteStream {
        match self.feed.lock().take() {
            Some(receiver) => UnboundedReceiverStream::new(receiver).boxed(),
            None => futures::stream::empty().boxed(),
        }
    }

    async fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        self.calls.lock().push(RepoCall::Get(id.to_string()));
        let outcome = self.get.lock().clone();
        outcome.resolve()
    }

    async fn add_note(&self, note: &Note) -> RepoResult<NoteId> {
        self.calls.lock().push(RepoCall::Add(note.clone()));
        let outcome = self.add.lock().clone();
        outcome.resolve()
    }

    async fn update_note(&self, note: &Note) -> RepoResult<bool> {
        self.calls.lock().push(RepoCall::Update(note.clone()));
        let outcome = self.update.lock().clone();
        outcome.resolve()
    }

    async fn delete_note(&self, id: &str) -> RepoResult<bool> {
        self.calls.lock().push(RepoCall::Delete(id.to_string()));
        let outcome = self.delete.lock().clone();
        outcome.resolve()
    }
}
