//! Note repository contract and its data-source-backed implementation.
//!
//! # Invariants
//! - `notes()` preserves the source's emission timing and order.
//! - `update_note`/`delete_note` keep the data source's boolean contract.

use crate::model::note::{Note, NoteId};
use crate::source::record::NoteRecord;
use crate::source::remote::RemoteNoteDataSource;
use crate::store::StoreError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Live stream of full note collections.
pub type NoteStream = BoxStream<'static, RepoResult<Vec<Note>>>;

/// Repository error for note operations.
#[derive(Debug)]
pub enum RepoError {
    /// One-shot store call failed.
    Remote(StoreError),
    /// The live collection subscription failed and is over.
    Subscription(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(err) => write!(f, "{err}"),
            Self::Subscription(message) => write!(f, "{message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
            Self::Subscription(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Listener(message) => Self::Subscription(message),
            other => Self::Remote(other),
        }
    }
}

/// How `get_note` treats store failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupPolicy {
    /// Failures read as "absent".
    #[default]
    Lenient,
    /// Failures surface as `RepoError::Remote`.
    Strict,
}

/// Repository interface for note operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Live collection; each item is the full current set of notes.
    fn notes(&self) -> NoteStream;
    async fn get_note(&self, id: &str) -> RepoResult<Option<Note>>;
    /// Persists a new note and returns its store-assigned id.
    async fn add_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Returns whether the store confirmed the write.
    async fn update_note(&self, note: &Note) -> RepoResult<bool>;
    /// Returns whether the store confirmed the delete.
    async fn delete_note(&self, id: &str) -> RepoResult<bool>;
}

/// Repository backed by `RemoteNoteDataSource`.
#[derive(Clone)]
pub struct RemoteNoteRepository {
    source: RemoteNoteDataSource,
    lookup: LookupPolicy,
}

impl RemoteNoteRepository {
    pub fn new(source: RemoteNoteDataSource) -> Self {
        Self::with_lookup_policy(source, LookupPolicy::default())
    }

    pub fn with_lookup_policy(source: RemoteNoteDataSource, lookup: LookupPolicy) -> Self {
        Self { source, lookup }
    }
}

#[async_trait]
impl NoteRepository for RemoteNoteRepository {
    fn notes(&self) -> NoteStream {
        self.source
            .subscribe()
            .map(|snapshot| {
                snapshot
                    .map(|records| records.into_iter().map(Note::from).collect())
                    .map_err(RepoError::from)
            })
            .boxed()
    }

    async fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        let record = match self.lookup {
            LookupPolicy::Lenient => self.source.fetch_by_id(id).await,
            LookupPolicy::Strict => self.source.try_fetch_by_id(id).await?,
        };
        Ok(record.map(Note::from))
    }

    async fn add_note(&self, note: &Note) -> RepoResult<NoteId> {
        let record = NoteRecord::from(note).without_id();
        Ok(self.source.create(&record).await?)
    }

    async fn update_note(&self, note: &Note) -> RepoResult<bool> {
        Ok(self.source.update(&NoteRecord::from(note)).await)
    }

    async fn delete_note(&self, id: &str) -> RepoResult<bool> {
        Ok(self.source.delete_by_id(id).await)
    }
}
