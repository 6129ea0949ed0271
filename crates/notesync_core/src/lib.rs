//! Core logic for notesync.
//! This crate is the single source of truth for note invariants, from the
//! document store up to the observable screen state.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod source;
pub mod store;
pub mod usecase;

pub use config::{ConfigError, NoteSyncConfig};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::note::{Note, NoteId};
pub use presentation::{
    NoteDetailReducer, NoteDetailState, NotesListReducer, NotesListState, SaveLatch,
};
pub use repo::note_repo::{
    LookupPolicy, NoteRepository, RemoteNoteRepository, RepoError, RepoResult,
};
pub use source::{NoteRecord, RemoteNoteDataSource, SnapshotStream};
pub use store::{
    Document, DocumentStore, Fields, ListenerRegistration, SqliteDocumentStore, StoreError,
    StoreResult,
};
pub use usecase::{NoteError, NoteUseCases};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
