//! Remote note data source over a `DocumentStore`.
//!
//! # Responsibility
//! - Own the wire form of a note (`NoteRecord`) and its field mapping.
//! - Turn the store's push-based collection listener into a cancellable
//!   stream of full snapshots.
//! - Expose one-shot fetch/create/update/delete calls for one collection.
//!
//! # Invariants
//! - The document id is never written as a field.
//! - Update/delete failures collapse to `false`; `try_*` variants keep them.

pub mod record;
pub mod remote;
pub mod stream;

pub use record::NoteRecord;
pub use remote::RemoteNoteDataSource;
pub use stream::SnapshotStream;
