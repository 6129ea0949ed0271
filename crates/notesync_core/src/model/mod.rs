//! Domain model for notes.
//!
//! # Responsibility
//! - Define the canonical note record used by every layer above the store.
//!
//! # Invariants
//! - A persisted note always carries a non-empty, store-assigned id.
//! - Notes are flat records; there are no relations between them.

pub mod note;
