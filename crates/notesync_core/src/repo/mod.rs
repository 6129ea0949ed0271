//! Repository layer between the data source and the use cases.
//!
//! # Responsibility
//! - Convert wire records to domain notes and re-expose the live collection
//!   as a domain-level stream.
//! - Keep use cases ignorant of the store and its collection naming.
//!
//! # Invariants
//! - No caching and no retries: every call is a fresh store round trip.
//! - Client-supplied ids are never sent on creation.

pub mod note_repo;

#[cfg(test)]
pub(crate) mod fake;
