//! Repository layer: in-memory ownership of console collections.
//!
//! # Responsibility
//! - Own the lead and opportunity collections for the process lifetime.
//! - Mirror every mutation into the persistent store.
//!
//! # Invariants
//! - In-memory state changes only after the corresponding write succeeds.
//! - Mutations are serialized through `&mut self`.

pub mod lead_repo;
