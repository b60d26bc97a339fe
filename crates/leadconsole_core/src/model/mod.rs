//! Domain model for the lead console.
//!
//! # Responsibility
//! - Define the lead and opportunity records shared by storage and views.
//! - Hold the one-way lead conversion rule.
//!
//! # Invariants
//! - Record ids are opaque strings and never change once assigned.
//! - Lead status only ever moves from `new` to `converted`.

pub mod conversion;
pub mod lead;
pub mod opportunity;

use uuid::Uuid;

/// Generates a fresh opaque record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
