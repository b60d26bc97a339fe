//! Table view derivation for lead and opportunity tables.
//!
//! # Responsibility
//! - Turn a collection plus declarative table state into the visible page.
//! - Keep per-table column rules (search text, facet, sort values) in one
//!   place so both tables share the same engine.
//!
//! # Invariants
//! - Derivation is pure: same rows and spec give the same result.
//! - Facet counts ignore the facet filter itself.
//! - Everything is recomputed per query; nothing is cached between calls.

pub mod columns;
pub mod query;
pub mod selection;
pub mod table_state;

pub use columns::{ColumnDef, SortValue, TableRow, LEAD_COLUMNS, OPPORTUNITY_COLUMNS};
pub use query::{query, ColumnVisibility, SortSpec, ViewResult, ViewSpec, DEFAULT_PAGE_SIZE};
pub use selection::RowSelection;
pub use table_state::TableState;
