//! Core state and table logic for the lead console.
//! This crate owns the lead/opportunity collections and their invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;

pub use config::{ConsoleConfig, LatencyProfile, RepositoryConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::conversion::{convert, opportunity_for};
pub use model::lead::{Lead, LeadDraft, LeadField, LeadFieldError, LeadStatus};
pub use model::new_record_id;
pub use model::opportunity::{Opportunity, INITIAL_STAGE};
pub use repo::lead_repo::{
    LeadRepository, LoadingFlag, MutationOutcome, RepoError, RepoResult, BULK_GENERATE_THRESHOLD,
};
pub use store::{
    KeyValueStore, MemoryKeyValueStore, PersistentStore, SqliteKeyValueStore, StoreError,
    StoreResult, LEADS_KEY, OPPORTUNITIES_KEY,
};
pub use view::{
    query, ColumnDef, ColumnVisibility, RowSelection, SortSpec, SortValue, TableRow, TableState,
    ViewResult, ViewSpec, DEFAULT_PAGE_SIZE,
};

/// Minimal health-check API for wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
