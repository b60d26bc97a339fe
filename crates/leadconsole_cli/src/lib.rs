//! Console commands behind the `leadconsole_cli` binary.
//!
//! # Responsibility
//! - Run `summary` and `import` against a SQLite-backed store.
//! - Return structured reports; printing is left to the binary.

use leadconsole_core::db::open_db;
use leadconsole_core::{
    init_logging, ConsoleConfig, Lead, LeadRepository, LeadStatus, LoggingError, RepoError,
    SqliteKeyValueStore, StoreError, TableState, BULK_GENERATE_THRESHOLD,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    Logging(LoggingError),
    Store(StoreError),
    Repo(RepoError),
    ReadSeed {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseSeed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::ReadSeed { path, source } => {
                write!(f, "cannot read seed file `{}`: {source}", path.display())
            }
            Self::ParseSeed { path, source } => write!(
                f,
                "seed file `{}` is not a JSON array of leads: {source}",
                path.display()
            ),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ReadSeed { source, .. } => Some(source),
            Self::ParseSeed { source, .. } => Some(source),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Counts printed by `summary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub leads: usize,
    pub opportunities: usize,
    /// Lead count per status, in `LeadStatus::all()` order.
    pub by_status: Vec<(LeadStatus, usize)>,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "leads={}", self.leads)?;
        for (status, count) in &self.by_status {
            writeln!(f, "  {status}={count}")?;
        }
        write!(f, "opportunities={}", self.opportunities)
    }
}

/// Result of `import`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportReport {
    Imported { added: usize, total: usize },
    /// Store already holds enough leads; nothing was read into it.
    Skipped { existing: usize },
    /// Seed file was empty.
    Empty,
}

impl Display for ImportReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imported { added, total } => write!(f, "imported={added} total={total}"),
            Self::Skipped { existing } => write!(
                f,
                "skipped: store already holds {existing} leads (limit {BULK_GENERATE_THRESHOLD})"
            ),
            Self::Empty => f.write_str("nothing imported: seed file is empty"),
        }
    }
}

/// Starts file logging when `config.log_dir` is set.
pub fn start_logging(config: &ConsoleConfig) -> CliResult<()> {
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    Ok(())
}

pub fn summary(config: &ConsoleConfig) -> CliResult<Summary> {
    let conn = open_db(&config.db_path)?;
    let mut repo = LeadRepository::with_config(SqliteKeyValueStore::new(&conn), config.repository);
    repo.initialize()?;

    let view = TableState::<Lead>::new().view(repo.leads());
    Ok(Summary {
        leads: repo.leads().len(),
        opportunities: repo.opportunities().len(),
        by_status: LeadStatus::all()
            .into_iter()
            .map(|status| (status, view.facet_count(status.as_str())))
            .collect(),
    })
}

/// Appends the leads in `seed_path` while the store is under the
/// bulk-generation threshold.
///
/// The seed file is parsed before the database is opened, so a bad file
/// leaves the store untouched.
pub fn import(config: &ConsoleConfig, seed_path: &Path) -> CliResult<ImportReport> {
    let payload = std::fs::read_to_string(seed_path).map_err(|source| CliError::ReadSeed {
        path: seed_path.to_path_buf(),
        source,
    })?;
    let seed: Vec<Lead> = serde_json::from_str(&payload).map_err(|source| CliError::ParseSeed {
        path: seed_path.to_path_buf(),
        source,
    })?;

    let conn = open_db(&config.db_path)?;
    let mut repo = LeadRepository::with_config(SqliteKeyValueStore::new(&conn), config.repository);
    repo.initialize()?;

    if !repo.can_bulk_generate() {
        return Ok(ImportReport::Skipped {
            existing: repo.leads().len(),
        });
    }

    let added = seed.len();
    if !repo.bulk_add_leads(seed)?.is_applied() {
        return Ok(ImportReport::Empty);
    }
    Ok(ImportReport::Imported {
        added,
        total: repo.leads().len(),
    })
}
