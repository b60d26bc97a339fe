//! Lead/opportunity repository.
//!
//! # Responsibility
//! - Hydrate both collections from storage once, then stay authoritative.
//! - Provide add/update/delete/convert/bulk-add mutations.
//! - Expose a shared `loading` flag observers can poll mid-operation.
//!
//! # Invariants
//! - Collections keep insertion order.
//! - Lead status changes only through `convert_lead`, and only from `new`
//!   to `converted`.
//! - The repository performs no field validation.
//! - Calls before `initialize()` are declined without touching storage.

use crate::config::RepositoryConfig;
use crate::model::conversion;
use crate::model::lead::Lead;
use crate::model::opportunity::Opportunity;
use crate::store::{KeyValueStore, PersistentStore, StoreError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lead count under which bulk generation is offered.
pub const BULK_GENERATE_THRESHOLD: usize = 100;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error. Only storage failures surface as errors.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State changed and was persisted.
    Applied,
    /// Nothing matched; state is unchanged.
    Unchanged,
    /// Repository not initialized; the call was ignored.
    Declined,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    fn as_log_status(self) -> &'static str {
        match self {
            Self::Applied => "ok",
            Self::Unchanged | Self::Declined => "noop",
        }
    }
}

/// Cloneable read handle for the repository `loading` flag.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }
}

/// Lowers the loading flag when an operation exits, including on `?`.
struct LoadingGuard(LoadingFlag);

impl LoadingGuard {
    fn raise(flag: &LoadingFlag, delay: Duration) -> Self {
        flag.set(true);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        Self(flag.clone())
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// In-memory source of truth for leads and opportunities.
pub struct LeadRepository<S: KeyValueStore> {
    store: PersistentStore<S>,
    config: RepositoryConfig,
    leads: Vec<Lead>,
    opportunities: Vec<Opportunity>,
    loading: LoadingFlag,
    initialized: bool,
}

impl<S: KeyValueStore> LeadRepository<S> {
    /// Creates an empty, uninitialized repository over `kv`.
    pub fn new(kv: S) -> Self {
        Self::with_config(kv, RepositoryConfig::default())
    }

    pub fn with_config(kv: S, config: RepositoryConfig) -> Self {
        Self {
            store: PersistentStore::new(kv),
            config,
            leads: Vec::new(),
            opportunities: Vec::new(),
            loading: LoadingFlag::default(),
            initialized: false,
        }
    }

    /// Hydrates both collections from storage.
    ///
    /// Runs once; later calls return `Unchanged` without reading storage.
    ///
    /// # Errors
    /// - Returns `RepoError::Store` when reading or decoding fails; the
    ///   repository stays uninitialized.
    pub fn initialize(&mut self) -> RepoResult<MutationOutcome> {
        if self.initialized {
            return Ok(MutationOutcome::Unchanged);
        }

        let started_at = Instant::now();
        let _guard = LoadingGuard::raise(&self.loading, self.config.latency.initialize);

        let loaded = self
            .store
            .load_leads()
            .and_then(|leads| Ok((leads, self.store.load_opportunities()?)));
        let (leads, opportunities) = match loaded {
            Ok(collections) => collections,
            Err(err) => {
                error!(
                    "event=repo_init module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        self.leads = leads;
        self.opportunities = opportunities;
        self.initialized = true;
        info!(
            "event=repo_init module=repo status=ok leads={} opportunities={} duration_ms={}",
            self.leads.len(),
            self.opportunities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(MutationOutcome::Applied)
    }

    /// Appends one lead. The caller supplies a fresh id.
    pub fn add_lead(&mut self, lead: Lead) -> RepoResult<MutationOutcome> {
        if !self.accepts("lead_add") {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = LoadingGuard::raise(&self.loading, self.config.latency.add_lead);

        let lead_id = lead.id.clone();
        let mut updated = self.leads.clone();
        updated.push(lead);
        self.commit_leads("lead_add", updated)?;

        info!("event=lead_add module=repo status=ok lead_id={lead_id}");
        Ok(MutationOutcome::Applied)
    }

    /// Replaces the lead with the same id, keeping its position and its
    /// stored status. The status carried by `lead` is ignored.
    ///
    /// An unknown id leaves the collection unchanged; the unchanged
    /// collection is still written back.
    pub fn update_lead(&mut self, lead: Lead) -> RepoResult<MutationOutcome> {
        if !self.accepts("lead_update") {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = LoadingGuard::raise(&self.loading, self.config.latency.update_lead);

        let lead_id = lead.id.clone();
        let mut updated = self.leads.clone();
        let outcome = match updated.iter_mut().find(|existing| existing.id == lead.id) {
            Some(existing) => {
                *existing = Lead {
                    status: existing.status,
                    ..lead
                };
                MutationOutcome::Applied
            }
            None => MutationOutcome::Unchanged,
        };
        self.commit_leads("lead_update", updated)?;

        info!(
            "event=lead_update module=repo status={} lead_id={}",
            outcome.as_log_status(),
            lead_id
        );
        Ok(outcome)
    }

    /// Removes every lead whose id is in `ids`. Unknown ids are ignored.
    pub fn delete_leads<I, T>(&mut self, ids: I) -> RepoResult<MutationOutcome>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !self.accepts("lead_delete") {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = LoadingGuard::raise(&self.loading, self.config.latency.delete_leads);

        let ids: HashSet<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        let updated: Vec<Lead> = self
            .leads
            .iter()
            .filter(|lead| !ids.contains(&lead.id))
            .cloned()
            .collect();
        let removed = self.leads.len() - updated.len();
        self.commit_leads("lead_delete", updated)?;

        let outcome = if removed > 0 {
            MutationOutcome::Applied
        } else {
            MutationOutcome::Unchanged
        };
        info!(
            "event=lead_delete module=repo status={} requested={} removed={}",
            outcome.as_log_status(),
            ids.len(),
            removed
        );
        Ok(outcome)
    }

    /// Converts the lead with `id` into a new opportunity.
    ///
    /// The lead stays in the collection with status `converted`. A missing
    /// id or an already converted lead adds no opportunity; in both cases
    /// the unchanged leads are still written back.
    pub fn convert_lead(&mut self, id: &str) -> RepoResult<MutationOutcome> {
        if !self.accepts("lead_convert") {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = LoadingGuard::raise(&self.loading, self.config.latency.convert_lead);

        let mut leads = self.leads.clone();
        let created = leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .and_then(conversion::convert);

        let Some(opportunity) = created else {
            self.commit_leads("lead_convert", leads)?;
            info!("event=lead_convert module=repo status=noop lead_id={id}");
            return Ok(MutationOutcome::Unchanged);
        };

        let opportunity_id = opportunity.id.clone();
        let mut opportunities = self.opportunities.clone();
        opportunities.push(opportunity);

        if let Err(err) = self.store.save_all(&leads, &opportunities) {
            error!(
                "event=lead_convert module=repo status=error lead_id={} error={}",
                id, err
            );
            return Err(err.into());
        }
        self.leads = leads;
        self.opportunities = opportunities;

        info!(
            "event=lead_convert module=repo status=ok lead_id={} opportunity_id={}",
            id, opportunity_id
        );
        Ok(MutationOutcome::Applied)
    }

    /// Appends `new_leads` in input order. Ids are assumed unique.
    pub fn bulk_add_leads(&mut self, new_leads: Vec<Lead>) -> RepoResult<MutationOutcome> {
        if !self.accepts("lead_bulk_add") {
            return Ok(MutationOutcome::Declined);
        }
        let _guard = LoadingGuard::raise(&self.loading, self.config.latency.bulk_add_leads);

        let count = new_leads.len();
        let mut updated = self.leads.clone();
        updated.extend(new_leads);
        self.commit_leads("lead_bulk_add", updated)?;

        let outcome = if count > 0 {
            MutationOutcome::Applied
        } else {
            MutationOutcome::Unchanged
        };
        info!(
            "event=lead_bulk_add module=repo status={} added={} total={}",
            outcome.as_log_status(),
            count,
            self.leads.len()
        );
        Ok(outcome)
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn opportunities(&self) -> &[Opportunity] {
        &self.opportunities
    }

    pub fn find_lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Handle for observing `loading` from outside the owning thread.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether bulk generation should be offered for the current leads.
    pub fn can_bulk_generate(&self) -> bool {
        self.initialized && self.leads.len() < BULK_GENERATE_THRESHOLD
    }

    fn accepts(&self, event: &str) -> bool {
        if !self.initialized {
            warn!("event={event} module=repo status=declined reason=not_initialized");
        }
        self.initialized
    }

    fn commit_leads(&mut self, event: &str, updated: Vec<Lead>) -> RepoResult<()> {
        if let Err(err) = self.store.save_leads(&updated) {
            error!("event={event} module=repo status=error error={err}");
            return Err(err.into());
        }
        debug!(
            "event={event} module=repo status=persisted leads={}",
            updated.len()
        );
        self.leads = updated;
        Ok(())
    }
}
