use leadconsole_core::db::open_db;
use leadconsole_core::{
    KeyValueStore, LatencyProfile, Lead, LeadRepository, LeadStatus, MemoryKeyValueStore,
    MutationOutcome, RepoError, RepositoryConfig, SqliteKeyValueStore, StoreError,
    BULK_GENERATE_THRESHOLD, LEADS_KEY, OPPORTUNITIES_KEY,
};
use std::thread;
use std::time::{Duration, Instant};

fn lead(id: &str, name: &str, company: &str) -> Lead {
    Lead {
        id: id.to_string(),
        name: name.to_string(),
        company: company.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        source: "web".to_string(),
        score: 50.0,
        status: LeadStatus::New,
    }
}

fn ann() -> Lead {
    Lead {
        id: "1".to_string(),
        name: "Ann".to_string(),
        company: "Acme".to_string(),
        email: "a@acme.com".to_string(),
        source: "web".to_string(),
        score: 80.0,
        status: LeadStatus::New,
    }
}

fn ready(store: &MemoryKeyValueStore) -> LeadRepository<&MemoryKeyValueStore> {
    let mut repo = LeadRepository::new(store);
    repo.initialize().unwrap();
    repo
}

fn stored_leads(store: &MemoryKeyValueStore) -> Vec<Lead> {
    serde_json::from_str(&store.get(LEADS_KEY).unwrap().unwrap()).unwrap()
}

#[test]
fn initialize_on_empty_store_yields_empty_collections() {
    let store = MemoryKeyValueStore::new();
    let mut repo = LeadRepository::new(&store);
    assert!(!repo.is_initialized());

    assert_eq!(repo.initialize().unwrap(), MutationOutcome::Applied);
    assert!(repo.is_initialized());
    assert!(!repo.is_loading());
    assert!(repo.leads().is_empty());
    assert!(repo.opportunities().is_empty());
}

#[test]
fn initialize_runs_once() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    store.set(LEADS_KEY, "[]").unwrap();
    assert_eq!(repo.initialize().unwrap(), MutationOutcome::Unchanged);
    assert_eq!(repo.leads().len(), 1);
}

#[test]
fn add_lead_appends_and_persists() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);

    assert_eq!(repo.add_lead(ann()).unwrap(), MutationOutcome::Applied);
    assert_eq!(repo.leads(), &[ann()]);
    assert_eq!(stored_leads(&store), vec![ann()]);
}

#[test]
fn added_lead_survives_reload() {
    let store = MemoryKeyValueStore::new();
    {
        let mut repo = ready(&store);
        repo.add_lead(lead("a", "Bob", "Globex")).unwrap();
        repo.add_lead(ann()).unwrap();
    }

    let reloaded = ready(&store);
    assert_eq!(reloaded.leads().len(), 2);
    assert!(reloaded.leads().contains(&ann()));
    assert_eq!(reloaded.leads()[0].id, "a");
}

#[test]
fn sqlite_file_round_trip_restores_both_collections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("console.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut repo = LeadRepository::new(SqliteKeyValueStore::new(&conn));
        repo.initialize().unwrap();
        repo.add_lead(ann()).unwrap();
        repo.convert_lead("1").unwrap();
    }

    let conn = open_db(&path).unwrap();
    let mut repo = LeadRepository::new(SqliteKeyValueStore::new(&conn));
    repo.initialize().unwrap();
    assert_eq!(repo.leads().len(), 1);
    assert_eq!(repo.leads()[0].status, LeadStatus::Converted);
    assert_eq!(repo.opportunities().len(), 1);
    assert_eq!(repo.opportunities()[0].account_name, "Acme");
}

#[test]
fn update_lead_replaces_in_place() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.bulk_add_leads(vec![
        lead("a", "Bob", "Globex"),
        ann(),
        lead("c", "Cid", "Initech"),
    ])
    .unwrap();

    let mut edited = ann();
    edited.score = 95.0;
    edited.company = "Acme Corp".to_string();
    assert_eq!(repo.update_lead(edited.clone()).unwrap(), MutationOutcome::Applied);

    let ids: Vec<&str> = repo.leads().iter().map(|lead| lead.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "1", "c"]);
    assert_eq!(repo.leads()[1], edited);
    assert_eq!(stored_leads(&store)[1], edited);
}

#[test]
fn update_unknown_lead_is_silent_noop() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    let outcome = repo.update_lead(lead("missing", "Zed", "Nowhere")).unwrap();
    assert_eq!(outcome, MutationOutcome::Unchanged);
    assert_eq!(repo.leads(), &[ann()]);
    assert_eq!(stored_leads(&store), vec![ann()]);
}

#[test]
fn update_cannot_revert_converted_status() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();
    repo.convert_lead("1").unwrap();

    let mut edited = ann();
    edited.name = "Ann Lee".to_string();
    edited.status = LeadStatus::New;
    repo.update_lead(edited).unwrap();

    let stored = repo.find_lead("1").unwrap();
    assert_eq!(stored.name, "Ann Lee");
    assert_eq!(stored.status, LeadStatus::Converted);
}

#[test]
fn update_cannot_mark_lead_converted() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    let mut edited = ann();
    edited.source = "referral".to_string();
    edited.status = LeadStatus::Converted;
    assert_eq!(repo.update_lead(edited).unwrap(), MutationOutcome::Applied);

    let stored = repo.find_lead("1").unwrap();
    assert_eq!(stored.source, "referral");
    assert_eq!(stored.status, LeadStatus::New);
    assert_eq!(stored_leads(&store)[0].status, LeadStatus::New);

    assert_eq!(repo.convert_lead("1").unwrap(), MutationOutcome::Applied);
    assert_eq!(repo.opportunities().len(), 1);
}

#[test]
fn delete_leads_removes_matching_ids_only() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.bulk_add_leads(vec![
        lead("1", "Ann", "Acme"),
        lead("2", "Bob", "Globex"),
        lead("3", "Cid", "Initech"),
    ])
    .unwrap();

    assert_eq!(repo.delete_leads(["1", "2"]).unwrap(), MutationOutcome::Applied);
    let ids: Vec<&str> = repo.leads().iter().map(|lead| lead.id.as_str()).collect();
    assert_eq!(ids, vec!["3"]);
    assert_eq!(stored_leads(&store).len(), 1);
}

#[test]
fn delete_twice_matches_single_delete() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.bulk_add_leads(vec![lead("1", "Ann", "Acme"), lead("2", "Bob", "Globex")])
        .unwrap();

    let ids = vec!["1".to_string(), "missing".to_string()];
    repo.delete_leads(&ids).unwrap();
    let after_once = repo.leads().to_vec();

    assert_eq!(repo.delete_leads(&ids).unwrap(), MutationOutcome::Unchanged);
    assert_eq!(repo.leads(), after_once.as_slice());
}

#[test]
fn delete_leaves_opportunities_alone() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();
    repo.convert_lead("1").unwrap();

    repo.delete_leads(["1"]).unwrap();
    assert!(repo.leads().is_empty());
    assert_eq!(repo.opportunities().len(), 1);
}

#[test]
fn convert_lead_flips_status_and_appends_opportunity() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    assert_eq!(repo.convert_lead("1").unwrap(), MutationOutcome::Applied);
    assert_eq!(repo.leads().len(), 1);
    assert_eq!(repo.leads()[0].status, LeadStatus::Converted);

    let opportunities = repo.opportunities();
    assert_eq!(opportunities.len(), 1);
    assert_eq!(opportunities[0].name, "Opportunity for Ann");
    assert_eq!(opportunities[0].stage, "Prospecting");
    assert_eq!(opportunities[0].account_name, "Acme");
    assert_eq!(opportunities[0].amount, None);

    let persisted: serde_json::Value =
        serde_json::from_str(&store.get(OPPORTUNITIES_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted[0]["accountName"], "Acme");
    assert_eq!(stored_leads(&store)[0].status, LeadStatus::Converted);
}

#[test]
fn convert_unknown_lead_adds_no_opportunity() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    assert_eq!(repo.convert_lead("missing").unwrap(), MutationOutcome::Unchanged);
    assert_eq!(repo.leads(), &[ann()]);
    assert!(repo.opportunities().is_empty());
    assert!(!store.contains_key(OPPORTUNITIES_KEY));
}

#[test]
fn converting_twice_creates_one_opportunity() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    repo.convert_lead("1").unwrap();
    assert_eq!(repo.convert_lead("1").unwrap(), MutationOutcome::Unchanged);
    assert_eq!(repo.opportunities().len(), 1);
    assert_eq!(repo.leads()[0].status, LeadStatus::Converted);
}

#[test]
fn bulk_add_preserves_input_order_after_existing() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    let batch: Vec<Lead> = (0..5)
        .map(|index| lead(&format!("seed-{index}"), &format!("Seed {index}"), "Seed Co"))
        .collect();
    assert_eq!(repo.bulk_add_leads(batch).unwrap(), MutationOutcome::Applied);

    let ids: Vec<&str> = repo.leads().iter().map(|lead| lead.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "seed-0", "seed-1", "seed-2", "seed-3", "seed-4"]);
    assert_eq!(stored_leads(&store).len(), 6);
    assert_eq!(repo.bulk_add_leads(Vec::new()).unwrap(), MutationOutcome::Unchanged);
}

#[test]
fn bulk_generation_is_offered_below_threshold_only() {
    let store = MemoryKeyValueStore::new();
    let mut repo = LeadRepository::new(&store);
    assert!(!repo.can_bulk_generate());

    repo.initialize().unwrap();
    assert!(repo.can_bulk_generate());

    let batch: Vec<Lead> = (0..BULK_GENERATE_THRESHOLD)
        .map(|index| lead(&index.to_string(), "Seed", "Seed Co"))
        .collect();
    repo.bulk_add_leads(batch).unwrap();
    assert!(!repo.can_bulk_generate());
}

#[test]
fn mutations_before_initialize_are_declined() {
    let store = MemoryKeyValueStore::new();
    let mut repo = LeadRepository::new(&store);

    assert_eq!(repo.add_lead(ann()).unwrap(), MutationOutcome::Declined);
    assert_eq!(repo.update_lead(ann()).unwrap(), MutationOutcome::Declined);
    assert_eq!(repo.delete_leads(["1"]).unwrap(), MutationOutcome::Declined);
    assert_eq!(repo.convert_lead("1").unwrap(), MutationOutcome::Declined);
    assert_eq!(repo.bulk_add_leads(vec![ann()]).unwrap(), MutationOutcome::Declined);

    assert!(repo.leads().is_empty());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn write_failure_propagates_and_keeps_state() {
    let store = MemoryKeyValueStore::new();
    let mut repo = ready(&store);
    repo.add_lead(ann()).unwrap();

    store.set_fail_writes(true);
    let err = repo.add_lead(lead("2", "Bob", "Globex")).unwrap_err();
    assert!(matches!(err, RepoError::Store(StoreError::Unavailable(_))));
    assert_eq!(repo.leads(), &[ann()]);

    let err = repo.convert_lead("1").unwrap_err();
    assert!(matches!(err, RepoError::Store(_)));
    assert_eq!(repo.leads()[0].status, LeadStatus::New);
    assert!(repo.opportunities().is_empty());
    assert!(!repo.is_loading());

    store.set_fail_writes(false);
    assert_eq!(repo.convert_lead("1").unwrap(), MutationOutcome::Applied);
}

#[test]
fn initialize_accepts_fractional_scores() {
    let store = MemoryKeyValueStore::new();
    store
        .set(
            LEADS_KEY,
            r#"[{"id":"1","name":"Ann","company":"Acme","email":"a@acme.com","source":"web","score":72.5,"status":"new"},
                {"id":"2","name":"Bob","company":"Globex","email":"b@globex.com","source":"web","score":40,"status":"converted"}]"#,
        )
        .unwrap();

    let repo = ready(&store);
    assert_eq!(repo.leads().len(), 2);
    assert_eq!(repo.leads()[0].score, 72.5);
    assert_eq!(repo.leads()[1].score, 40.0);
    assert_eq!(repo.leads()[1].status, LeadStatus::Converted);
}

#[test]
fn corrupt_payload_fails_initialize() {
    let store = MemoryKeyValueStore::new();
    store.set(LEADS_KEY, "{not json").unwrap();

    let mut repo = LeadRepository::new(&store);
    let err = repo.initialize().unwrap_err();
    assert!(matches!(
        err,
        RepoError::Store(StoreError::Serialization { ref key, .. }) if key == LEADS_KEY
    ));
    assert!(!repo.is_initialized());
    assert!(!repo.is_loading());
}

#[test]
fn loading_flag_is_raised_while_operation_runs() {
    let latency = LatencyProfile {
        add_lead: Duration::from_millis(300),
        ..LatencyProfile::none()
    };
    let mut repo = LeadRepository::with_config(MemoryKeyValueStore::new(), RepositoryConfig { latency });
    repo.initialize().unwrap();
    let flag = repo.loading_flag();
    assert!(!flag.is_loading());

    let worker = thread::spawn(move || {
        repo.add_lead(ann()).unwrap();
        repo
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut observed = false;
    while Instant::now() < deadline {
        if flag.is_loading() {
            observed = true;
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }

    let repo = worker.join().unwrap();
    assert!(observed, "loading flag never observed as raised");
    assert!(!flag.is_loading());
    assert_eq!(repo.leads().len(), 1);
}

#[test]
fn demo_latency_matches_console_timings() {
    let demo = LatencyProfile::demo();
    assert_eq!(demo.initialize, Duration::from_millis(2000));
    assert_eq!(demo.delete_leads, Duration::from_millis(500));
    assert_eq!(demo.bulk_add_leads, Duration::from_millis(1500));
    assert_eq!(LatencyProfile::default(), LatencyProfile::none());
}
