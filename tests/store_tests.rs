/// Curation store tests over an in-memory storage port
use lead_finder_api::errors::AppError;
use lead_finder_api::integrity::ValidatedSnapshot;
use lead_finder_api::models::Lead;
use lead_finder_api::store::{CurationStore, StoragePort, EXPORT_HEADERS};
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
struct MemoryStorage {
    contents: Arc<Mutex<Option<String>>>,
}

impl StoragePort for MemoryStorage {
    fn load(&self) -> Result<Option<String>, AppError> {
        Ok(self.contents.lock().unwrap().clone())
    }

    fn save(&self, contents: &str) -> Result<(), AppError> {
        *self.contents.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }
}

fn lead(id: &str, name: &str) -> Lead {
    let mut lead = Lead::default();
    lead.id = id.to_string();
    lead.full_name = name.to_string();
    lead.job_title = "CTO".to_string();
    lead.company = "Acme".to_string();
    lead.location = "Lisbon, Portugal".to_string();
    lead
}

#[tokio::test]
async fn add_dedups_by_id_first_saved_wins() {
    let store = CurationStore::open(Box::new(MemoryStorage::default())).unwrap();

    let outcome = store.add(vec![lead("1", "Ana"), lead("2", "Bruno")]).await.unwrap();
    assert_eq!(outcome.added.len(), 2);
    assert_eq!(outcome.duplicates, 0);

    // Re-saving id 1 with a different name must not overwrite it.
    let outcome = store.add(vec![lead("1", "Impostor"), lead("3", "Carla")]).await.unwrap();
    assert_eq!(outcome.added.len(), 1);
    assert_eq!(outcome.duplicates, 1);

    let all = store.all().await;
    assert_eq!(all.len(), 3);
    let ana = all.iter().find(|l| l.id == "1").unwrap();
    assert_eq!(ana.full_name, "Ana");
}

#[tokio::test]
async fn add_dedups_within_a_batch() {
    let store = CurationStore::open(Box::new(MemoryStorage::default())).unwrap();
    let outcome = store
        .add(vec![lead("1", "Ana"), lead("1", "Ana Again"), lead("2", "Bruno")])
        .await
        .unwrap();
    assert_eq!(outcome.added.len(), 2);
    assert_eq!(outcome.duplicates, 1);
}

#[tokio::test]
async fn new_leads_are_appended_in_save_order() {
    let store = CurationStore::open(Box::new(MemoryStorage::default())).unwrap();
    store.add(vec![lead("1", "Ana")]).await.unwrap();
    store.add(vec![lead("2", "Bruno")]).await.unwrap();
    let all = store.all().await;
    assert_eq!(all[0].id, "1");
    assert_eq!(all[1].id, "2");
}

#[tokio::test]
async fn mutations_persist_and_reload() {
    let storage = MemoryStorage::default();
    {
        let store = CurationStore::open(Box::new(storage.clone())).unwrap();
        store.add(vec![lead("1", "Ana"), lead("2", "Bruno")]).await.unwrap();
        store.remove("2").await.unwrap();
    }

    let store = CurationStore::open(Box::new(storage)).unwrap();
    let all = store.all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "1");
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty() {
    let storage = MemoryStorage::default();
    storage.save("definitely not an envelope").unwrap();

    let store = CurationStore::open(Box::new(storage.clone())).unwrap();
    assert!(store.all().await.is_empty());

    // A valid envelope wrapping garbage lead data is also rejected.
    let envelope = ValidatedSnapshot::new("{\"not\":\"a lead list\"}".to_string())
        .serialize()
        .unwrap();
    storage.save(&envelope).unwrap();
    let store = CurationStore::open(Box::new(storage)).unwrap();
    assert!(store.all().await.is_empty());
}

#[tokio::test]
async fn remove_and_clear_report_outcomes() {
    let store = CurationStore::open(Box::new(MemoryStorage::default())).unwrap();
    store.add(vec![lead("1", "Ana"), lead("2", "Bruno")]).await.unwrap();

    assert!(store.remove("1").await.unwrap());
    assert!(!store.remove("1").await.unwrap());
    assert_eq!(store.clear().await.unwrap(), 1);
    assert_eq!(store.clear().await.unwrap(), 0);
}

#[tokio::test]
async fn apply_enrichment_updates_only_present_ids() {
    let store = CurationStore::open(Box::new(MemoryStorage::default())).unwrap();
    store.add(vec![lead("1", "Ana")]).await.unwrap();

    let mut fresh = lead("1", "Ana");
    fresh.employee_count = "51-200".to_string();
    let mut ghost = lead("gone", "Ghost");
    ghost.employee_count = "1-10".to_string();

    let updated = store.apply_enrichment(vec![fresh, ghost]).await.unwrap();
    assert_eq!(updated, 1);

    let all = store.all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].employee_count, "51-200");
}

#[tokio::test]
async fn export_csv_has_headers_and_escaping() {
    let store = CurationStore::open(Box::new(MemoryStorage::default())).unwrap();
    let mut tricky = lead("1", "Souza, Ana \"Aninha\"");
    tricky.email = Some("ana@acme.com".to_string());
    tricky.profile_url = "https://linkedin.com/in/ana".to_string();
    store.add(vec![tricky]).await.unwrap();

    let csv = store.export_csv().await;
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), EXPORT_HEADERS.join(","));
    let row = lines.next().unwrap();
    assert!(row.starts_with("\"Souza, Ana \"\"Aninha\"\"\","));
    assert!(row.contains("ana@acme.com"));
    assert!(row.ends_with("https://linkedin.com/in/ana"));
}

struct FailingStorage;

impl StoragePort for FailingStorage {
    fn load(&self) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    fn save(&self, _contents: &str) -> Result<(), AppError> {
        Err(AppError::StorageError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "disk full",
        )))
    }
}

#[tokio::test]
async fn persist_failures_carry_snapshot_context() {
    let store = CurationStore::open(Box::new(FailingStorage)).unwrap();
    let err = store.add(vec![lead("1", "Ana Souza")]).await.unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("persisting saved leads snapshot"), "{rendered}");
    assert!(rendered.contains("disk full"), "{rendered}");
}
