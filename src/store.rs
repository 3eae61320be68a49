//! Saved-lead curation store.
//!
//! In-memory list of curated leads behind an async lock, persisted to a
//! checksummed JSON snapshot after every mutation. Dedup is by lead id with
//! first-saved-wins semantics. A missing or corrupt snapshot starts the
//! store empty; it never blocks startup.

use crate::errors::{AppError, ResultExt};
use crate::integrity::ValidatedSnapshot;
use crate::models::{Lead, SaveOutcome};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Column order of the CSV export.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Name",
    "Job Title",
    "Company",
    "Location",
    "Email",
    "LinkedIn URL",
];

/// Where snapshots live. File-backed in production, in-memory in tests.
pub trait StoragePort: Send + Sync {
    /// Loads the raw snapshot. `Ok(None)` when no snapshot exists yet.
    fn load(&self) -> Result<Option<String>, AppError>;
    /// Replaces the snapshot atomically enough for a single-process store.
    fn save(&self, contents: &str) -> Result<(), AppError>;
}

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StoragePort for FileStorage {
    fn load(&self) -> Result<Option<String>, AppError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageError(e)),
        }
    }

    fn save(&self, contents: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("creating snapshot directory")?;
            }
        }
        std::fs::write(&self.path, contents)
            .with_context(|| format!("writing snapshot to {}", self.path.display()))?;
        Ok(())
    }
}

pub struct CurationStore {
    leads: RwLock<Vec<Lead>>,
    storage: Box<dyn StoragePort>,
}

impl CurationStore {
    /// Opens the store, loading whatever valid snapshot exists. Corrupt
    /// snapshots are logged and discarded.
    pub fn open(storage: Box<dyn StoragePort>) -> Result<Self, AppError> {
        let leads = match storage.load()? {
            Some(raw) => match ValidatedSnapshot::deserialize_and_validate(&raw)
                .and_then(|data| serde_json::from_str::<Vec<Lead>>(&data).ok())
            {
                Some(leads) => {
                    tracing::info!(count = leads.len(), "loaded saved leads snapshot");
                    leads
                }
                None => {
                    tracing::warn!("saved leads snapshot is corrupt, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(Self {
            leads: RwLock::new(leads),
            storage,
        })
    }

    async fn persist(&self, leads: &[Lead]) -> Result<(), AppError> {
        let data = serde_json::to_string(leads)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize leads: {}", e)))?;
        let envelope = ValidatedSnapshot::new(data)
            .serialize()
            .map_err(|e| AppError::InternalError(format!("Failed to serialize snapshot: {}", e)))?;
        self.storage.save(&envelope)
            .context("persisting saved leads snapshot")
    }

    /// Adds a batch, skipping ids already saved and ids repeated within the
    /// batch. New leads are appended; an existing lead is never replaced by
    /// a duplicate's data.
    pub async fn add(&self, batch: Vec<Lead>) -> Result<SaveOutcome, AppError> {
        let mut leads = self.leads.write().await;
        let mut added: Vec<Lead> = Vec::new();
        let mut duplicates = 0usize;

        for lead in batch {
            let exists = leads.iter().any(|l| l.id == lead.id)
                || added.iter().any(|l| l.id == lead.id);
            if exists {
                duplicates += 1;
            } else {
                added.push(lead);
            }
        }

        if !added.is_empty() {
            leads.extend(added.iter().cloned());
            self.persist(&leads).await?;
        }

        Ok(SaveOutcome { added, duplicates })
    }

    /// Removes a lead by id. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> Result<bool, AppError> {
        let mut leads = self.leads.write().await;
        let before = leads.len();
        leads.retain(|l| l.id != id);
        let removed = leads.len() != before;
        if removed {
            self.persist(&leads).await?;
        }
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<usize, AppError> {
        let mut leads = self.leads.write().await;
        let removed = leads.len();
        if removed > 0 {
            leads.clear();
            self.persist(&leads).await?;
        }
        Ok(removed)
    }

    pub async fn all(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }

    /// Applies enriched copies back onto the store. Only ids still present
    /// are updated; leads removed mid-enrichment are dropped silently.
    /// Returns how many leads were updated.
    pub async fn apply_enrichment(&self, enriched: Vec<Lead>) -> Result<usize, AppError> {
        let mut leads = self.leads.write().await;
        let mut updated = 0usize;
        for fresh in enriched {
            if let Some(existing) = leads.iter_mut().find(|l| l.id == fresh.id) {
                *existing = fresh;
                updated += 1;
            }
        }
        if updated > 0 {
            self.persist(&leads).await?;
        }
        Ok(updated)
    }

    /// Renders the saved leads as CSV in [`EXPORT_HEADERS`] column order.
    pub async fn export_csv(&self) -> String {
        let leads = self.leads.read().await;
        let mut out = String::new();
        out.push_str(&EXPORT_HEADERS.join(","));
        out.push('\n');
        for lead in leads.iter() {
            let row = [
                lead.display_name(),
                lead.job_title.clone(),
                lead.company.clone(),
                lead.location.clone(),
                lead.email.clone().unwrap_or_default(),
                lead.profile_url.clone(),
            ];
            let row: Vec<String> = row.iter().map(|f| csv_escape(f)).collect();
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }
}

/// Quotes a CSV field when needed, doubling embedded quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
