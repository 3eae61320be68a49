//! Request and response models for the lead pipeline.

use serde::{Deserialize, Serialize};

fn default_count() -> u32 {
    10
}

/// A people-search request. `count` is clamped into 1..=100 at use sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl SearchQuery {
    pub fn clamped_count(&self) -> u32 {
        self.count.clamp(1, 100)
    }
}

/// A fully normalized lead. Every string field is total: missing upstream
/// data lands as a sentinel or empty string, never as a JSON null, so
/// downstream renderers and the CSV export need no null checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_score: Option<f64>,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub employee_count: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_history: Vec<WorkEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<EducationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    /// Milliseconds since the epoch of the last enrichment pass that touched
    /// this lead. Strictly increases across passes within a process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

impl Lead {
    /// Name to render in exports: full name, then first/last, then the id.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.trim().to_string();
        }
        let joined = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let joined = joined.trim().to_string();
        if !joined.is_empty() {
            return joined;
        }
        self.id.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub dates: String,
}

/// Result of saving a batch of leads into the curation store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub added: Vec<Lead>,
    pub duplicates: usize,
}

impl SaveOutcome {
    pub fn message(&self) -> String {
        match (self.added.len(), self.duplicates) {
            (0, 0) => "No leads provided".to_string(),
            (0, d) => format!("All {} leads were already saved", d),
            (a, 0) => format!("Saved {} new leads", a),
            (a, d) => format!("Saved {} new leads, skipped {} duplicates", a, d),
        }
    }
}

/// A person-lookup request. At least one of the identifying fields must be
/// present; the handler rejects fully empty requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonLookupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl PersonLookupRequest {
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.first_name)
            && blank(&self.last_name)
            && blank(&self.email)
            && blank(&self.company_domain)
            && blank(&self.profile_url)
    }
}

/// A person lookup result: the normalized lead plus company context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonLookup {
    pub lead: Lead,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
}
