//! Closed vocabularies shared by search, enrichment, and offline filtering.
//!
//! These lists are configuration data: the AI lookups are validated against
//! them and the offline filter selects ranges from them. Extending a
//! vocabulary is a data edit here, never a logic change elsewhere.

/// Sentinel used whenever a company's industry cannot be resolved.
pub const INDUSTRY_NOT_SPECIFIED: &str = "Industry not specified";

/// Sentinel used whenever no location parts are available.
pub const LOCATION_NOT_AVAILABLE: &str = "Location not available";

/// Sentinel used whenever the employee count is unknown.
pub const EMPLOYEE_COUNT_UNKNOWN: &str = "N/A";

/// The closed industry vocabulary. AI industry lookups must answer with one
/// of these entries verbatim; anything else collapses to the sentinel.
pub const INDUSTRIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Financial Services",
    "Education",
    "Manufacturing",
    "Retail",
    "Real Estate",
    "Telecommunications",
    "Energy",
    "Transportation & Logistics",
    "Media & Entertainment",
    "Hospitality",
    "Construction",
    "Agriculture",
    "Consulting",
    "Legal Services",
    "Government",
    "Non-Profit",
    "Insurance",
    "Automotive",
    "Pharmaceuticals",
];

/// A discretized employee-count range with its fixed-vocabulary key.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeBucket {
    pub key: &'static str,
    pub min: u64,
    /// `None` means open-ended ("5001+").
    pub max: Option<u64>,
}

impl EmployeeBucket {
    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// The closed set of employee-count buckets, smallest first.
pub const EMPLOYEE_BUCKETS: &[EmployeeBucket] = &[
    EmployeeBucket { key: "1-10", min: 1, max: Some(10) },
    EmployeeBucket { key: "11-50", min: 11, max: Some(50) },
    EmployeeBucket { key: "51-200", min: 51, max: Some(200) },
    EmployeeBucket { key: "201-500", min: 201, max: Some(500) },
    EmployeeBucket { key: "501-1000", min: 501, max: Some(1000) },
    EmployeeBucket { key: "1001-5000", min: 1001, max: Some(5000) },
    EmployeeBucket { key: "5001+", min: 5001, max: None },
];

/// Bucket assumed when an AI employee-count lookup fails or times out and the
/// lead's industry has no dedicated entry below.
pub const DEFAULT_FALLBACK_BUCKET: &str = "11-50";

/// Deterministic fallback buckets keyed by industry. Rough typical company
/// sizes per sector; best-effort stand-ins, not data.
const FALLBACK_BUCKETS: &[(&str, &str)] = &[
    ("Technology", "51-200"),
    ("Healthcare", "201-500"),
    ("Financial Services", "201-500"),
    ("Education", "201-500"),
    ("Manufacturing", "501-1000"),
    ("Retail", "51-200"),
    ("Telecommunications", "501-1000"),
    ("Energy", "501-1000"),
    ("Government", "1001-5000"),
    ("Pharmaceuticals", "1001-5000"),
];

pub fn bucket_by_key(key: &str) -> Option<&'static EmployeeBucket> {
    EMPLOYEE_BUCKETS.iter().find(|b| b.key == key)
}

/// Whether `value` is a member of the closed bucket vocabulary.
pub fn is_valid_bucket(value: &str) -> bool {
    bucket_by_key(value).is_some()
}

/// Maps `value` onto the closed industry vocabulary, ignoring case.
/// Returns the canonical spelling, or `None` for an unknown industry.
pub fn canonical_industry(value: &str) -> Option<&'static str> {
    let needle = value.trim();
    INDUSTRIES.iter().find(|i| i.eq_ignore_ascii_case(needle)).copied()
}

/// Fallback employee bucket for a lead whose AI lookup did not resolve.
/// Unknown or sentinel industries get [`DEFAULT_FALLBACK_BUCKET`].
pub fn fallback_bucket(industry: &str) -> &'static str {
    let needle = industry.trim();
    FALLBACK_BUCKETS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(needle))
        .map(|(_, bucket)| *bucket)
        .unwrap_or(DEFAULT_FALLBACK_BUCKET)
}
