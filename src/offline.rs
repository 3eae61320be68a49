//! Offline spreadsheet-row filter engine.
//!
//! Takes rows already parsed out of a spreadsheet (header-to-value maps),
//! maps headers through an alias table, scrubs corrupt tokens, and applies
//! AND-combined predicates for title, location, industry, and employee
//! bucket. Fully offline; no network calls.

use crate::catalog;
use crate::models::Lead;
use crate::synonyms;
use crate::variations::normalize_string;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Header aliases per logical field, matched case-insensitively. The first
/// alias carrying a non-empty value wins.
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("first_name", &["First Name", "FirstName", "Nome", "Primeiro Nome"]),
    ("last_name", &["Last Name", "LastName", "Sobrenome", "Último Nome", "Ultimo Nome"]),
    ("title", &["Title", "Job Title", "Cargo", "Função", "Funcao", "Position"]),
    ("company", &["Company", "Company Name", "Empresa", "Organização", "Organizacao"]),
    ("location", &["Location", "City", "Localização", "Localizacao", "Cidade"]),
    ("industry", &["Industry", "Setor", "Indústria", "Industria", "Segmento"]),
    ("employees", &["Employees", "# Employees", "Employee Count", "Funcionários", "Funcionarios", "Tamanho"]),
    ("email", &["Email", "E-mail", "Email Address"]),
    ("profile_url", &["LinkedIn", "LinkedIn URL", "Linkedin Url", "Profile URL", "Perfil"]),
];

/// Tokens spreadsheet exports are known to inject into text cells.
const CORRUPT_TOKENS: &[&str] = &["MILÍMETROS", "MILIMETROS", "\u{FFFD}"];

/// Offline filter parameters. "all" (or blank) disables a predicate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineFilterParams {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default = "default_employees")]
    pub employees: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_employees() -> String {
    "all".to_string()
}

fn default_limit() -> usize {
    25
}

/// Outcome of a filter run: how many rows were usable at all, and the
/// filtered leads after the limit slice.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineFilterOutcome {
    pub usable_rows: usize,
    pub leads: Vec<Lead>,
}

/// One spreadsheet row resolved through the alias table and sanitized.
#[derive(Debug, Default, Clone)]
struct OfflineRow {
    first_name: String,
    last_name: String,
    title: String,
    company: String,
    location: String,
    industry: String,
    employees: String,
    email: String,
    profile_url: String,
}

impl OfflineRow {
    /// A row is usable only when it identifies a person and their role.
    fn usable(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && !self.title.is_empty()
            && !self.company.is_empty()
    }
}

fn alias_value(row: &Map<String, Value>, aliases: &[&str]) -> String {
    for alias in aliases {
        let found = row.iter().find_map(|(header, value)| {
            if header.trim().eq_ignore_ascii_case(alias) {
                value.as_str().map(|s| s.to_string()).or_else(|| {
                    value.as_i64().map(|n| n.to_string())
                })
            } else {
                None
            }
        });
        if let Some(value) = found {
            if !value.trim().is_empty() {
                return value;
            }
        }
    }
    String::new()
}

/// Scrubs known corrupt tokens and restricts text to letters, digits,
/// whitespace, and the characters that appear in names and emails.
fn sanitize_text(input: &str) -> String {
    let mut cleaned = input.to_string();
    for token in CORRUPT_TOKENS {
        cleaned = cleaned.replace(token, " ");
    }
    let cleaned: String = cleaned
        .chars()
        .filter(|c| {
            c.is_alphabetic() || c.is_ascii_digit() || c.is_whitespace() || matches!(c, '@' | '.' | '-')
        })
        .collect();
    let re = Regex::new(r"\s+").unwrap();
    re.replace_all(&cleaned, " ").trim().to_string()
}

fn resolve_row(raw: &Map<String, Value>) -> OfflineRow {
    let mut row = OfflineRow::default();
    for (field, aliases) in FIELD_ALIASES {
        let value = alias_value(raw, aliases);
        // URLs would not survive the charset scrub.
        let value = if *field == "profile_url" {
            value.trim().to_string()
        } else {
            sanitize_text(&value)
        };
        match *field {
            "first_name" => row.first_name = value,
            "last_name" => row.last_name = value,
            "title" => row.title = value,
            "company" => row.company = value,
            "location" => row.location = value,
            "industry" => row.industry = value,
            "employees" => row.employees = value,
            "email" => row.email = value,
            "profile_url" => row.profile_url = value,
            _ => {}
        }
    }
    row
}

fn is_wildcard(filter: &str) -> bool {
    let f = filter.trim();
    f.is_empty()
        || f.eq_ignore_ascii_case("all")
        || f.eq_ignore_ascii_case("all locations")
        || f.eq_ignore_ascii_case("all industries")
}

/// Title matches when every filter word appears in the row title, or when
/// any synonym equivalent of the filter does.
fn title_matches(row_title: &str, filter: &str) -> bool {
    if is_wildcard(filter) {
        return true;
    }
    let haystack = normalize_string(row_title);
    let all_words = |needle: &str| {
        normalize_string(needle)
            .split_whitespace()
            .all(|w| haystack.contains(w))
    };
    if all_words(filter) {
        return true;
    }
    syn_match(filter, &haystack)
}

fn syn_match(filter: &str, haystack: &str) -> bool {
    synonyms::enhanced_equivalents(filter).iter().any(|eq| {
        let eq = normalize_string(eq);
        !eq.is_empty() && eq.split_whitespace().all(|w| haystack.contains(w))
    })
}

fn substring_matches(row_value: &str, filter: &str) -> bool {
    if is_wildcard(filter) {
        return true;
    }
    normalize_string(row_value).contains(&normalize_string(filter))
}

/// The first integer in the employees cell decides its bucket. Cells with no
/// integer fail every specific bucket and pass only the wildcard.
fn employees_match(row_value: &str, filter: &str) -> bool {
    if is_wildcard(filter) {
        return true;
    }
    let Some(bucket) = catalog::bucket_by_key(filter.trim()) else {
        return false;
    };
    let re = Regex::new(r"\d+").unwrap();
    let Some(m) = re.find(row_value) else {
        return false;
    };
    match m.as_str().parse::<u64>() {
        Ok(n) => bucket.contains(n),
        Err(_) => false,
    }
}

fn row_to_lead(row: &OfflineRow) -> Lead {
    Lead {
        id: Uuid::new_v4().to_string(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        full_name: format!("{} {}", row.first_name, row.last_name).trim().to_string(),
        job_title: row.title.clone(),
        company: row.company.clone(),
        location: if row.location.is_empty() {
            catalog::LOCATION_NOT_AVAILABLE.to_string()
        } else {
            row.location.clone()
        },
        industry: if row.industry.is_empty() {
            catalog::INDUSTRY_NOT_SPECIFIED.to_string()
        } else {
            row.industry.clone()
        },
        email: Some(row.email.clone()).filter(|e| !e.is_empty()),
        profile_url: row.profile_url.clone(),
        employee_count: if row.employees.is_empty() {
            catalog::EMPLOYEE_COUNT_UNKNOWN.to_string()
        } else {
            row.employees.clone()
        },
        ..Lead::default()
    }
}

/// Filters parsed spreadsheet rows. Unusable rows are dropped before the
/// predicates run; `usable_rows` reports how many survived that cut so the
/// caller can distinguish "no data" from "no matches".
pub fn filter_rows(rows: &[Map<String, Value>], params: &OfflineFilterParams) -> OfflineFilterOutcome {
    let resolved: Vec<OfflineRow> = rows
        .iter()
        .map(resolve_row)
        .filter(OfflineRow::usable)
        .collect();
    let usable_rows = resolved.len();

    let limit = params.limit.clamp(1, 500);
    let leads: Vec<Lead> = resolved
        .iter()
        .filter(|row| {
            title_matches(&row.title, &params.job_title)
                && substring_matches(&row.location, &params.location)
                && substring_matches(&row.industry, &params.industry)
                && employees_match(&row.employees, &params.employees)
        })
        .take(limit)
        .map(row_to_lead)
        .collect();

    OfflineFilterOutcome { usable_rows, leads }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn aliases_resolve_case_insensitively() {
        let raw = row(&[("nome", "Ana"), ("SOBRENOME", "Souza"), ("cargo", "CTO"), ("empresa", "Acme")]);
        let resolved = resolve_row(&raw);
        assert_eq!(resolved.first_name, "Ana");
        assert_eq!(resolved.last_name, "Souza");
        assert!(resolved.usable());
    }

    #[test]
    fn sanitize_strips_corrupt_tokens_and_symbols() {
        assert_eq!(sanitize_text("Diretor MILÍMETROS de TI"), "Diretor de TI");
        assert_eq!(sanitize_text("Acme® Corp™"), "Acme Corp");
        assert_eq!(sanitize_text("a@b.co"), "a@b.co");
        assert_eq!(sanitize_text("  spaced   out  "), "spaced out");
    }

    #[test]
    fn incomplete_rows_are_unusable() {
        let raw = row(&[("First Name", "Ana"), ("Title", "CTO"), ("Company", "Acme")]);
        assert!(!resolve_row(&raw).usable());
    }

    #[test]
    fn title_matching_uses_words_and_synonyms() {
        assert!(title_matches("Chief Technology Officer", "technology officer"));
        assert!(title_matches("Chief Technology Officer", "cto"));
        assert!(!title_matches("Chief Technology Officer", "finance"));
        assert!(title_matches("anything", "all"));
    }

    #[test]
    fn employee_bucket_uses_first_integer() {
        assert!(employees_match("120 employees", "51-200"));
        assert!(employees_match("120-300", "51-200"));
        assert!(!employees_match("120 employees", "1-10"));
        assert!(!employees_match("unknown", "1-10"));
        assert!(employees_match("unknown", "all"));
        assert!(!employees_match("120", "not-a-bucket"));
    }

    #[test]
    fn filter_applies_predicates_and_limit() {
        let rows: Vec<Map<String, Value>> = (0..10)
            .map(|i| {
                row(&[
                    ("First Name", "Ana"),
                    ("Last Name", "Souza"),
                    ("Title", "CTO"),
                    ("Company", "Acme"),
                    ("Location", if i % 2 == 0 { "São Paulo" } else { "Lisbon" }),
                    ("Employees", "120"),
                ])
            })
            .collect();
        let params = OfflineFilterParams {
            job_title: "cto".into(),
            location: "sao paulo".into(),
            industry: String::new(),
            employees: "51-200".into(),
            limit: 3,
        };
        let outcome = filter_rows(&rows, &params);
        assert_eq!(outcome.usable_rows, 10);
        assert_eq!(outcome.leads.len(), 3);
        assert!(outcome.leads.iter().all(|l| !l.id.is_empty()));
        let mut ids: Vec<&String> = outcome.leads.iter().map(|l| &l.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
