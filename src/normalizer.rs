//! Raw person payloads to normalized leads.
//!
//! Every function here is total over arbitrary JSON: missing, null, or
//! wrongly-typed fields land as sentinels or empty strings, never as errors.
//! The only async dependency is the AI industry lookup, itself total.

use crate::catalog;
use crate::models::{EducationEntry, Lead, WorkEntry};
use crate::openai::OpenAiService;
use futures::future::join_all;
use serde_json::Value;
use uuid::Uuid;

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn nested_str(value: &Value, outer: &str, key: &str) -> String {
    value
        .get(outer)
        .map(|v| str_field(v, key))
        .unwrap_or_default()
}

/// The current employment entry: `employment_history` item with
/// `current == true`, if any.
fn current_employment(person: &Value) -> Option<&Value> {
    person
        .get("employment_history")?
        .as_array()?
        .iter()
        .find(|e| e.get("current").and_then(|c| c.as_bool()).unwrap_or(false))
}

fn first_employment(person: &Value) -> Option<&Value> {
    person.get("employment_history")?.as_array()?.first()
}

/// "City, State, Country" from whatever parts exist, with the home country
/// omitted. No parts at all yields the location sentinel.
pub fn format_location(person: &Value, home_country: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for key in ["city", "state", "country"] {
        let part = str_field(person, key);
        if part.is_empty() {
            continue;
        }
        if key == "country" && part.eq_ignore_ascii_case(home_country) {
            continue;
        }
        parts.push(part);
    }
    if parts.is_empty() {
        catalog::LOCATION_NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}

fn year_of(date: &str) -> Option<&str> {
    let year = date.split('-').next()?.trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        None
    }
}

/// "2019 - 2023", "2019 - Present", or "" when no start year exists.
/// Only an entry flagged current says Present; an ended job with no end
/// date leaves the end side blank.
pub fn format_duration(entry: &Value) -> String {
    let start = str_field(entry, "start_date");
    let Some(start_year) = year_of(&start) else {
        return String::new();
    };
    let is_current = entry
        .get("current")
        .and_then(|c| c.as_bool())
        .unwrap_or(false);
    let end = str_field(entry, "end_date");
    let end_year = if is_current {
        "Present"
    } else {
        year_of(&end).unwrap_or("")
    };
    format!("{} - {}", start_year, end_year)
}

/// "2015 - 2019" from graduation/start fields, or "" when neither exists.
pub fn format_education_dates(entry: &Value) -> String {
    let start = str_field(entry, "start_date");
    let end = str_field(entry, "end_date");
    match (year_of(&start), year_of(&end)) {
        (Some(s), Some(e)) => format!("{} - {}", s, e),
        (Some(s), None) => s.to_string(),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}

fn work_history(person: &Value) -> Vec<WorkEntry> {
    let org_website = nested_str(person, "organization", "website");
    person
        .get("employment_history")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .map(|e| WorkEntry {
                    title: str_field(e, "title"),
                    company: str_field(e, "organization_name"),
                    company_url: {
                        let url = str_field(e, "organization_website");
                        let url = if url.is_empty() { org_website.clone() } else { url };
                        if url.is_empty() {
                            None
                        } else {
                            Some(url)
                        }
                    },
                    duration: format_duration(e),
                    description: str_field(e, "description"),
                    location: str_field(e, "raw_address"),
                    skills: e
                        .get("skills")
                        .and_then(|v| v.as_array())
                        .map(|items| {
                            items
                                .iter()
                                .filter_map(|i| i.as_str())
                                .map(|s| s.trim().to_string())
                                .filter(|s| !s.is_empty())
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn education(person: &Value) -> Vec<EducationEntry> {
    person
        .get("education")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .map(|e| EducationEntry {
                    school: str_field(e, "school"),
                    degree: str_field(e, "degree"),
                    field: str_field(e, "major"),
                    dates: format_education_dates(e),
                })
                .filter(|e| !e.school.is_empty() || !e.degree.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn string_list(person: &Value, key: &str) -> Vec<String> {
    person
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn employee_count(person: &Value) -> String {
    let raw = person.get("organization").and_then(|o| {
        o.get("estimated_num_employees")
            .filter(|v| !v.is_null())
            .or_else(|| o.get("employee_count"))
    });
    match raw {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => catalog::EMPLOYEE_COUNT_UNKNOWN.to_string(),
    }
}

/// Industry resolution chain: organization record, then current employment,
/// then the first history entry, then an AI lookup by company name, then the
/// sentinel.
async fn resolve_industry(person: &Value, company: &str, openai: &OpenAiService) -> String {
    let from_org = nested_str(person, "organization", "industry");
    if !from_org.is_empty() {
        return from_org;
    }
    if let Some(entry) = current_employment(person) {
        let industry = str_field(entry, "industry");
        if !industry.is_empty() {
            return industry;
        }
    }
    if let Some(entry) = first_employment(person) {
        let industry = str_field(entry, "industry");
        if !industry.is_empty() {
            return industry;
        }
    }
    if !company.is_empty() {
        return openai.company_industry(company).await;
    }
    catalog::INDUSTRY_NOT_SPECIFIED.to_string()
}

/// Normalizes one raw person object into a [`Lead`]. Total over any JSON
/// shape; only the industry chain may reach out to the AI service.
pub async fn normalize_person(
    person: &Value,
    openai: &OpenAiService,
    home_country: &str,
) -> Lead {
    let id = person
        .get("id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let first_name = str_field(person, "first_name");
    let last_name = str_field(person, "last_name");
    let full_name = {
        let name = str_field(person, "name");
        if name.is_empty() {
            format!("{} {}", first_name, last_name).trim().to_string()
        } else {
            name
        }
    };

    // The current employment entry is fresher than the top-level fields,
    // which can lag behind a job change.
    let job_title = {
        let from_current = current_employment(person)
            .map(|e| str_field(e, "title"))
            .unwrap_or_default();
        if !from_current.is_empty() {
            from_current
        } else {
            str_field(person, "title")
        }
    };

    let company = {
        let from_current = current_employment(person)
            .map(|e| str_field(e, "organization_name"))
            .unwrap_or_default();
        if !from_current.is_empty() {
            from_current
        } else {
            nested_str(person, "organization", "name")
        }
    };

    let industry = resolve_industry(person, &company, openai).await;

    let email = person
        .get("email")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.contains("email_not_unlocked"));
    let email_verified = person
        .get("email_status")
        .and_then(|v| v.as_str())
        .map(|s| s == "verified")
        .unwrap_or(false);
    let email_score = person
        .get("extrapolated_email_confidence")
        .and_then(|v| v.as_f64());

    let company_url = {
        let url = nested_str(person, "organization", "website_url");
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    };

    Lead {
        id,
        first_name,
        last_name,
        full_name,
        job_title,
        company,
        company_url,
        location: format_location(person, home_country),
        industry,
        email,
        email_verified,
        email_score,
        profile_url: str_field(person, "linkedin_url"),
        employee_count: employee_count(person),
        work_history: work_history(person),
        education: education(person),
        skills: string_list(person, "skills"),
        certifications: string_list(person, "certifications"),
        last_updated: None,
    }
}

/// Normalizes a batch concurrently, preserving input order.
pub async fn normalize_people(
    people: &[Value],
    openai: &OpenAiService,
    home_country: &str,
) -> Vec<Lead> {
    join_all(
        people
            .iter()
            .map(|p| normalize_person(p, openai, home_country)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_omits_home_country_and_falls_back() {
        let person = json!({"city": "Austin", "state": "Texas", "country": "United States"});
        assert_eq!(format_location(&person, "United States"), "Austin, Texas");

        let person = json!({"city": "Lisbon", "country": "Portugal"});
        assert_eq!(format_location(&person, "United States"), "Lisbon, Portugal");

        let person = json!({});
        assert_eq!(format_location(&person, "United States"), catalog::LOCATION_NOT_AVAILABLE);
    }

    #[test]
    fn duration_handles_current_and_missing_dates() {
        let entry = json!({"start_date": "2019-03-01", "end_date": "2023-06-01"});
        assert_eq!(format_duration(&entry), "2019 - 2023");

        let entry = json!({"start_date": "2019-03-01", "current": true});
        assert_eq!(format_duration(&entry), "2019 - Present");

        let entry = json!({"start_date": "2019-03-01"});
        assert_eq!(format_duration(&entry), "2019 - ");

        let entry = json!({"end_date": "2023-06-01"});
        assert_eq!(format_duration(&entry), "");

        let entry = json!({"start_date": "soon"});
        assert_eq!(format_duration(&entry), "");
    }

    #[test]
    fn education_dates_use_whatever_years_exist() {
        let entry = json!({"start_date": "2015-09-01", "end_date": "2019-06-01"});
        assert_eq!(format_education_dates(&entry), "2015 - 2019");
        let entry = json!({"end_date": "2019-06-01"});
        assert_eq!(format_education_dates(&entry), "2019");
        let entry = json!({});
        assert_eq!(format_education_dates(&entry), "");
    }

    #[test]
    fn employee_count_handles_number_string_and_absence() {
        let person = json!({"organization": {"estimated_num_employees": 250}});
        assert_eq!(employee_count(&person), "250");
        let person = json!({"organization": {"estimated_num_employees": "250"}});
        assert_eq!(employee_count(&person), "250");
        let person = json!({});
        assert_eq!(employee_count(&person), catalog::EMPLOYEE_COUNT_UNKNOWN);
    }

    #[test]
    fn current_employment_backfills_title_and_company() {
        let person = json!({
            "employment_history": [
                {"title": "Analyst", "organization_name": "OldCo", "current": false},
                {"title": "CTO", "organization_name": "Acme", "current": true},
            ]
        });
        let entry = current_employment(&person).unwrap();
        assert_eq!(str_field(entry, "title"), "CTO");
        assert_eq!(str_field(entry, "organization_name"), "Acme");
    }

    fn offline_openai() -> OpenAiService {
        OpenAiService::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9".to_string(),
            "test-key".to_string(),
            "gpt-3.5-turbo".to_string(),
        )
    }

    #[tokio::test]
    async fn current_employment_wins_over_top_level_fields() {
        let person = json!({
            "id": "p1",
            "title": "Analyst",
            "organization": {"name": "OldCo", "industry": "Technology", "website_url": "https://oldco.com"},
            "employment_history": [
                {"title": "CTO", "organization_name": "Acme", "current": true},
            ]
        });
        let lead = normalize_person(&person, &offline_openai(), "United States").await;
        assert_eq!(lead.job_title, "CTO");
        assert_eq!(lead.company, "Acme");
    }

    #[tokio::test]
    async fn top_level_fields_backfill_when_no_current_employment() {
        let person = json!({
            "id": "p2",
            "title": "Analyst",
            "organization": {"name": "OldCo", "industry": "Technology"},
            "employment_history": [
                {"title": "Intern", "organization_name": "PastCo", "current": false},
            ]
        });
        let lead = normalize_person(&person, &offline_openai(), "United States").await;
        assert_eq!(lead.job_title, "Analyst");
        assert_eq!(lead.company, "OldCo");
    }

    #[test]
    fn work_history_reads_website_and_raw_address() {
        let person = json!({
            "organization": {"website": "https://fallback.com"},
            "employment_history": [
                {
                    "title": "CTO",
                    "organization_name": "Acme",
                    "organization_website": "https://acme.com",
                    "raw_address": "Austin, Texas",
                    "start_date": "2020-01-01",
                    "current": true,
                },
                {"title": "Analyst", "organization_name": "OldCo", "current": false},
            ]
        });
        let entries = work_history(&person);
        assert_eq!(entries[0].company_url.as_deref(), Some("https://acme.com"));
        assert_eq!(entries[0].location, "Austin, Texas");
        assert_eq!(entries[1].company_url.as_deref(), Some("https://fallback.com"));
    }

    #[test]
    fn education_reads_school_and_major() {
        let person = json!({
            "education": [
                {"school": "MIT", "degree": "BSc", "major": "Computer Science"},
            ]
        });
        let entries = education(&person);
        assert_eq!(entries[0].school, "MIT");
        assert_eq!(entries[0].field, "Computer Science");
    }

    #[test]
    fn locked_emails_are_dropped() {
        let person = json!({"email": "email_not_unlocked@domain.com"});
        let email = person
            .get("email")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && !s.contains("email_not_unlocked"));
        assert!(email.is_none());
    }
}
