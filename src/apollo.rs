//! Apollo people-search client.
//!
//! Thin wrapper over the three Apollo endpoints the pipeline uses. Returns
//! raw `serde_json::Value` payloads; field extraction and totalization live
//! in the normalizer.

use crate::errors::AppError;
use crate::models::SearchQuery;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

#[derive(Clone)]
pub struct ApolloService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApolloService {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Searches people matching a single title candidate plus the query's
    /// location, industry, and optional company filters.
    ///
    /// Returns the raw person objects from the `people` array; an absent or
    /// non-array `people` field counts as zero results.
    pub async fn search_people(
        &self,
        title: &str,
        query: &SearchQuery,
    ) -> Result<Vec<Value>, AppError> {
        let mut payload = json!({
            "q_organization_domains": [],
            "page": 1,
            "per_page": query.clamped_count(),
            "person_titles": [title],
        });

        if !query.location.trim().is_empty() {
            payload["person_locations"] = json!([query.location.trim()]);
        }
        if !query.industry.trim().is_empty() {
            payload["organization_industries"] = json!([query.industry.trim()]);
        }
        if let Some(company) = query.company.as_deref() {
            if !company.trim().is_empty() {
                payload["q_organization_name"] = json!(company.trim());
            }
        }

        let url = format!("{}/api/v1/mixed_people/search", self.base_url);
        tracing::debug!(title, url = %url, "searching people");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Apollo people search returned status {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let people = body
            .get("people")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(people)
    }

    /// Matches a single person by whatever identifying fields are present.
    /// Returns `None` when Apollo finds nobody.
    pub async fn match_person(&self, identity: &Value) -> Result<Option<Value>, AppError> {
        let url = format!("{}/api/v1/people/match", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(identity)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Apollo person match returned status {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let person = body.get("person").cloned().filter(|p| !p.is_null());
        Ok(person)
    }

    /// Enriches an organization by domain. Returns `None` when Apollo has no
    /// record for the domain.
    pub async fn enrich_organization(&self, domain: &str) -> Result<Option<Value>, AppError> {
        let url = Url::parse_with_params(
            &format!("{}/api/v1/organizations/enrich", self.base_url),
            &[("domain", domain)],
        )
        .map_err(|e| AppError::InternalError(format!("Invalid organization enrich URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Apollo organization enrich returned status {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let organization = body
            .get("organization")
            .cloned()
            .filter(|o| !o.is_null());
        Ok(organization)
    }
}

/// Reduces a URL or free-form domain string to a bare host without the
/// `www.` prefix. Returns `None` when no plausible host remains.
pub fn clean_domain(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let host = if trimmed.contains("://") {
        Url::parse(trimmed).ok()?.host_str()?.to_string()
    } else {
        // Bare domain, possibly with a path tacked on.
        trimmed
            .split('/')
            .next()
            .unwrap_or(trimmed)
            .to_string()
    };

    let host = host.trim_start_matches("www.").trim().to_lowercase();
    if host.contains('.') && !host.contains(char::is_whitespace) {
        Some(host)
    } else {
        None
    }
}
