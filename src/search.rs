//! Tiered people-search orchestration.
//!
//! Three tiers of title candidates, tried in order until one returns
//! results: the preferred English title, the structural variations, then a
//! capped slice of the synonym-expanded equivalents. Transport errors abort
//! the whole search; empty result sets fall through to the next tier.

use crate::apollo::{clean_domain, ApolloService};
use crate::errors::AppError;
use crate::models::{Lead, PersonLookup, PersonLookupRequest, SearchQuery};
use crate::normalizer;
use crate::openai::OpenAiService;
use crate::{synonyms, variations};
use serde_json::{json, Value};

/// Maximum synonym equivalents tried in the last tier.
const EQUIVALENT_TIER_LIMIT: usize = 5;

#[derive(Clone)]
pub struct LeadSearchService {
    apollo: ApolloService,
    openai: OpenAiService,
    home_country: String,
}

impl LeadSearchService {
    pub fn new(apollo: ApolloService, openai: OpenAiService, home_country: String) -> Self {
        Self {
            apollo,
            openai,
            home_country,
        }
    }

    /// Runs the tiered search and normalizes whatever tier hit first.
    /// Exhausting every tier is not an error; it returns an empty list.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Lead>, AppError> {
        let job_title = query.job_title.trim();
        if job_title.is_empty() {
            return Err(AppError::BadRequest("jobTitle is required".to_string()));
        }

        let mut tried: Vec<String> = Vec::new();
        let mut try_title = |title: &str| -> bool {
            let title = title.trim().to_string();
            if title.is_empty() || tried.iter().any(|t| t == &title) {
                false
            } else {
                tried.push(title);
                true
            }
        };

        let mut candidates: Vec<(u8, String)> = Vec::new();
        let best = synonyms::best_english_title(job_title);
        if try_title(&best) {
            candidates.push((0, best));
        }
        for variant in variations::variations(job_title) {
            if try_title(&variant) {
                candidates.push((1, variant));
            }
        }
        for equivalent in synonyms::enhanced_equivalents(job_title)
            .into_iter()
            .take(EQUIVALENT_TIER_LIMIT)
        {
            if try_title(&equivalent) {
                candidates.push((2, equivalent));
            }
        }

        for (tier, title) in candidates {
            tracing::info!(tier, title = %title, "trying title candidate");
            let people = self.apollo.search_people(&title, query).await?;
            if !people.is_empty() {
                tracing::info!(tier, title = %title, count = people.len(), "search hit");
                let leads =
                    normalizer::normalize_people(&people, &self.openai, &self.home_country).await;
                return Ok(leads);
            }
        }

        tracing::info!(job_title, "all title candidates exhausted");
        Ok(Vec::new())
    }

    /// Looks up a single person and their company context.
    ///
    /// The organization enrich step is best-effort: failures degrade to an
    /// AI-generated description rather than failing the lookup.
    pub async fn lookup_person(
        &self,
        request: &PersonLookupRequest,
    ) -> Result<PersonLookup, AppError> {
        if request.is_empty() {
            return Err(AppError::BadRequest(
                "At least one identifying field is required".to_string(),
            ));
        }

        let identity = identity_payload(request);
        let person = self
            .apollo
            .match_person(&identity)
            .await?
            .ok_or_else(|| AppError::NotFound("No matching person found".to_string()))?;

        let lead = normalizer::normalize_person(&person, &self.openai, &self.home_country).await;

        let domain = match request.company_domain.as_deref().and_then(clean_domain) {
            Some(domain) => Some(domain),
            None => self.company_domain_fallback(&lead).await,
        };

        let mut description = None;
        if let Some(ref domain) = domain {
            match self.apollo.enrich_organization(domain).await {
                Ok(Some(org)) => {
                    description = org
                        .get("short_description")
                        .and_then(|d| d.as_str())
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty());
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "organization enrich failed, continuing");
                }
            }
            if description.is_none() {
                match self.openai.company_description(domain).await {
                    Ok(text) => description = Some(text),
                    Err(e) => {
                        tracing::warn!(domain = %domain, error = %e, "company description fallback failed");
                    }
                }
            }
        }

        Ok(PersonLookup {
            lead,
            company_domain: domain,
            company_description: description,
        })
    }

    async fn company_domain_fallback(&self, lead: &Lead) -> Option<String> {
        if let Some(domain) = lead.company_url.as_deref().and_then(clean_domain) {
            return Some(domain);
        }
        if lead.company.trim().is_empty() {
            return None;
        }
        match self.openai.company_domain(&lead.company).await {
            Ok(domain) => domain,
            Err(e) => {
                tracing::warn!(company = %lead.company, error = %e, "domain lookup failed");
                None
            }
        }
    }
}

fn identity_payload(request: &PersonLookupRequest) -> Value {
    let mut payload = json!({});
    let mut set = |key: &str, value: &Option<String>| {
        if let Some(v) = value.as_deref() {
            if !v.trim().is_empty() {
                payload[key] = json!(v.trim());
            }
        }
    };
    set("first_name", &request.first_name);
    set("last_name", &request.last_name);
    set("email", &request.email);
    set("domain", &request.company_domain);
    set("linkedin_url", &request.profile_url);
    payload
}
