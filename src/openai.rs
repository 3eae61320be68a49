//! AI enrichment client.
//!
//! Chat-completion lookups with closed-vocabulary validation. Industry
//! lookups are total (they return a sentinel on any failure) and cached;
//! everything else surfaces errors so callers can decide on fallback.

use crate::catalog;
use crate::errors::AppError;
use crate::models::Lead;
use moka::future::Cache;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const INDUSTRY_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const INDUSTRY_CACHE_CAPACITY: u64 = 10_000;

#[derive(Clone)]
pub struct OpenAiService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    industry_cache: Cache<String, String>,
}

impl OpenAiService {
    pub fn new(client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            industry_cache: Cache::builder()
                .max_capacity(INDUSTRY_CACHE_CAPACITY)
                .time_to_live(INDUSTRY_CACHE_TTL)
                .build(),
        }
    }

    /// Single-turn chat completion. Returns the trimmed message content.
    async fn chat(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, AppError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Chat completion returned status {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let content = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                AppError::ExternalApiError("Chat completion response had no content".to_string())
            })?;
        Ok(content.trim().to_string())
    }

    /// Resolves a company's industry against the closed vocabulary.
    ///
    /// Total: any transport failure, off-vocabulary answer, or blank company
    /// name collapses to the sentinel. Only real vocabulary hits are cached.
    pub async fn company_industry(&self, company: &str) -> String {
        let company = company.trim();
        if company.is_empty() {
            return catalog::INDUSTRY_NOT_SPECIFIED.to_string();
        }

        let key = company.to_lowercase();
        if let Some(cached) = self.industry_cache.get(&key).await {
            return cached;
        }

        let prompt = format!(
            "What industry does the company \"{}\" operate in? \
             Answer with exactly one of the following, and nothing else: {}.",
            company,
            catalog::INDUSTRIES.join(", ")
        );

        match self.chat(&prompt, 50, 0.2).await {
            Ok(answer) => {
                let answer = answer.trim_matches(|c: char| c == '"' || c == '.').trim();
                if let Some(industry) = catalog::canonical_industry(answer) {
                    let industry = industry.to_string();
                    self.industry_cache.insert(key, industry.clone()).await;
                    industry
                } else {
                    tracing::warn!(company, answer, "industry answer outside vocabulary");
                    catalog::INDUSTRY_NOT_SPECIFIED.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(company, error = %e, "industry lookup failed");
                catalog::INDUSTRY_NOT_SPECIFIED.to_string()
            }
        }
    }

    /// Estimates a company's employee-count bucket. Errors on transport
    /// failure or an off-vocabulary answer so the caller can apply the
    /// deterministic fallback.
    pub async fn company_employee_count(
        &self,
        company: &str,
        industry: &str,
    ) -> Result<String, AppError> {
        let prompt = format!(
            "Estimate how many employees the company \"{}\" ({}) has. \
             Answer with exactly one of the following ranges, and nothing else: {}.",
            company,
            industry,
            catalog::EMPLOYEE_BUCKETS
                .iter()
                .map(|b| b.key)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let answer = self.chat(&prompt, 50, 0.2).await?;
        let answer = answer.trim_matches(|c: char| c == '"' || c == '.').trim();
        if catalog::is_valid_bucket(answer) {
            Ok(answer.to_string())
        } else {
            Err(AppError::ExternalApiError(format!(
                "Employee count answer outside vocabulary: {}",
                answer
            )))
        }
    }

    /// Short company description for a domain, used when Apollo has no
    /// organization record.
    pub async fn company_description(&self, domain: &str) -> Result<String, AppError> {
        let prompt = format!(
            "Write a short, factual description (2-3 sentences) of the company \
             whose website is {}. If you do not know the company, describe what \
             a company with that domain name most plausibly does.",
            domain
        );
        self.chat(&prompt, 300, 0.3).await
    }

    /// Best guess for a company's primary website domain. Returns `Ok(None)`
    /// when no usable domain comes back.
    pub async fn company_domain(&self, company: &str) -> Result<Option<String>, AppError> {
        let prompt = format!(
            "What is the primary website domain of the company \"{}\"? \
             Answer with the bare domain only, for example: acme.com. \
             If you do not know, answer: unknown.",
            company
        );
        let answer = self.chat(&prompt, 60, 0.2).await?;
        if answer.eq_ignore_ascii_case("unknown") {
            return Ok(None);
        }
        Ok(crate::apollo::clean_domain(&answer))
    }

    /// Free-form profile analysis of a lead: strengths, likely pain points,
    /// and an outreach angle.
    pub async fn analyze_profile(&self, lead: &Lead) -> Result<String, AppError> {
        let history = lead
            .work_history
            .iter()
            .map(|w| format!("{} at {} ({})", w.title, w.company, w.duration))
            .collect::<Vec<_>>()
            .join("; ");
        let prompt = format!(
            "Analyze this professional profile for B2B outreach.\n\
             Name: {}\nTitle: {}\nCompany: {} ({})\nLocation: {}\n\
             Work history: {}\nSkills: {}\n\n\
             Cover: seniority and likely decision-making power, probable \
             priorities in their role, and one concrete angle for a first \
             outreach message.",
            lead.display_name(),
            lead.job_title,
            lead.company,
            lead.industry,
            lead.location,
            if history.is_empty() { "unknown" } else { history.as_str() },
            if lead.skills.is_empty() {
                "unknown".to_string()
            } else {
                lead.skills.join(", ")
            },
        );
        self.chat(&prompt, 800, 0.7).await
    }
}
