use crate::config::Config;
use crate::enrichment;
use crate::errors::AppError;
use crate::models::{Lead, PersonLookup, PersonLookupRequest, SearchQuery};
use crate::offline::{self, OfflineFilterOutcome, OfflineFilterParams};
use crate::openai::OpenAiService;
use crate::search::LeadSearchService;
use crate::store::CurationStore;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Tiered people-search orchestrator.
    pub search: LeadSearchService,
    /// AI enrichment client.
    pub openai: OpenAiService,
    /// Saved-lead curation store.
    pub store: CurationStore,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-finder-api",
            "version": "0.1.0"
        })),
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub count: usize,
    pub leads: Vec<Lead>,
}

/// POST /api/v1/leads/search
///
/// Runs the tiered people search and enriches employee counts before
/// responding. An exhausted search returns an empty list, not an error.
pub async fn search_leads(
    State(state): State<Arc<AppState>>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    tracing::info!(job_title = %query.job_title, location = %query.location, "POST /leads/search");

    let leads = state.search.search(&query).await?;
    let leads = enrichment::enrich_employee_counts(
        leads,
        &state.openai,
        Duration::from_millis(state.config.enrich_call_timeout_ms),
        Duration::from_millis(state.config.enrich_batch_timeout_ms),
    )
    .await;

    tracing::info!(count = leads.len(), "search complete");
    Ok(Json(SearchResponse {
        count: leads.len(),
        leads,
    }))
}

/// POST /api/v1/leads/enrich
///
/// Enriches an ad-hoc batch of leads. Always returns as many leads as it
/// received.
pub async fn enrich_leads(
    State(state): State<Arc<AppState>>,
    Json(leads): Json<Vec<Lead>>,
) -> Result<Json<Vec<Lead>>, AppError> {
    tracing::info!(count = leads.len(), "POST /leads/enrich");
    let enriched = enrichment::enrich_employee_counts(
        leads,
        &state.openai,
        Duration::from_millis(state.config.enrich_call_timeout_ms),
        Duration::from_millis(state.config.enrich_batch_timeout_ms),
    )
    .await;
    Ok(Json(enriched))
}

/// POST /api/v1/leads/lookup
pub async fn lookup_person(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PersonLookupRequest>,
) -> Result<Json<PersonLookup>, AppError> {
    tracing::info!("POST /leads/lookup");
    let lookup = state.search.lookup_person(&request).await?;
    Ok(Json(lookup))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub lead_id: String,
    pub analysis: String,
}

/// POST /api/v1/leads/analyze
pub async fn analyze_lead(
    State(state): State<Arc<AppState>>,
    Json(lead): Json<Lead>,
) -> Result<Json<AnalysisResponse>, AppError> {
    tracing::info!(lead_id = %lead.id, "POST /leads/analyze");
    if lead.job_title.trim().is_empty() && lead.company.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Lead needs at least a job title or a company to analyze".to_string(),
        ));
    }
    let analysis = state.openai.analyze_profile(&lead).await?;
    Ok(Json(AnalysisResponse {
        lead_id: lead.id,
        analysis,
    }))
}

/// GET /api/v1/leads/saved
pub async fn list_saved(State(state): State<Arc<AppState>>) -> Json<SearchResponse> {
    let leads = state.store.all().await;
    Json(SearchResponse {
        count: leads.len(),
        leads,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub saved: usize,
    pub duplicates: usize,
    pub message: String,
}

/// POST /api/v1/leads/saved
pub async fn save_leads(
    State(state): State<Arc<AppState>>,
    Json(leads): Json<Vec<Lead>>,
) -> Result<Json<SaveResponse>, AppError> {
    tracing::info!(count = leads.len(), "POST /leads/saved");
    let outcome = state.store.add(leads).await?;
    Ok(Json(SaveResponse {
        saved: outcome.added.len(),
        duplicates: outcome.duplicates,
        message: outcome.message(),
    }))
}

/// DELETE /api/v1/leads/saved/:id
///
/// Removing an id that is not saved is a no-op, not an error.
pub async fn delete_saved(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let removed = state.store.remove(&id).await?;
    tracing::info!(%id, removed, "DELETE /leads/saved/:id");
    Ok(Json(json!({ "id": id, "removed": removed })))
}

/// DELETE /api/v1/leads/saved
pub async fn clear_saved(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let removed = state.store.clear().await?;
    tracing::info!(removed, "DELETE /leads/saved");
    Ok(Json(json!({ "deleted": removed })))
}

/// POST /api/v1/leads/saved/enrich
///
/// Re-runs employee-count enrichment over every saved lead and writes the
/// results back. Leads deleted while the pass runs are dropped silently.
pub async fn enrich_saved(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let leads = state.store.all().await;
    tracing::info!(count = leads.len(), "POST /leads/saved/enrich");
    let enriched = enrichment::enrich_employee_counts(
        leads,
        &state.openai,
        Duration::from_millis(state.config.enrich_call_timeout_ms),
        Duration::from_millis(state.config.enrich_batch_timeout_ms),
    )
    .await;
    let updated = state.store.apply_enrichment(enriched).await?;
    Ok(Json(json!({ "updated": updated })))
}

/// GET /api/v1/leads/saved/export
///
/// Streams the saved leads as a CSV attachment named by today's date.
pub async fn export_saved(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let csv = state.store.export_csv().await;
    let filename = format!("leads_{}.csv", chrono::Utc::now().format("%Y-%m-%d"));
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    (headers, csv)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineFilterRequest {
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(flatten)]
    pub params: OfflineFilterParams,
}

/// POST /api/v1/offline/filter
///
/// Filters already-parsed spreadsheet rows without touching the network.
pub async fn filter_offline(
    Json(request): Json<OfflineFilterRequest>,
) -> Result<Json<OfflineFilterOutcome>, AppError> {
    tracing::info!(rows = request.rows.len(), "POST /offline/filter");
    let outcome = offline::filter_rows(&request.rows, &request.params);
    if outcome.usable_rows == 0 {
        return Err(AppError::BadRequest(
            "No valid data rows found in the uploaded sheet".to_string(),
        ));
    }
    Ok(Json(outcome))
}
