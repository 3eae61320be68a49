use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_finder_api::apollo::ApolloService;
use lead_finder_api::config::Config;
use lead_finder_api::handlers::{self, AppState};
use lead_finder_api::openai::OpenAiService;
use lead_finder_api::search::LeadSearchService;
use lead_finder_api::store::{CurationStore, FileStorage};

/// Main entry point for the application.
///
/// Initializes logging, configuration, the external service clients, and the
/// curation store, then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_finder_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let http_client = reqwest::Client::new();

    let apollo = ApolloService::new(
        http_client.clone(),
        config.apollo_base_url.clone(),
        config.apollo_api_key.clone(),
    );
    let openai = OpenAiService::new(
        http_client,
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    );
    let search = LeadSearchService::new(apollo, openai.clone(), config.home_country.clone());

    let store = CurationStore::open(Box::new(FileStorage::new(config.store_path.clone())))
        .map_err(|e| anyhow::anyhow!("Failed to open curation store: {}", e))?;
    tracing::info!("Curation store opened at {}", config.store_path);

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        search,
        openai,
        store,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/leads/search", post(handlers::search_leads))
        .route("/api/v1/leads/enrich", post(handlers::enrich_leads))
        .route("/api/v1/leads/lookup", post(handlers::lookup_person))
        .route("/api/v1/leads/analyze", post(handlers::analyze_lead))
        .route(
            "/api/v1/leads/saved",
            get(handlers::list_saved)
                .post(handlers::save_leads)
                .delete(handlers::clear_saved),
        )
        .route("/api/v1/leads/saved/:id", delete(handlers::delete_saved))
        .route("/api/v1/leads/saved/enrich", post(handlers::enrich_saved))
        .route("/api/v1/leads/saved/export", get(handlers::export_saved))
        .route("/api/v1/offline/filter", post(handlers::filter_offline))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 5MB max payload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check bypassing rate limiting
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
