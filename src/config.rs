use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub apollo_base_url: String,
    pub apollo_api_key: String,
    pub openai_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Path of the saved-leads snapshot file.
    pub store_path: String,
    /// Country omitted from formatted locations.
    pub home_country: String,
    /// Per-call timeout for enrichment lookups, milliseconds.
    pub enrich_call_timeout_ms: u64,
    /// Whole-batch timeout for an enrichment pass, milliseconds.
    pub enrich_batch_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            apollo_base_url: std::env::var("APOLLO_BASE_URL")
                .unwrap_or_else(|_| "https://api.apollo.io".to_string())
                .trim_end_matches('/')
                .to_string(),
            apollo_api_key: std::env::var("APOLLO_API_KEY")
                .map_err(|_| anyhow::anyhow!("APOLLO_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("APOLLO_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("OPENAI_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            store_path: std::env::var("STORE_PATH")
                .unwrap_or_else(|_| "saved_leads.json".to_string()),
            home_country: std::env::var("HOME_COUNTRY")
                .unwrap_or_else(|_| "United States".to_string()),
            enrich_call_timeout_ms: std::env::var("ENRICH_CALL_TIMEOUT_MS")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ENRICH_CALL_TIMEOUT_MS must be a valid number"))?,
            enrich_batch_timeout_ms: std::env::var("ENRICH_BATCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ENRICH_BATCH_TIMEOUT_MS must be a valid number"))?,
        };

        if !config.apollo_base_url.starts_with("http://")
            && !config.apollo_base_url.starts_with("https://")
        {
            anyhow::bail!("APOLLO_BASE_URL must start with http:// or https://");
        }
        if !config.openai_base_url.starts_with("http://")
            && !config.openai_base_url.starts_with("https://")
        {
            anyhow::bail!("OPENAI_BASE_URL must start with http:// or https://");
        }
        if config.enrich_call_timeout_ms == 0 || config.enrich_batch_timeout_ms == 0 {
            anyhow::bail!("enrichment timeouts must be greater than zero");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Apollo Base URL: {}", config.apollo_base_url);
        tracing::debug!("OpenAI Base URL: {}", config.openai_base_url);
        tracing::debug!("OpenAI Model: {}", config.openai_model);
        tracing::debug!("Store Path: {}", config.store_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
