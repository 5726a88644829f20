use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub reasoning: RawReasoningSettings,
    pub vector_index: RawVectorIndexSettings,
    pub database: DatabaseSettings,
    pub secrets: SecretSettings,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
}

/// The external reasoning service used by the text matcher.
#[derive(Debug, Deserialize, Clone)]
pub struct RawReasoningSettings {
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    pub base_url: String,
    pub model: String,
    /// Estimated USD per 1000 tokens for the configured model.
    pub cost_per_1k_tokens: f64,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The external similarity index and the sidecar that embeds query images.
#[derive(Debug, Deserialize, Clone)]
pub struct RawVectorIndexSettings {
    pub base_url: String,
    pub embed_url: String,
    pub timeout_seconds: u64,
}

/// Database connection tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
    /// Length of generated ids for search history rows.
    pub history_id_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
    /// Per-deployment shared secret required on every non-root route.
    pub api_secret: String,
    pub reasoning_api_key: Option<String>,
    pub vector_index_api_key: Option<String>,
}
