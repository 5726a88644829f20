use crate::{
    ApiSettings, DatabaseSettings, LoggingSettings, RawReasoningSettings, RawSettings,
    RawVectorIndexSettings, SecretSettings,
};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub reasoning: ReasoningSettings,
    pub vector_index: VectorIndexSettings,
    pub database: DatabaseSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Clone)]
pub struct ReasoningSettings {
    pub base_url: String,
    pub model: String,
    pub cost_per_1k_tokens: f64,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct VectorIndexSettings {
    pub base_url: String,
    pub embed_url: String,
    pub timeout: Duration,
}

impl From<RawReasoningSettings> for ReasoningSettings {
    fn from(raw: RawReasoningSettings) -> Self {
        Self {
            base_url: raw.base_url,
            model: raw.model,
            cost_per_1k_tokens: raw.cost_per_1k_tokens,
            timeout: Duration::from_secs(raw.timeout_seconds),
            temperature: raw.temperature,
            max_tokens: raw.max_tokens,
        }
    }
}

impl From<RawVectorIndexSettings> for VectorIndexSettings {
    fn from(raw: RawVectorIndexSettings) -> Self {
        Self {
            base_url: raw.base_url,
            embed_url: raw.embed_url,
            timeout: Duration::from_secs(raw.timeout_seconds),
        }
    }
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            logging: raw.logging,
            api: raw.api,
            reasoning: raw.reasoning.into(),
            vector_index: raw.vector_index.into(),
            database: raw.database,
            secrets: raw.secrets,
        }
    }
}
