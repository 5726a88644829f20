use crate::Modality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One completed search, persisted for audit and replay.
///
/// Records are append-only: created once per search, immutable afterwards
/// except for deletion. Image searches store a synthetic
/// `{modality}_image_search` label in `query`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryRecord {
    pub id: String,
    pub project_id: String,
    pub query: String,
    #[serde(rename = "searchType")]
    pub modality: Modality,
    /// Full serialized result list as returned to the caller.
    pub results: serde_json::Value,
    pub token_usage: Option<i32>,
    pub cost: Option<f64>,
    pub model: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// History row as listed over the API: the record joined with the owning
/// project's name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryView {
    pub id: String,
    pub project_name: String,
    pub query: String,
    #[serde(rename = "searchType")]
    pub modality: Modality,
    pub results: serde_json::Value,
    pub token_usage: Option<i32>,
    pub cost: Option<f64>,
    pub model: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
