use bon::bon;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorIndexError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Index error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type VectorIndexResult<T> = Result<T, VectorIndexError>;

#[derive(Serialize)]
struct SearchPointsRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchPointsResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

/// One nearest-neighbor hit, score-ordered by the index.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub id: serde_json::Value,
    pub score: f32,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl ScoredPoint {
    /// String form of the index's internal point id, for traceability.
    #[must_use]
    pub fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Client for a Qdrant-style REST similarity index. Collections are scoped
/// per project and modality (`{project}_person`, `{project}_frames`).
#[derive(Clone)]
pub struct IndexClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[bon]
impl IndexClient {
    #[builder(start_fn = with_base_url)]
    #[must_use]
    pub fn new(
        #[builder(start_fn)] base_url: &str,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(5)))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.to_string(),
            api_key,
        }
    }

    /// Nearest-point search with payloads attached.
    pub async fn search_points(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> VectorIndexResult<Vec<ScoredPoint>> {
        let url = format!("{}/collections/{collection}/points/search", self.base_url);
        let body = SearchPointsRequest {
            vector,
            limit,
            with_payload: true,
        };
        let mut request = self.http.post(url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(VectorIndexError::Api {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let parsed: SearchPointsResponse = response.json().await?;
        Ok(parsed.result)
    }
}
