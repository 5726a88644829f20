use base64::{Engine as _, engine::general_purpose};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {status}: {text}")]
    UnexpectedStatus { status: StatusCode, text: String },
}

#[derive(Serialize)]
struct EmbedImageRequest {
    image: String,
}

#[derive(Deserialize)]
struct EmbedImageResponse {
    embedding: Vec<f32>,
}

/// Client for the sidecar that turns a query image into the vector
/// representation the index was populated with.
#[derive(Clone)]
pub struct EmbedClient {
    http: reqwest::Client,
    embed_url: String,
}

impl EmbedClient {
    #[must_use]
    pub fn new(embed_url: &str, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            embed_url: embed_url.to_string(),
        }
    }

    /// Embed raw image bytes. The sidecar receives base64 and returns the
    /// vector in the index's coordinate space.
    pub async fn embed_image(&self, image: &[u8]) -> Result<Vec<f32>, EmbedError> {
        let body = EmbedImageRequest {
            image: general_purpose::STANDARD.encode(image),
        };
        let response = self.http.post(&self.embed_url).json(&body).send().await?;
        match response.status() {
            StatusCode::OK => {
                let parsed: EmbedImageResponse = response.json().await?;
                Ok(parsed.embedding)
            }
            status => {
                let text = response.text().await?;
                Err(EmbedError::UnexpectedStatus { status, text })
            }
        }
    }
}
