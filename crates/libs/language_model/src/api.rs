use bon::bon;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanguageModelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type LanguageModelResult<T> = Result<T, LanguageModelError>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatFullResponse {
    choices: Vec<FullChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct FullChoice {
    message: FullMessage,
}

#[derive(Deserialize)]
struct FullMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// A finished chat call: the raw assistant text plus the token total the
/// service reported for the whole exchange.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub total_tokens: u32,
}

#[derive(Clone)]
struct ChatConfig {
    temperature: f32,
    max_tokens: u32,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    config: ChatConfig,
}

#[bon]
impl ChatClient {
    #[builder(start_fn = with_base_url)]
    #[must_use]
    pub fn new(
        #[builder(start_fn)] base_url: &str,
        model: Option<String>,
        api_key: Option<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        timeout: Option<Duration>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(30)))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.to_string(),
            model: model.unwrap_or_default(),
            api_key,
            config: ChatConfig {
                temperature: temperature.unwrap_or(0.1),
                max_tokens: max_tokens.unwrap_or(4000),
            },
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One-shot completion with a system message and a user prompt.
    pub async fn complete(&self, system: &str, prompt: &str) -> LanguageModelResult<Completion> {
        let messages = vec![
            Message {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ];
        self.call(messages).await
    }

    pub async fn call(&self, messages: Vec<Message>) -> LanguageModelResult<Completion> {
        let req_body = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut request = self.http.post(url).json(&req_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LanguageModelError::Api {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let full: ChatFullResponse = response.json().await?;
        let content = full
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        let total_tokens = full.usage.map_or(0, |u| u.total_tokens);
        Ok(Completion {
            content,
            total_tokens,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_apply() {
        let client = ChatClient::with_base_url("http://localhost:8080")
            .model("test-model".to_string())
            .build();
        assert_eq!(client.model(), "test-model");
        assert_eq!(client.config.max_tokens, 4000);
    }

    #[test]
    fn response_parse_tolerates_missing_usage() {
        let raw = r#"{"choices":[{"message":{"content":"[]"}}]}"#;
        let parsed: ChatFullResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.usage.map(|u| u.total_tokens), None);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("[]")
        );
    }
}
