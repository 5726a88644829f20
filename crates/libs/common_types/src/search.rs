use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// The three ways a library can be queried.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "search_modality", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Person,
    Frame,
}

impl Modality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Person => "person",
            Self::Frame => "frame",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "person" => Some(Self::Person),
            "frame" => Some(Self::Frame),
            _ => None,
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The unified record every matcher produces, regardless of backend.
///
/// The modality determines which optional fields are populated: text results
/// carry a timestamp and an `explanation` in metadata, person results carry
/// `personUid`, frame results carry `frameIndex`. Results are ephemeral;
/// only the history record keeps a serialized copy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub modality: Modality,
    pub video_id: String,
    pub video_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub score: f32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}
