use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A project groups the videos that a search runs over. The orchestrator
/// only ever reads projects; ownership lives with the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub videos: Vec<Video>,
}

/// A video and its searchable content facets. Any facet may be empty;
/// an empty facet contributes nothing to a search and is never an error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub transcript: Vec<TranscriptSegment>,
    pub segments: Vec<SegmentSummary>,
    pub topics: Vec<TopicSpan>,
}

impl Video {
    /// True when none of the text facets carry content.
    #[must_use]
    pub fn has_no_text_content(&self) -> bool {
        self.transcript.is_empty() && self.segments.is_empty() && self.topics.is_empty()
    }
}

/// One time-ranged piece of transcribed speech.
/// Timestamps are `HH.MM.SS` clock strings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub start: String,
    pub end: String,
    pub text: String,
}

/// AI-generated natural-language description of a time range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub start: String,
    pub end: String,
    pub description: String,
}

/// Topic label attached to a time range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicSpan {
    pub start: String,
    pub end: String,
    pub topic: String,
}
