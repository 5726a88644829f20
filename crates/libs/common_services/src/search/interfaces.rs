use crate::database::{DbError, NewSearchRecord};
use async_trait::async_trait;
use common_types::{Modality, Project, SearchHistoryRecord, SearchHistoryView, SearchResult};
use language_model::{Completion, LanguageModelError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use vector_index::{EmbedError, ScoredPoint, VectorIndexError};

/// One search request as the dispatcher sees it: a project, a modality, and
/// the modality's payload (query text or one image).
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub project_name: String,
    pub modality: Modality,
    pub query: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// What a completed search returns to the caller. Accounting fields are
/// zero-valued for image modalities, which never touch the reasoning
/// service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub token_usage: i32,
    pub cost: f64,
    pub model: String,
}

impl SearchOutcome {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            token_usage: 0,
            cost: 0.0,
            model: String::new(),
        }
    }
}

/// Read access to projects and their videos.
#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    async fn project_with_videos(&self, name: &str) -> Result<Option<Project>, DbError>;
}

/// The external reasoning service the text matcher delegates relevance
/// judgment to.
#[async_trait]
pub trait RelevanceModel: Send + Sync {
    fn model_id(&self) -> &str;
    async fn generate(&self, system: &str, prompt: &str)
    -> Result<Completion, LanguageModelError>;
}

/// Nearest-neighbor lookups in the per-project, per-modality collections.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    async fn search_points(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError>;
}

/// Turns an uploaded query image into the index's vector representation.
#[async_trait]
pub trait ImageEmbedder: Send + Sync {
    async fn embed_image(&self, image: &[u8]) -> Result<Vec<f32>, EmbedError>;
}

/// Append-only sink for completed searches. Listing is newest-first with
/// limit/offset windowing, optionally scoped to one project.
#[async_trait]
pub trait HistoryArchive: Send + Sync {
    async fn append(&self, record: NewSearchRecord) -> Result<SearchHistoryRecord, DbError>;

    async fn list(
        &self,
        project_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHistoryView>, DbError>;
}
