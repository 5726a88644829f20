use crate::database::{DbError, HistoryStore, NewSearchRecord, ProjectStore, new_short_id};
use crate::search::interfaces::{
    HistoryArchive, ImageEmbedder, ProjectCatalog, RelevanceModel, SimilarityIndex,
};
use async_trait::async_trait;
use common_types::{Project, SearchHistoryRecord, SearchHistoryView};
use language_model::{ChatClient, Completion, LanguageModelError};
use sqlx::PgPool;
use vector_index::{EmbedClient, EmbedError, IndexClient, ScoredPoint, VectorIndexError};

#[async_trait]
impl RelevanceModel for ChatClient {
    fn model_id(&self) -> &str {
        self.model()
    }

    async fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<Completion, LanguageModelError> {
        self.complete(system, prompt).await
    }
}

#[async_trait]
impl SimilarityIndex for IndexClient {
    async fn search_points(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError> {
        Self::search_points(self, collection, vector, limit).await
    }
}

#[async_trait]
impl ImageEmbedder for EmbedClient {
    async fn embed_image(&self, image: &[u8]) -> Result<Vec<f32>, EmbedError> {
        Self::embed_image(self, image).await
    }
}

/// Project reads backed by Postgres.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectCatalog for PgCatalog {
    async fn project_with_videos(&self, name: &str) -> Result<Option<Project>, DbError> {
        ProjectStore::find_by_name_with_videos(&self.pool, name).await
    }
}

/// History rows backed by Postgres, with ids generated on append.
#[derive(Clone)]
pub struct PgHistoryArchive {
    pool: PgPool,
    id_length: usize,
}

impl PgHistoryArchive {
    #[must_use]
    pub const fn new(pool: PgPool, id_length: usize) -> Self {
        Self { pool, id_length }
    }
}

#[async_trait]
impl HistoryArchive for PgHistoryArchive {
    async fn append(&self, record: NewSearchRecord) -> Result<SearchHistoryRecord, DbError> {
        let id = new_short_id(self.id_length);
        HistoryStore::insert(&self.pool, &id, &record).await
    }

    async fn list(
        &self,
        project_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHistoryView>, DbError> {
        HistoryStore::list(&self.pool, project_id, limit, offset).await
    }
}
