use crate::database::DbError;
use common_types::{Modality, SearchHistoryRecord, SearchHistoryView};
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, Postgres};

/// Everything a completed search contributes to its history row. The row id
/// and creation timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewSearchRecord {
    pub project_id: String,
    pub query: String,
    pub modality: Modality,
    pub results: serde_json::Value,
    pub token_usage: Option<i32>,
    pub cost: Option<f64>,
    pub model: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

pub struct HistoryStore;

impl HistoryStore {
    /// Appends one history row. Rows are immutable after this point; there
    /// is deliberately no update path.
    pub async fn insert(
        executor: impl Executor<'_, Database = Postgres>,
        id: &str,
        record: &NewSearchRecord,
    ) -> Result<SearchHistoryRecord, DbError> {
        Ok(sqlx::query_as::<_, SearchHistoryRecord>(
            r"
            INSERT INTO search_history
                (id, project_id, query, modality, results, token_usage, cost, model, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            ",
        )
        .bind(id)
        .bind(&record.project_id)
        .bind(&record.query)
        .bind(record.modality)
        .bind(&record.results)
        .bind(record.token_usage)
        .bind(record.cost)
        .bind(&record.model)
        .bind(&record.metadata)
        .fetch_one(executor)
        .await?)
    }

    /// Newest-first listing with the owning project's name attached,
    /// optionally scoped to one project.
    pub async fn list(
        executor: impl Executor<'_, Database = Postgres>,
        project_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHistoryView>, DbError> {
        Ok(sqlx::query_as::<_, SearchHistoryView>(
            r"
            SELECT sh.id, p.name AS project_name, sh.query, sh.modality, sh.results,
                   sh.token_usage, sh.cost, sh.model, sh.metadata, sh.created_at
            FROM search_history sh
            JOIN project p ON p.id = sh.project_id
            WHERE ($1::text IS NULL OR sh.project_id = $1)
            ORDER BY sh.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }

    /// Total row count behind a listing, before limit and offset.
    pub async fn count(
        executor: impl Executor<'_, Database = Postgres>,
        project_id: Option<&str>,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM search_history
            WHERE ($1::text IS NULL OR project_id = $1)
            ",
        )
        .bind(project_id)
        .fetch_one(executor)
        .await?)
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        id: &str,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("DELETE FROM search_history WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?)
    }
}
