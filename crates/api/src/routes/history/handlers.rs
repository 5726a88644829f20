use crate::history::error::HistoryError;
use crate::history::interfaces::{HistoryListParams, HistoryListResponse};
use axum::Json;
use axum::extract::{Path, Query, State};
use common_services::database::{HistoryStore, ProjectStore};
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::instrument;

/// List completed searches, newest first.
///
/// # Errors
///
/// Returns a `HistoryError` when the named project does not exist or the
/// database query fails.
#[utoipa::path(
    get,
    path = "/search/history",
    tag = "History",
    params(HistoryListParams),
    responses(
        (status = 200, description = "Search history page", body = HistoryListResponse),
        (status = 404, description = "Project not found"),
        (status = 500, description = "A database error occurred."),
    ),
    security(("api_secret" = []))
)]
#[instrument(skip(pool))]
pub async fn list_search_history(
    State(pool): State<PgPool>,
    Query(params): Query<HistoryListParams>,
) -> Result<Json<HistoryListResponse>, HistoryError> {
    let project_id = match &params.project {
        Some(name) => Some(
            ProjectStore::find_id_by_name(&pool, name)
                .await?
                .ok_or_else(|| HistoryError::ProjectNotFound(name.clone()))?,
        ),
        None => None,
    };

    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);
    let searches =
        HistoryStore::list(&pool, project_id.as_deref(), limit, offset).await?;
    let total_count = HistoryStore::count(&pool, project_id.as_deref()).await?;

    Ok(Json(HistoryListResponse {
        searches,
        total_count,
    }))
}

/// Delete one history entry by id.
///
/// # Errors
///
/// Returns a `HistoryError` when the entry does not exist or the database
/// query fails.
#[utoipa::path(
    delete,
    path = "/search/history/{id}",
    tag = "History",
    params(("id" = String, Path, description = "History entry id")),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 404, description = "Search history entry not found"),
        (status = 500, description = "A database error occurred."),
    ),
    security(("api_secret" = []))
)]
#[instrument(skip(pool))]
pub async fn delete_search_history(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HistoryError> {
    let result = HistoryStore::delete(&pool, &id).await?;
    if result.rows_affected() == 0 {
        return Err(HistoryError::EntryNotFound(id));
    }
    Ok(Json(json!({
        "message": "Search history deleted successfully"
    })))
}
