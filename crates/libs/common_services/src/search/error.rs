use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Errors a search call surfaces to its caller. Upstream failures from the
/// reasoning service or the vector index are deliberately absent: those
/// degrade to an empty result list inside the matchers.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("database error")]
    Database(#[from] DbError),
}

fn log_error(error: &SearchError) {
    match error {
        // Client mistakes are expected traffic, not incidents.
        SearchError::InvalidRequest(msg) => debug!("Rejected search request: {msg}"),
        SearchError::ProjectNotFound(name) => debug!("Search against unknown project: {name}"),
        SearchError::Database(e) => error!("Database error during search: {e}"),
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match &self {
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::ProjectNotFound(_) => (StatusCode::NOT_FOUND, "Project not found".to_string()),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
