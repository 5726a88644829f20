use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common_services::database::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("history entry not found: {0}")]
    EntryNotFound(String),

    #[error("database error")]
    Database(#[from] DbError),
}

fn log_error(err: &HistoryError) {
    match err {
        HistoryError::ProjectNotFound(name) => {
            debug!("History listing for unknown project: {name}");
        }
        HistoryError::EntryNotFound(id) => debug!("Delete of unknown history entry: {id}"),
        HistoryError::Database(e) => error!("Database error in history route: {e}"),
    }
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match &self {
            Self::ProjectNotFound(_) => (StatusCode::NOT_FOUND, "Project not found"),
            Self::EntryNotFound(_) => (StatusCode::NOT_FOUND, "Search history entry not found"),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.",
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
