use crate::api_state::ApiContext;
use crate::history::handlers::{delete_search_history, list_search_history};
use axum::{
    Router,
    routing::{delete, get},
};

pub fn history_secured_router() -> Router<ApiContext> {
    Router::new()
        .route("/search/history", get(list_search_history))
        .route("/search/history/{id}", delete(delete_search_history))
}
