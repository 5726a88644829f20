use crate::api_state::ApiContext;
use crate::search::handlers::post_search;
use axum::{Router, routing::post};

pub fn search_secured_router() -> Router<ApiContext> {
    Router::new().route("/search", post(post_search))
}
