mod api_doc;
pub mod history;
pub mod root;
mod secret;
pub mod search;

use crate::api_state::ApiContext;
use crate::history::router::history_secured_router;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::routes::secret::require_api_secret;
use crate::search::router::search_secured_router;
use axum::Router;
use axum::middleware::from_fn_with_state;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(public_routes())
        .merge(secured_routes(api_state.clone()))
        .with_state(api_state)
}

fn public_routes() -> Router<ApiContext> {
    root_public_router()
}

fn secured_routes(api_state: ApiContext) -> Router<ApiContext> {
    Router::new()
        .merge(search_secured_router())
        .merge(history_secured_router())
        .route_layer(from_fn_with_state(api_state, require_api_secret))
}
