use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::search::SearchService;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub search: Arc<SearchService>,
}

// These impls let handlers and middleware extract just the part of the
// state they need.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

impl FromRef<ApiContext> for Arc<SearchService> {
    fn from_ref(state: &ApiContext) -> Self {
        state.search.clone()
    }
}
