use crate::routes::{history, root, search};
use common_services::search::SearchOutcome;
use common_types::{Modality, SearchHistoryView, SearchResult};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Search handlers
        search::handlers::post_search,
        // History handlers
        history::handlers::list_search_history,
        history::handlers::delete_search_history,
    ),
    components(
        schemas(
            Modality,
            SearchResult,
            SearchOutcome,
            SearchHistoryView,
            history::interfaces::HistoryListResponse,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Search", description = "Multi-modal content search over a project's videos"),
        (name = "History", description = "Audit trail of completed searches"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_secret",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-api-secret"))),
        );
    }
}
