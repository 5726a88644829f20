use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::extract::DefaultBodyLimit;
use color_eyre::Result;
use common_services::search::{PgCatalog, PgHistoryArchive, SearchService};
use language_model::ChatClient;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vector_index::{EmbedClient, IndexClient};

/// Query images go through multipart, so the body cap has to fit a full
/// resolution frame.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub async fn serve(pool: PgPool, settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("🚀 Initializing server...");

    let chat_client = ChatClient::with_base_url(&settings.reasoning.base_url)
        .model(settings.reasoning.model.clone())
        .maybe_api_key(settings.secrets.reasoning_api_key.clone())
        .temperature(settings.reasoning.temperature)
        .max_tokens(settings.reasoning.max_tokens)
        .timeout(settings.reasoning.timeout)
        .build();
    let index_client = IndexClient::with_base_url(&settings.vector_index.base_url)
        .maybe_api_key(settings.secrets.vector_index_api_key.clone())
        .timeout(settings.vector_index.timeout)
        .build();
    let embed_client = EmbedClient::new(
        &settings.vector_index.embed_url,
        settings.vector_index.timeout,
    );

    let search = SearchService::new(
        Arc::new(PgCatalog::new(pool.clone())),
        Arc::new(chat_client),
        Arc::new(index_client),
        Arc::new(embed_client),
        Arc::new(PgHistoryArchive::new(
            pool.clone(),
            settings.database.history_id_length,
        )),
        settings.reasoning.cost_per_1k_tokens,
    );

    let api_state = ApiContext {
        pool,
        settings: settings.clone(),
        search: Arc::new(search),
    };

    // --- Create Router ---
    let app = create_router(api_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES));

    let addr = format!("{}:{}", settings.api.host, settings.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🐸 Server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
