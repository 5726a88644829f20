use app_state::AppSettings;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const API_SECRET_HEADER: &str = "x-api-secret";

/// Per-deployment shared-secret guard. The secret comes from settings, so
/// each deployment carries its own; there is no compiled-in fallback.
pub async fn require_api_secret(
    State(settings): State<AppSettings>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if presented == Some(settings.secrets.api_secret.as_str()) {
        next.run(request).await
    } else {
        let body = Json(json!({ "error": "Missing or invalid API secret" }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
