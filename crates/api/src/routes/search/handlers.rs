use axum::Json;
use axum::extract::{Multipart, State};
use common_services::search::{SearchError, SearchOutcome, SearchQuery, SearchService};
use common_types::Modality;
use std::sync::Arc;
use tracing::instrument;

/// Run one search against a project's video library.
///
/// The request is multipart: `projectName` and `searchType` are always
/// required, `query` carries the text for text searches, and `personImage`
/// or `frameImage` carries the query image for the image modalities.
///
/// # Errors
///
/// Returns a `SearchError` for malformed requests, unknown projects, and
/// database failures.
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    responses(
        (status = 200, description = "Search results with usage accounting", body = SearchOutcome),
        (status = 400, description = "Missing or invalid request fields"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "A database error occurred."),
    ),
    security(("api_secret" = []))
)]
#[instrument(skip(search, multipart))]
pub async fn post_search(
    State(search): State<Arc<SearchService>>,
    multipart: Multipart,
) -> Result<Json<SearchOutcome>, SearchError> {
    let request = parse_search_request(multipart).await?;
    let outcome = search.search(request).await?;
    Ok(Json(outcome))
}

struct SearchForm {
    project_name: Option<String>,
    search_type: Option<String>,
    query: Option<String>,
    person_image: Option<Vec<u8>>,
    frame_image: Option<Vec<u8>>,
}

async fn parse_search_request(mut multipart: Multipart) -> Result<SearchQuery, SearchError> {
    let mut form = SearchForm {
        project_name: None,
        search_type: None,
        query: None,
        person_image: None,
        frame_image: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| SearchError::InvalidRequest("Malformed multipart request".to_string()))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "projectName" => form.project_name = Some(read_text(field).await?),
            "searchType" => form.search_type = Some(read_text(field).await?),
            "query" => form.query = Some(read_text(field).await?),
            "personImage" => form.person_image = Some(read_bytes(field).await?),
            "frameImage" => form.frame_image = Some(read_bytes(field).await?),
            _ => {}
        }
    }

    let (Some(project_name), Some(search_type)) = (form.project_name, form.search_type) else {
        return Err(SearchError::InvalidRequest(
            "Project name and search type are required".to_string(),
        ));
    };
    let modality = Modality::parse(&search_type)
        .ok_or_else(|| SearchError::InvalidRequest("Invalid search type".to_string()))?;

    // Each image modality reads its own field; a frame upload on a person
    // search is ignored rather than borrowed.
    let image = match modality {
        Modality::Text => None,
        Modality::Person => form.person_image,
        Modality::Frame => form.frame_image,
    };

    Ok(SearchQuery {
        project_name,
        modality,
        query: form.query,
        image,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, SearchError> {
    field
        .text()
        .await
        .map_err(|_| SearchError::InvalidRequest("Malformed multipart request".to_string()))
}

async fn read_bytes(field: axum::extract::multipart::Field<'_>) -> Result<Vec<u8>, SearchError> {
    field
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|_| SearchError::InvalidRequest("Malformed multipart request".to_string()))
}
