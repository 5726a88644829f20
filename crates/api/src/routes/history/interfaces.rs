use common_types::SearchHistoryView;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

fn default_limit() -> i64 {
    50
}

/// Query parameters for the history listing. `project` filters by the
/// project's unique name, not its id.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListParams {
    pub project: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListResponse {
    pub searches: Vec<SearchHistoryView>,
    pub total_count: i64,
}
