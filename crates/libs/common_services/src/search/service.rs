use crate::database::NewSearchRecord;
use crate::search::error::SearchError;
use crate::search::interfaces::{
    HistoryArchive, ImageEmbedder, ProjectCatalog, RelevanceModel, SearchOutcome, SearchQuery,
    SimilarityIndex,
};
use crate::search::{text_matcher, vector_matcher};
use chrono::Utc;
use common_types::Modality;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// The query dispatcher: validates a request, resolves the project, routes
/// to exactly one matcher, and records the completed search.
///
/// Requests are stateless relative to each other; the service is a bundle
/// of shared handles and can be cloned per request.
#[derive(Clone)]
pub struct SearchService {
    catalog: Arc<dyn ProjectCatalog>,
    model: Arc<dyn RelevanceModel>,
    index: Arc<dyn SimilarityIndex>,
    embedder: Arc<dyn ImageEmbedder>,
    archive: Arc<dyn HistoryArchive>,
    cost_per_1k_tokens: f64,
}

impl SearchService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ProjectCatalog>,
        model: Arc<dyn RelevanceModel>,
        index: Arc<dyn SimilarityIndex>,
        embedder: Arc<dyn ImageEmbedder>,
        archive: Arc<dyn HistoryArchive>,
        cost_per_1k_tokens: f64,
    ) -> Self {
        Self {
            catalog,
            model,
            index,
            embedder,
            archive,
            cost_per_1k_tokens,
        }
    }

    /// Runs one search. Upstream failures inside a matcher degrade to an
    /// empty result list; only invalid requests, unknown projects, and
    /// storage failures during project resolution surface as errors.
    pub async fn search(&self, request: SearchQuery) -> Result<SearchOutcome, SearchError> {
        validate(&request)?;

        let project = self
            .catalog
            .project_with_videos(&request.project_name)
            .await?
            .ok_or_else(|| SearchError::ProjectNotFound(request.project_name.clone()))?;

        let outcome = match request.modality {
            Modality::Text => {
                let query = request.query.as_deref().unwrap_or_default();
                text_matcher::text_search(
                    self.model.as_ref(),
                    &project,
                    query,
                    self.cost_per_1k_tokens,
                )
                .await
            }
            Modality::Person | Modality::Frame => {
                let image = request.image.as_deref().unwrap_or_default();
                let results = vector_matcher::image_search(
                    self.embedder.as_ref(),
                    self.index.as_ref(),
                    &project.name,
                    request.modality,
                    image,
                )
                .await;
                SearchOutcome {
                    results,
                    ..SearchOutcome::empty()
                }
            }
        };

        self.record_history(&request, &project.id, &outcome).await;
        Ok(outcome)
    }

    /// Appends the history row for a completed search. The search already
    /// succeeded from the caller's point of view, so a failed write is a
    /// warning, never an error on the response path.
    async fn record_history(&self, request: &SearchQuery, project_id: &str, outcome: &SearchOutcome) {
        let query_label = match request.modality {
            Modality::Text => request.query.clone().unwrap_or_default(),
            modality => format!("{modality}_image_search"),
        };
        let record = NewSearchRecord {
            project_id: project_id.to_string(),
            query: query_label,
            modality: request.modality,
            results: serde_json::to_value(&outcome.results).unwrap_or_else(|_| json!([])),
            token_usage: (outcome.token_usage > 0).then_some(outcome.token_usage),
            cost: (outcome.cost > 0.0).then_some(outcome.cost),
            model: (!outcome.model.is_empty()).then(|| outcome.model.clone()),
            metadata: Some(json!({
                "resultsCount": outcome.results.len(),
                "searchedAt": Utc::now().to_rfc3339(),
            })),
        };
        if let Err(err) = self.archive.append(record).await {
            warn!("Failed to persist search history: {err}");
        }
    }
}

fn validate(request: &SearchQuery) -> Result<(), SearchError> {
    if request.project_name.trim().is_empty() {
        return Err(SearchError::InvalidRequest(
            "Project name and search type are required".into(),
        ));
    }
    match request.modality {
        Modality::Text => {
            if request.query.as_deref().is_none_or(|q| q.trim().is_empty()) {
                return Err(SearchError::InvalidRequest(
                    "Query is required for text search".into(),
                ));
            }
        }
        Modality::Person => {
            if request.image.as_deref().is_none_or(<[u8]>::is_empty) {
                return Err(SearchError::InvalidRequest(
                    "Person image is required for person search".into(),
                ));
            }
        }
        Modality::Frame => {
            if request.image.as_deref().is_none_or(<[u8]>::is_empty) {
                return Err(SearchError::InvalidRequest(
                    "Frame image is required for frame search".into(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::database::{DbError, NewSearchRecord};
    use async_trait::async_trait;
    use common_types::{Project, SearchHistoryRecord, SearchHistoryView, TranscriptSegment, Video};
    use language_model::{Completion, LanguageModelError};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vector_index::{EmbedError, ScoredPoint, VectorIndexError};

    struct FakeCatalog {
        project: Option<Project>,
    }

    #[async_trait]
    impl ProjectCatalog for FakeCatalog {
        async fn project_with_videos(&self, _name: &str) -> Result<Option<Project>, DbError> {
            Ok(self.project.clone())
        }
    }

    struct CountingModel {
        reply: String,
        tokens: u32,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingModel {
        fn replying(reply: &str, tokens: u32) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                tokens,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn silent() -> Arc<Self> {
            Self::replying("[]", 0)
        }
    }

    #[async_trait]
    impl RelevanceModel for CountingModel {
        fn model_id(&self) -> &str {
            "test-relevance-model"
        }

        async fn generate(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<Completion, LanguageModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LanguageModelError::Api {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: "upstream down".into(),
                });
            }
            Ok(Completion {
                content: self.reply.clone(),
                total_tokens: self.tokens,
            })
        }
    }

    struct FakeIndex {
        points: Vec<ScoredPoint>,
        fail: bool,
    }

    impl FakeIndex {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                points: Vec::new(),
                fail: false,
            })
        }

        fn with_scores(scores: &[f32]) -> Arc<Self> {
            let points = scores
                .iter()
                .enumerate()
                .map(|(i, score)| ScoredPoint {
                    id: serde_json::Value::from(i as u64),
                    score: *score,
                    payload: Some(serde_json::json!({
                        "videoId": format!("v{i}"),
                        "videoTitle": format!("Video {i}"),
                        "timestamp": "00.01.00-00.01.10",
                        "imageUrl": format!("/frames/v{i}/frame_00_01_00.jpg"),
                        "personUid": format!("person-{i}"),
                        "frameIndex": i,
                    })),
                })
                .collect();
            Arc::new(Self {
                points,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                points: Vec::new(),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl SimilarityIndex for FakeIndex {
        async fn search_points(
            &self,
            _collection: &str,
            _vector: &[f32],
            _limit: usize,
        ) -> Result<Vec<ScoredPoint>, VectorIndexError> {
            if self.fail {
                return Err(VectorIndexError::Api {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "connection refused".into(),
                });
            }
            Ok(self.points.clone())
        }
    }

    struct FakeEmbedder;

    #[async_trait]
    impl ImageEmbedder for FakeEmbedder {
        async fn embed_image(&self, _image: &[u8]) -> Result<Vec<f32>, EmbedError> {
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    struct MemoryArchive {
        records: Mutex<Vec<SearchHistoryRecord>>,
    }

    impl MemoryArchive {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HistoryArchive for MemoryArchive {
        async fn append(&self, record: NewSearchRecord) -> Result<SearchHistoryRecord, DbError> {
            let mut records = self.records.lock().unwrap();
            let stored = SearchHistoryRecord {
                id: format!("h{}", records.len()),
                project_id: record.project_id,
                query: record.query,
                modality: record.modality,
                results: record.results,
                token_usage: record.token_usage,
                cost: record.cost,
                model: record.model,
                metadata: record.metadata,
                created_at: Utc::now(),
            };
            records.push(stored.clone());
            Ok(stored)
        }

        async fn list(
            &self,
            project_id: Option<&str>,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<SearchHistoryView>, DbError> {
            let records = self.records.lock().unwrap();
            let mut views: Vec<SearchHistoryView> = records
                .iter()
                .filter(|r| project_id.is_none_or(|p| r.project_id == p))
                .map(|r| SearchHistoryView {
                    id: r.id.clone(),
                    // The fake's project id doubles as its name.
                    project_name: r.project_id.clone(),
                    query: r.query.clone(),
                    modality: r.modality,
                    results: r.results.clone(),
                    token_usage: r.token_usage,
                    cost: r.cost,
                    model: r.model.clone(),
                    metadata: r.metadata.clone(),
                    created_at: r.created_at,
                })
                .collect();
            // Reverse first so a stable sort keeps reverse insertion order
            // for equal timestamps.
            views.reverse();
            views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let offset = usize::try_from(offset).unwrap_or(0);
            let limit = usize::try_from(limit).unwrap_or(0);
            Ok(views.into_iter().skip(offset).take(limit).collect())
        }
    }

    fn demo_project() -> Project {
        Project {
            id: "p1".into(),
            name: "demo".into(),
            videos: vec![Video {
                id: "v1".into(),
                title: "Tutorial".into(),
                transcript: vec![TranscriptSegment {
                    start: "00.00.00".into(),
                    end: "00.00.10".into(),
                    text: "welcome to the tutorial".into(),
                }],
                segments: vec![],
                topics: vec![],
            }],
        }
    }

    fn empty_project() -> Project {
        Project {
            id: "p1".into(),
            name: "demo".into(),
            videos: vec![Video {
                id: "v1".into(),
                title: "Tutorial".into(),
                transcript: vec![],
                segments: vec![],
                topics: vec![],
            }],
        }
    }

    struct Harness {
        service: SearchService,
        model: Arc<CountingModel>,
        archive: Arc<MemoryArchive>,
    }

    fn harness(
        project: Option<Project>,
        model: Arc<CountingModel>,
        index: Arc<FakeIndex>,
    ) -> Harness {
        let archive = MemoryArchive::new();
        let service = SearchService::new(
            Arc::new(FakeCatalog { project }),
            model.clone(),
            index,
            Arc::new(FakeEmbedder),
            archive.clone(),
            0.000_15,
        );
        Harness {
            service,
            model,
            archive,
        }
    }

    fn text_query(query: &str) -> SearchQuery {
        SearchQuery {
            project_name: "demo".into(),
            modality: Modality::Text,
            query: Some(query.into()),
            image: None,
        }
    }

    fn image_query(modality: Modality) -> SearchQuery {
        SearchQuery {
            project_name: "demo".into(),
            modality,
            query: None,
            image: Some(vec![1, 2, 3]),
        }
    }

    #[tokio::test]
    async fn content_free_project_skips_reasoning_service() {
        let h = harness(
            Some(empty_project()),
            CountingModel::silent(),
            FakeIndex::empty(),
        );
        let outcome = h.service.search(text_query("welcome")).await.unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.token_usage, 0);
        assert_eq!(h.model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn text_match_maps_to_result_with_thumbnail() {
        let reply = r#"[{
            "videoId": "v1",
            "videoTitle": "Tutorial",
            "timestamp": "00.00.00-00.00.10",
            "score": 0.9,
            "content": "welcome to the tutorial",
            "explanation": "direct transcript hit"
        }]"#;
        let h = harness(
            Some(demo_project()),
            CountingModel::replying(reply, 1000),
            FakeIndex::empty(),
        );
        let outcome = h.service.search(text_query("welcome")).await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        let result = &outcome.results[0];
        assert_eq!(result.modality, Modality::Text);
        assert!((result.score - 0.9).abs() < f32::EPSILON);
        assert_eq!(
            result.image_url.as_deref(),
            Some("/frames/v1/frame_00_00_00.jpg")
        );
        let metadata = result.metadata.as_ref().unwrap();
        assert_eq!(metadata["aiGenerated"], true);
        assert_eq!(metadata["explanation"], "direct transcript hit");
        assert!(metadata.get("personUid").is_none());

        assert_eq!(outcome.token_usage, 1000);
        assert!((outcome.cost - 0.000_15).abs() < 1e-12);
        assert_eq!(outcome.model, "test-relevance-model");
    }

    #[tokio::test]
    async fn unparsable_model_reply_degrades_to_zero_matches() {
        let h = harness(
            Some(demo_project()),
            CountingModel::replying("sorry, I can't help with that", 250),
            FakeIndex::empty(),
        );
        let outcome = h.service.search(text_query("welcome")).await.unwrap();
        assert!(outcome.results.is_empty());
        // The call still happened and still cost tokens.
        assert_eq!(outcome.token_usage, 250);
    }

    #[tokio::test]
    async fn person_search_caps_at_five_in_score_order() {
        let h = harness(
            Some(demo_project()),
            CountingModel::silent(),
            FakeIndex::with_scores(&[0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3]),
        );
        let outcome = h.service.search(image_query(Modality::Person)).await.unwrap();

        assert_eq!(outcome.results.len(), 5);
        let scores: Vec<f32> = outcome.results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.9, 0.8, 0.7, 0.6, 0.5]);
        for result in &outcome.results {
            assert_eq!(result.modality, Modality::Person);
            let metadata = result.metadata.as_ref().unwrap();
            assert!(metadata.get("personUid").is_some());
            assert!(metadata.get("explanation").is_none());
            assert!(result.content.starts_with("Person detected at"));
        }
        assert_eq!(outcome.token_usage, 0);
        assert_eq!(h.model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn frame_results_carry_frame_index_not_person_uid() {
        let h = harness(
            Some(demo_project()),
            CountingModel::silent(),
            FakeIndex::with_scores(&[0.9]),
        );
        let outcome = h.service.search(image_query(Modality::Frame)).await.unwrap();
        assert_eq!(outcome.results.len(), 1);
        let metadata = outcome.results[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["frameIndex"], 0);
        assert!(metadata.get("personUid").is_none());
        assert!(outcome.results[0].content.starts_with("Similar frame found at"));
    }

    #[tokio::test]
    async fn index_failure_degrades_to_empty_success() {
        let h = harness(
            Some(demo_project()),
            CountingModel::silent(),
            FakeIndex::failing(),
        );
        let outcome = h.service.search(image_query(Modality::Person)).await.unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.token_usage, 0);
        assert!(outcome.cost.abs() < f64::EPSILON);
        assert_eq!(outcome.model, "");
    }

    #[tokio::test]
    async fn repeated_searches_append_independent_history_rows() {
        let h = harness(
            Some(empty_project()),
            CountingModel::silent(),
            FakeIndex::empty(),
        );
        h.service.search(text_query("welcome")).await.unwrap();
        h.service.search(text_query("welcome")).await.unwrap();

        let records = h.archive.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
        assert_eq!(records[0].query, "welcome");
        assert_eq!(records[0].metadata.as_ref().unwrap()["resultsCount"], 0);
    }

    #[tokio::test]
    async fn history_listing_windows_newest_first() {
        let h = harness(
            Some(empty_project()),
            CountingModel::silent(),
            FakeIndex::empty(),
        );
        h.service.search(text_query("first")).await.unwrap();
        h.service.search(text_query("second")).await.unwrap();
        h.service.search(text_query("third")).await.unwrap();

        let newest = h.archive.list(None, 1, 0).await.unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].query, "third");

        let second_page = h.archive.list(None, 1, 1).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].query, "second");

        let rest = h.archive.list(None, 10, 1).await.unwrap();
        let queries: Vec<&str> = rest.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["second", "first"]);

        let other_project = h.archive.list(Some("absent"), 10, 0).await.unwrap();
        assert!(other_project.is_empty());
    }

    #[tokio::test]
    async fn image_search_history_uses_synthetic_label() {
        let h = harness(
            Some(demo_project()),
            CountingModel::silent(),
            FakeIndex::with_scores(&[0.9]),
        );
        h.service.search(image_query(Modality::Frame)).await.unwrap();
        let records = h.archive.records.lock().unwrap();
        assert_eq!(records[0].query, "frame_image_search");
        assert_eq!(records[0].modality, Modality::Frame);
        assert_eq!(records[0].token_usage, None);
        assert_eq!(records[0].model, None);
    }

    #[tokio::test]
    async fn unknown_project_is_a_client_error() {
        let h = harness(None, CountingModel::silent(), FakeIndex::empty());
        let err = h.service.search(text_query("welcome")).await.unwrap_err();
        assert!(matches!(err, SearchError::ProjectNotFound(name) if name == "demo"));
    }

    #[tokio::test]
    async fn modality_payload_mismatch_is_rejected() {
        let h = harness(
            Some(demo_project()),
            CountingModel::silent(),
            FakeIndex::empty(),
        );

        let mut missing_query = text_query("");
        missing_query.query = Some("   ".into());
        let err = h.service.search(missing_query).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidRequest(_)));

        let mut missing_image = image_query(Modality::Person);
        missing_image.image = None;
        let err = h.service.search(missing_image).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidRequest(_)));

        let mut blank_project = text_query("welcome");
        blank_project.project_name = String::new();
        let err = h.service.search(blank_project).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidRequest(_)));

        assert_eq!(h.model.calls.load(Ordering::SeqCst), 0);
        assert!(h.archive.records.lock().unwrap().is_empty());
    }
}
