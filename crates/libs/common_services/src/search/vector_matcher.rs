use crate::search::cardinality::limit_candidates;
use crate::search::interfaces::{ImageEmbedder, SimilarityIndex};
use chrono::Utc;
use common_types::{Modality, SearchResult};
use serde_json::json;
use tracing::warn;

/// How many nearest points to pull from the index before the cardinality
/// policy trims the list.
pub(crate) const NEAREST_POINT_LIMIT: usize = 20;

fn payload_str(payload: Option<&serde_json::Value>, key: &str) -> Option<String> {
    payload?
        .get(key)
        .and_then(|v| v.as_str())
        .map(ToString::to_string)
}

/// Image-similarity search against the project's person or frame
/// collection. Any embedding or index failure degrades to an empty result
/// list; search is best-effort, not transactional.
pub(crate) async fn image_search(
    embedder: &dyn ImageEmbedder,
    index: &dyn SimilarityIndex,
    project_name: &str,
    modality: Modality,
    image: &[u8],
) -> Vec<SearchResult> {
    let (collection_suffix, id_prefix) = match modality {
        Modality::Person => ("person", "person"),
        Modality::Frame => ("frames", "frame"),
        Modality::Text => return Vec::new(),
    };

    let vector = match embedder.embed_image(image).await {
        Ok(vector) => vector,
        Err(err) => {
            warn!("Image embedding unavailable, degrading to empty results: {err}");
            return Vec::new();
        }
    };

    let collection = format!("{project_name}_{collection_suffix}");
    let hits = match index
        .search_points(&collection, &vector, NEAREST_POINT_LIMIT)
        .await
    {
        Ok(hits) => hits,
        Err(err) => {
            warn!("Vector index unavailable, degrading to empty results: {err}");
            return Vec::new();
        }
    };

    let limited = limit_candidates(&hits);
    let now_ms = Utc::now().timestamp_millis();
    limited
        .into_iter()
        .enumerate()
        .map(|(index, point)| {
            let payload = point.payload.as_ref();
            let timestamp = payload_str(payload, "timestamp").filter(|t| !t.is_empty());
            let shown_at = timestamp.clone().unwrap_or_else(|| "unknown time".into());
            let (content, metadata) = if modality == Modality::Person {
                (
                    format!("Person detected at {shown_at}"),
                    json!({
                        "personUid": payload_str(payload, "personUid"),
                        "pointId": point.id_string(),
                    }),
                )
            } else {
                (
                    format!("Similar frame found at {shown_at}"),
                    json!({
                        "frameIndex": payload.and_then(|p| p.get("frameIndex")).cloned(),
                        "pointId": point.id_string(),
                    }),
                )
            };
            SearchResult {
                id: format!("{id_prefix}_{now_ms}_{index}"),
                modality,
                video_id: payload_str(payload, "videoId").unwrap_or_default(),
                video_title: payload_str(payload, "videoTitle")
                    .unwrap_or_else(|| "Unknown Video".into()),
                timestamp,
                score: point.score,
                content,
                image_url: payload_str(payload, "imageUrl").filter(|u| !u.is_empty()),
                metadata: Some(metadata),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_payload_falls_back_to_defaults() {
        assert_eq!(payload_str(None, "videoId"), None);
        let payload = json!({"videoTitle": "Intro"});
        assert_eq!(
            payload_str(Some(&payload), "videoTitle").as_deref(),
            Some("Intro")
        );
        assert_eq!(payload_str(Some(&payload), "videoId"), None);
    }
}
