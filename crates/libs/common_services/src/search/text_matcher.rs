use crate::search::cardinality::limit_candidates;
use crate::search::corpus::{assemble_corpus, corpus_for_analysis};
use crate::search::interfaces::{RelevanceModel, SearchOutcome};
use crate::search::thumbnail::frame_thumbnail;
use chrono::Utc;
use common_types::{Modality, Project, SearchResult};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

pub(crate) const SYSTEM_PROMPT: &str =
    "You are a precise video content search assistant. Always respond with valid JSON only.";

/// One entry of the reasoning service's structured reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelevanceMatch {
    video_id: String,
    #[serde(default)]
    video_title: String,
    #[serde(default)]
    timestamp: Option<String>,
    score: f32,
    #[serde(default)]
    content: String,
    #[serde(default)]
    explanation: Option<String>,
}

fn build_prompt(query: &str, content_for_analysis: &str) -> String {
    format!(
        r#"You are a video content search assistant. Given the following video content from a project, find the most relevant segments that match the user's search query.

Search Query: "{query}"

Video Content:
{content_for_analysis}

Instructions:
1. Analyze the transcription, segment summaries, and topics to find content relevant to the search query
2. Return the most relevant matches with their exact timestamps
3. Provide a relevance score (0-1) for each match
4. Include a brief explanation of why each segment is relevant

Please respond with a JSON array of matches in this format:
[
  {{
    "videoId": "video_id",
    "videoTitle": "video_title",
    "timestamp": "HH.MM.SS-HH.MM.SS",
    "score": 0.95,
    "content": "relevant_text_excerpt",
    "explanation": "why_this_is_relevant"
  }}
]

Only return matches with score >= 0.3. Return minimum 3 matches, maximum 5 matches.
"#
    )
}

/// Lenient parse of the model reply. Code fences are tolerated, entries that
/// don't fit the contract are dropped individually, and anything
/// unparseable is zero matches. Malformed model output is an expected
/// failure mode here, not a system error.
fn parse_matches(raw: &str) -> Vec<RelevanceMatch> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();

    let Ok(entries) = serde_json::from_str::<Vec<serde_json::Value>>(trimmed) else {
        warn!("Reasoning service reply was not a JSON array; treating as zero matches");
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RelevanceMatch>(entry).ok())
        .collect()
}

/// Free-text search over a project's aggregate video content, with
/// relevance judgment delegated to the reasoning service.
pub(crate) async fn text_search(
    model: &dyn RelevanceModel,
    project: &Project,
    query: &str,
    cost_per_1k_tokens: f64,
) -> SearchOutcome {
    let corpora = assemble_corpus(project);
    if corpora.is_empty() {
        // Nothing to search over; don't spend tokens on an empty corpus.
        return SearchOutcome::empty();
    }

    let prompt = build_prompt(query, &corpus_for_analysis(&corpora));
    let completion = match model.generate(SYSTEM_PROMPT, &prompt).await {
        Ok(completion) => completion,
        Err(err) => {
            warn!("Reasoning service unavailable, degrading to empty results: {err}");
            return SearchOutcome::empty();
        }
    };

    let matches = parse_matches(&completion.content);
    let limited = limit_candidates(&matches);

    let now_ms = Utc::now().timestamp_millis();
    let results = limited
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let image_url = entry
                .timestamp
                .as_deref()
                .and_then(|range| frame_thumbnail(&entry.video_id, range));
            SearchResult {
                id: format!("text_{now_ms}_{index}"),
                modality: Modality::Text,
                video_id: entry.video_id,
                video_title: entry.video_title,
                timestamp: entry.timestamp,
                score: entry.score.clamp(0.0, 1.0),
                content: entry.content,
                image_url,
                metadata: Some(json!({
                    "explanation": entry.explanation,
                    "aiGenerated": true,
                })),
            }
        })
        .collect();

    let token_usage = i32::try_from(completion.total_tokens).unwrap_or(i32::MAX);
    SearchOutcome {
        results,
        token_usage,
        cost: f64::from(completion.total_tokens) * cost_per_1k_tokens / 1000.0,
        model: model.model_id().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_reply() {
        let raw = "```json\n[{\"videoId\":\"v1\",\"videoTitle\":\"T\",\"timestamp\":\"00.00.00-00.00.10\",\"score\":0.9,\"content\":\"hi\",\"explanation\":\"because\"}]\n```";
        let matches = parse_matches(raw);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].video_id, "v1");
    }

    #[test]
    fn garbage_reply_is_zero_matches() {
        assert!(parse_matches("I could not find anything relevant.").is_empty());
        assert!(parse_matches("").is_empty());
    }

    #[test]
    fn entries_missing_required_fields_are_dropped() {
        let raw = r#"[
            {"videoId": "v1", "score": 0.8},
            {"videoTitle": "no id", "score": 0.9}
        ]"#;
        let matches = parse_matches(raw);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].video_id, "v1");
    }

    #[test]
    fn prompt_embeds_query_and_contract() {
        let prompt = build_prompt("welcome", "corpus goes here");
        assert!(prompt.contains("Search Query: \"welcome\""));
        assert!(prompt.contains("corpus goes here"));
        assert!(prompt.contains("score >= 0.3"));
        assert!(prompt.contains("minimum 3 matches, maximum 5 matches"));
    }
}
