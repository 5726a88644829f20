use common_types::Project;
use std::fmt::Write as _;

/// The text block one video contributes to the reasoning instruction.
#[derive(Debug, Clone)]
pub struct VideoCorpus {
    pub video_id: String,
    pub video_title: String,
    pub transcript_text: String,
    pub segment_summaries: String,
    pub topics: String,
}

/// Collects per-video text content, one `[start-end] line` per facet entry.
/// Videos whose three facets are all empty contribute nothing and are
/// skipped entirely.
#[must_use]
pub fn assemble_corpus(project: &Project) -> Vec<VideoCorpus> {
    project
        .videos
        .iter()
        .filter(|video| !video.has_no_text_content())
        .map(|video| {
            let transcript_text = video
                .transcript
                .iter()
                .map(|seg| format!("[{}-{}] {}", seg.start, seg.end, seg.text))
                .collect::<Vec<_>>()
                .join("\n");
            let segment_summaries = video
                .segments
                .iter()
                .map(|seg| format!("[{}-{}] {}", seg.start, seg.end, seg.description))
                .collect::<Vec<_>>()
                .join("\n");
            let topics = video
                .topics
                .iter()
                .map(|span| format!("[{}-{}] Topic: {}", span.start, span.end, span.topic))
                .collect::<Vec<_>>()
                .join("\n");
            VideoCorpus {
                video_id: video.id.clone(),
                video_title: video.title.clone(),
                transcript_text,
                segment_summaries,
                topics,
            }
        })
        .collect()
}

/// One labeled block per contributing video, ready for the instruction.
#[must_use]
pub fn corpus_for_analysis(corpora: &[VideoCorpus]) -> String {
    let mut out = String::new();
    for corpus in corpora {
        let _ = write!(
            out,
            "\nVideo: {} (ID: {})\n\nTranscription:\n{}\n\nSegment Summaries:\n{}\n\nTopics:\n{}\n---\n",
            corpus.video_title,
            corpus.video_id,
            corpus.transcript_text,
            corpus.segment_summaries,
            corpus.topics
        );
    }
    out
}
