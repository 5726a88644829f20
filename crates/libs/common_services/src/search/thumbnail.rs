use crate::search::timestamp::start_seconds;

/// Frame-thumbnail reference for a result's start timestamp:
/// `/frames/{video_id}/frame_{HH_MM_SS}.jpg`.
///
/// A malformed timestamp or missing video id yields `None` ("no thumbnail")
/// instead of a malformed path.
#[must_use]
pub fn frame_thumbnail(video_id: &str, timestamp_range: &str) -> Option<String> {
    if video_id.is_empty() {
        return None;
    }
    start_seconds(timestamp_range)?;
    let start = timestamp_range.split('-').next()?.trim();
    Some(format!(
        "/frames/{video_id}/frame_{}.jpg",
        start.replace('.', "_")
    ))
}
