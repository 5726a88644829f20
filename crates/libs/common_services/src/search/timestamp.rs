/// Seek offset in seconds for a `HH.MM.SS-HH.MM.SS` timestamp range.
///
/// Clients use this to jump a video player to the moment a result refers
/// to. Malformed input means "don't seek", never an error.
#[must_use]
pub fn start_seconds(range: &str) -> Option<u32> {
    let start = range.split('-').next()?;
    clock_seconds(start.trim())
}

/// Parse one `HH.MM.SS` clock position into absolute seconds.
#[must_use]
pub fn clock_seconds(clock: &str) -> Option<u32> {
    let mut fields = clock.split('.');
    let hours: u32 = fields.next()?.parse().ok()?;
    let minutes: u32 = fields.next()?.parse().ok()?;
    let seconds: u32 = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}
