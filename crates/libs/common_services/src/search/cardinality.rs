/// Hard cap on how many results a search may return.
pub const MAX_RESULTS: usize = 5;
/// Intended floor when enough qualifying candidates exist.
pub const MIN_RESULTS: usize = 3;

/// Bounds an ordered candidate list before results are built. Input is
/// assumed pre-sorted by descending score; order is preserved.
///
/// The second branch re-slices to exactly `MIN_RESULTS` when the capped
/// slice came up short despite at least three candidates existing. As
/// written that condition cannot trigger (a list of >= 3 always caps to
/// >= 3); it is kept until product signs off on the intended
/// "at least 3 when possible" rule.
#[must_use]
pub fn limit_candidates<T: Clone>(candidates: &[T]) -> Vec<T> {
    let limited = &candidates[..candidates.len().min(MAX_RESULTS)];
    if limited.len() < MIN_RESULTS && candidates.len() >= MIN_RESULTS {
        return candidates[..MIN_RESULTS].to_vec();
    }
    limited.to_vec()
}
