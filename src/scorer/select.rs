use crate::types::AnalyzedCandidate;

/// Highest-scoring candidate; on exact ties the earliest one wins.
/// Returns `None` for an empty slice.
pub fn select_best(candidates: &[AnalyzedCandidate]) -> Option<&AnalyzedCandidate> {
    candidates.iter().fold(None, |best, c| match best {
        Some(b) if c.score <= b.score => Some(b),
        _ => Some(c),
    })
}
