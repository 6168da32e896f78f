use crate::types::{AnalyzedCandidate, DataQuality, Verdict};

/// Classify the selected candidate. Suitable requires both the score threshold
/// and data-backed statistics.
pub fn classify(best: &AnalyzedCandidate, quality_threshold: f64) -> Verdict {
    if best.score >= quality_threshold && best.data_quality == DataQuality::Ok {
        Verdict::Suitable
    } else {
        Verdict::BestAvailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::draw_scorer::tests::fixture;

    fn candidate(score: f64, data_quality: DataQuality) -> AnalyzedCandidate {
        AnalyzedCandidate {
            fixture: fixture(1, "Home", "Away"),
            score,
            draw_rate: 0.5,
            avg_total_goals: 2.0,
            avg_goal_diff: 0.5,
            data_quality,
            history_len: 10,
        }
    }

    #[test]
    fn high_score_with_good_data_is_suitable() {
        assert_eq!(classify(&candidate(0.60, DataQuality::Ok), 0.45), Verdict::Suitable);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(classify(&candidate(0.45, DataQuality::Ok), 0.45), Verdict::Suitable);
    }

    #[test]
    fn high_score_with_low_data_is_best_available() {
        assert_eq!(classify(&candidate(0.90, DataQuality::Low), 0.45), Verdict::BestAvailable);
    }

    #[test]
    fn low_score_with_good_data_is_best_available() {
        assert_eq!(classify(&candidate(0.30, DataQuality::Ok), 0.45), Verdict::BestAvailable);
    }
}
