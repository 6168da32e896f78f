use crate::config::ScoringConfig;
use crate::types::{AnalyzedCandidate, DataQuality, Fixture, MatchScore};

/// Score a fixture for draw suitability from its head-to-head history.
///
/// With at least `min_history` meetings the three statistics come from the data;
/// otherwise the configured penalty values stand in and the result is flagged `Low`.
/// The final score is not normalised.
pub fn score(fixture: &Fixture, history: &[MatchScore], cfg: &ScoringConfig) -> AnalyzedCandidate {
    let (draw_rate, avg_total_goals, avg_goal_diff, data_quality) =
        if !history.is_empty() && history.len() >= cfg.min_history {
            let n = history.len() as f64;
            let draws = history.iter().filter(|m| m.is_draw()).count() as f64;
            let goals: u32 = history.iter().map(MatchScore::total_goals).sum();
            let diffs: u32 = history.iter().map(MatchScore::goal_diff).sum();
            (draws / n, goals as f64 / n, diffs as f64 / n, DataQuality::Ok)
        } else {
            (
                cfg.penalty.draw_rate,
                cfg.penalty.avg_total_goals,
                cfg.penalty.avg_goal_diff,
                DataQuality::Low,
            )
        };

    AnalyzedCandidate {
        fixture: fixture.clone(),
        score: composite_score(draw_rate, avg_total_goals, avg_goal_diff, cfg),
        draw_rate,
        avg_total_goals,
        avg_goal_diff,
        data_quality,
        history_len: history.len(),
    }
}

/// Weighted sum; fewer goals and closer results raise the two reciprocal terms.
pub fn composite_score(
    draw_rate: f64,
    avg_total_goals: f64,
    avg_goal_diff: f64,
    cfg: &ScoringConfig,
) -> f64 {
    draw_rate * cfg.weight_draw
        + (1.0 / (1.0 + avg_total_goals)) * cfg.weight_goals
        + (1.0 / (1.0 + avg_goal_diff)) * cfg.weight_diff
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn fixture(id: u64, home: &str, away: &str) -> Fixture {
        Fixture {
            fixture_id: id,
            home_team_id: id * 10,
            home_team_name: home.to_string(),
            away_team_id: id * 10 + 1,
            away_team_name: away.to_string(),
            league_name: "Serie A".to_string(),
            league_country: "Ecuador".to_string(),
            kickoff_utc: Utc.with_ymd_and_hms(2026, 10, 18, 1, 0, 0).unwrap(),
        }
    }

    fn h2h(pairs: &[(u32, u32)]) -> Vec<MatchScore> {
        pairs.iter().map(|&(h, a)| MatchScore::new(h, a)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn five_meetings_three_draws() {
        let history = h2h(&[(2, 2), (1, 1), (0, 3), (2, 1), (0, 0)]);
        let c = score(&fixture(1, "LDU Quito", "Barcelona SC"), &history, &ScoringConfig::default());
        assert_eq!(c.data_quality, DataQuality::Ok);
        assert!(approx(c.draw_rate, 0.6));
        assert!(approx(c.avg_total_goals, 2.4));
        assert!(approx(c.avg_goal_diff, 0.8));
        assert_eq!(c.history_len, 5);
        let expected = 0.6 * 0.55 + 0.25 / 3.4 + 0.20 / 1.8;
        assert!(approx(c.score, expected));
    }

    #[test]
    fn empty_history_uses_penalty_exactly() {
        let cfg = ScoringConfig::default();
        let c = score(&fixture(2, "Aucas", "Emelec"), &[], &cfg);
        assert_eq!(c.data_quality, DataQuality::Low);
        assert_eq!(c.draw_rate, cfg.penalty.draw_rate);
        assert_eq!(c.avg_total_goals, cfg.penalty.avg_total_goals);
        assert_eq!(c.avg_goal_diff, cfg.penalty.avg_goal_diff);
        assert!(c.score.is_finite());
        assert_eq!(c.history_len, 0);
    }

    #[test]
    fn penalised_score_is_below_data_backed_score() {
        let cfg = ScoringConfig::default();
        let backed = score(
            &fixture(1, "A", "B"),
            &h2h(&[(2, 2), (1, 1), (0, 3), (2, 1), (0, 0)]),
            &cfg,
        );
        let penalised = score(&fixture(2, "C", "D"), &[], &cfg);
        assert!(penalised.score < backed.score);
    }

    #[test]
    fn short_history_is_penalised_even_if_all_draws() {
        let cfg = ScoringConfig::default();
        let c = score(&fixture(3, "A", "B"), &h2h(&[(1, 1), (0, 0), (2, 2), (1, 1)]), &cfg);
        assert_eq!(c.data_quality, DataQuality::Low);
        assert_eq!(c.draw_rate, cfg.penalty.draw_rate);
        assert_eq!(c.history_len, 4);
    }

    #[test]
    fn statistics_stay_in_range() {
        let cfg = ScoringConfig::default();
        let histories = [
            h2h(&[(0, 0); 10]),
            h2h(&[(7, 0), (0, 6), (5, 5), (3, 2), (1, 4)]),
            h2h(&[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0), (6, 0)]),
        ];
        for history in &histories {
            let c = score(&fixture(4, "A", "B"), history, &cfg);
            assert!((0.0..=1.0).contains(&c.draw_rate));
            assert!(c.avg_total_goals >= 0.0);
            assert!(c.avg_goal_diff >= 0.0);
            let again = score(&fixture(4, "A", "B"), history, &cfg);
            assert_eq!(c.score, again.score);
        }
    }

    #[test]
    fn all_goalless_draws_hit_the_weight_sum() {
        let c = score(&fixture(5, "A", "B"), &h2h(&[(0, 0); 5]), &ScoringConfig::default());
        assert!(approx(c.score, 0.55 + 0.25 + 0.20));
    }

    #[test]
    fn custom_min_history_is_respected() {
        let cfg = ScoringConfig { min_history: 2, ..ScoringConfig::default() };
        let c = score(&fixture(6, "A", "B"), &h2h(&[(1, 1), (2, 0)]), &cfg);
        assert_eq!(c.data_quality, DataQuality::Ok);
        assert!(approx(c.draw_rate, 0.5));
    }
}
