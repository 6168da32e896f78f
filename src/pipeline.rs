use futures_util::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::config::{Config, SKIP_SAMPLE_SIZE};
use crate::error::Result;
use crate::fetcher::{parse_fixture, FixtureSource, HistorySource, RawFixture};
use crate::notifier::{message, Notifier};
use crate::scorer::{classify, score, select_best};
use crate::types::{AnalyzedCandidate, DataQuality, HeadToHead, Outcome};

/// Per-fixture analysis result. Failures are kept, not swallowed.
#[derive(Debug)]
pub enum Analysis {
    Scored {
        candidate: AnalyzedCandidate,
        /// The history fetch failed and the fixture was scored with no history.
        history_degraded: bool,
    },
    Skipped { reason: String },
}

#[derive(Debug, Default)]
pub struct RunStats {
    pub fixtures_total: usize,
    pub analyzed: usize,
    pub skipped: usize,
    pub history_failures: usize,
    pub low_quality: usize,
    /// First few skip reasons, for the run summary.
    pub skip_samples: Vec<String>,
}

/// One full run: fetch, analyze, select, notify. Sends exactly one message.
pub async fn run_once(
    cfg: &Config,
    fixtures: &dyn FixtureSource,
    history: &dyn HistorySource,
    notifier: &dyn Notifier,
) -> Result<Outcome> {
    let outcome = match fixtures.fetch_fixtures(&cfg.query).await {
        Err(e) => {
            error!("Fixture fetch failed ({}): {e}", cfg.query);
            Outcome::FixturesUnavailable(e.to_string())
        }
        Ok(raw) if raw.is_empty() => {
            info!("No fixtures returned for {}", cfg.query);
            Outcome::NoFixtures
        }
        Ok(raw) => {
            info!("Fetched {} fixtures for {}", raw.len(), cfg.query);
            let (candidates, stats) = analyze_all(cfg, history, raw).await;
            log_stats(&stats);
            decide(&candidates, cfg.quality_threshold)
        }
    };

    let text = message::render(&outcome, cfg.display_offset, &cfg.display_tz_label);
    notifier.send(&text).await?;
    info!("Notification sent: {outcome}");
    Ok(outcome)
}

/// Pick and classify the best candidate, or report that none survived analysis.
pub fn decide(candidates: &[AnalyzedCandidate], quality_threshold: f64) -> Outcome {
    match select_best(candidates) {
        Some(best) => {
            let verdict = classify(best, quality_threshold);
            info!(
                event = "BEST_PICK",
                fixture_id = best.fixture.fixture_id,
                score = best.score,
                quality = %best.data_quality,
                verdict = %verdict,
                "BEST | {} vs {} | score: {:.3} | draws: {:.1}% | goals: {:.2} | diff: {:.2}",
                best.fixture.home_team_name,
                best.fixture.away_team_name,
                best.score,
                best.draw_rate * 100.0,
                best.avg_total_goals,
                best.avg_goal_diff,
            );
            Outcome::Best {
                candidate: best.clone(),
                verdict,
            }
        }
        None => Outcome::NoAnalyzable,
    }
}

/// Analyze every fixture, keeping input order in the returned candidates.
pub async fn analyze_all(
    cfg: &Config,
    history: &dyn HistorySource,
    raw: Vec<RawFixture>,
) -> (Vec<AnalyzedCandidate>, RunStats) {
    let mut stats = RunStats {
        fixtures_total: raw.len(),
        ..RunStats::default()
    };

    // `buffered` runs up to N fetches at once but yields results in input order.
    let analyses: Vec<Analysis> = stream::iter(raw.iter())
        .map(|fx| analyze_fixture(cfg, history, fx))
        .buffered(cfg.history_concurrency)
        .collect()
        .await;

    let mut candidates = Vec::with_capacity(analyses.len());
    for analysis in analyses {
        match analysis {
            Analysis::Scored { candidate, history_degraded } => {
                if history_degraded {
                    stats.history_failures += 1;
                }
                if candidate.data_quality == DataQuality::Low {
                    stats.low_quality += 1;
                }
                candidates.push(candidate);
            }
            Analysis::Skipped { reason } => {
                stats.skipped += 1;
                if stats.skip_samples.len() < SKIP_SAMPLE_SIZE {
                    stats.skip_samples.push(reason);
                }
            }
        }
    }
    stats.analyzed = candidates.len();
    (candidates, stats)
}

pub async fn analyze_fixture(cfg: &Config, history: &dyn HistorySource, raw: &RawFixture) -> Analysis {
    let fixture = match parse_fixture(raw) {
        Ok(f) => f,
        Err(rejection) => {
            let id = raw
                .pointer("/fixture/id")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".to_string());
            return Analysis::Skipped {
                reason: format!("fixture {id}: {rejection}"),
            };
        }
    };

    let (h2h, history_degraded): (HeadToHead, bool) = match history
        .fetch_head_to_head(fixture.home_team_id, fixture.away_team_id, cfg.h2h_last)
        .await
    {
        Ok(h) => (h, false),
        Err(e) => {
            warn!(
                "H2H fetch failed for {} vs {} (fixture {}): {e}; scoring with no history",
                fixture.home_team_name, fixture.away_team_name, fixture.fixture_id
            );
            (Vec::new(), true)
        }
    };

    let candidate = score(&fixture, &h2h, &cfg.scoring);
    debug!(
        fixture_id = fixture.fixture_id,
        h2h = candidate.history_len,
        quality = %candidate.data_quality,
        "{} vs {} → score {:.3}",
        fixture.home_team_name,
        fixture.away_team_name,
        candidate.score,
    );
    Analysis::Scored {
        candidate,
        history_degraded,
    }
}

fn log_stats(stats: &RunStats) {
    info!(
        "[ANALYSIS] fixtures={} analyzed={} skipped={} h2h_failures={} low_quality={}",
        stats.fixtures_total, stats.analyzed, stats.skipped, stats.history_failures, stats.low_quality,
    );
    for reason in &stats.skip_samples {
        info!("[ANALYSIS]   skipped {reason}");
    }
}
