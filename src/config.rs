use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc};

use crate::error::{AppError, Result};
use crate::types::FixtureQuery;

pub const API_URL: &str = "https://v3.football.api-sports.io";
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// API-Football never returns more than 10 head-to-head meetings per query we make.
pub const MAX_H2H_LAST: u32 = 10;

/// Per-call HTTP deadline (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Number of skip reasons kept for the end-of-run summary.
pub const SKIP_SAMPLE_SIZE: usize = 10;

/// Canonical scoring defaults.
pub mod scoring_defaults {
    pub const MIN_HISTORY: usize = 5;
    pub const WEIGHT_DRAW: f64 = 0.55;
    pub const WEIGHT_GOALS: f64 = 0.25;
    pub const WEIGHT_DIFF: f64 = 0.20;
    pub const PENALTY_DRAW_RATE: f64 = 0.10;
    pub const PENALTY_GOALS_AVG: f64 = 3.2;
    pub const PENALTY_GOAL_DIFF: f64 = 2.2;
    /// Labels the pick as suitable; never blocks a notification.
    pub const QUALITY_THRESHOLD: f64 = 0.45;
}

/// Statistics substituted when head-to-head history is too short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty {
    pub draw_rate: f64,
    pub avg_total_goals: f64,
    pub avg_goal_diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Minimum head-to-head records for data-backed statistics. Always >= 1.
    pub min_history: usize,
    pub weight_draw: f64,
    pub weight_goals: f64,
    pub weight_diff: f64,
    pub penalty: Penalty,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        use scoring_defaults::*;
        Self {
            min_history: MIN_HISTORY,
            weight_draw: WEIGHT_DRAW,
            weight_goals: WEIGHT_GOALS,
            weight_diff: WEIGHT_DIFF,
            penalty: Penalty {
                draw_rate: PENALTY_DRAW_RATE,
                avg_total_goals: PENALTY_GOALS_AVG,
                avg_goal_diff: PENALTY_GOAL_DIFF,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// API-Football key (API_KEY). Never logged.
    pub api_key: String,
    pub telegram_api_url: String,
    /// Telegram bot token (BOT_TOKEN). Never logged.
    pub bot_token: String,
    /// Destination chat (CHAT_ID)
    pub chat_id: String,
    pub log_level: String,
    pub query: FixtureQuery,
    /// Head-to-head records requested per fixture (H2H_LAST, 1..=10)
    pub h2h_last: u32,
    pub scoring: ScoringConfig,
    pub quality_threshold: f64,
    /// Kickoff times in messages are shown at this offset (DISPLAY_UTC_OFFSET_HOURS).
    pub display_offset: FixedOffset,
    pub display_tz_label: String,
    pub http_timeout_secs: u64,
    /// Concurrent head-to-head requests (HISTORY_CONCURRENCY, >= 1)
    pub history_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), Utc::now().date_naive())
    }

    /// Builds the config from any key lookup. `today` anchors date-window defaults.
    pub fn from_lookup<F>(lookup: F, today: NaiveDate) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };

        let api_key = required("API_KEY")?;
        let bot_token = required("BOT_TOKEN")?;
        let chat_id = required("CHAT_ID")?;

        let days: i64 = parse_or(&var, "FIXTURE_DAYS", 7)?;
        if days < 0 {
            return Err(AppError::Config("FIXTURE_DAYS must be >= 0".to_string()));
        }
        let from = today;
        let to = Duration::try_days(days)
            .and_then(|span| today.checked_add_signed(span))
            .ok_or_else(|| AppError::Config(format!("FIXTURE_DAYS {days} is out of range")))?;

        let query = match var("FIXTURE_QUERY").as_deref().unwrap_or("range") {
            "range" => FixtureQuery::DateRange { from, to },
            "date" => {
                let date = match var("FIXTURE_DATE") {
                    Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                        AppError::Config("FIXTURE_DATE must be YYYY-MM-DD".to_string())
                    })?,
                    None => today,
                };
                FixtureQuery::Date(date)
            }
            "next" => {
                let n: u32 = parse_or(&var, "FIXTURE_NEXT", 50)?;
                if n == 0 {
                    return Err(AppError::Config("FIXTURE_NEXT must be >= 1".to_string()));
                }
                FixtureQuery::Next(n)
            }
            "leagues" => {
                let ids = var("LEAGUE_IDS")
                    .unwrap_or_default()
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<u32>().map_err(|_| {
                            AppError::Config(format!("LEAGUE_IDS entry '{s}' is not a league id"))
                        })
                    })
                    .collect::<Result<Vec<u32>>>()?;
                if ids.is_empty() {
                    return Err(AppError::Config(
                        "LEAGUE_IDS must be set when FIXTURE_QUERY=leagues".to_string(),
                    ));
                }
                let season: i32 = parse_or(&var, "SEASON", today.year())?;
                FixtureQuery::Leagues { ids, season, from, to }
            }
            other => {
                return Err(AppError::Config(format!(
                    "FIXTURE_QUERY must be one of range, date, next, leagues (got '{other}')"
                )))
            }
        };

        let h2h_last: u32 = parse_or(&var, "H2H_LAST", MAX_H2H_LAST)?;
        if !(1..=MAX_H2H_LAST).contains(&h2h_last) {
            return Err(AppError::Config(format!("H2H_LAST must be between 1 and {MAX_H2H_LAST}")));
        }

        use scoring_defaults::*;
        let scoring = ScoringConfig {
            min_history: parse_or(&var, "MIN_HISTORY", MIN_HISTORY)?,
            weight_draw: parse_or(&var, "WEIGHT_DRAW", WEIGHT_DRAW)?,
            weight_goals: parse_or(&var, "WEIGHT_GOALS", WEIGHT_GOALS)?,
            weight_diff: parse_or(&var, "WEIGHT_DIFF", WEIGHT_DIFF)?,
            penalty: Penalty {
                draw_rate: parse_or(&var, "PENALTY_DRAW_RATE", PENALTY_DRAW_RATE)?,
                avg_total_goals: parse_or(&var, "PENALTY_GOALS_AVG", PENALTY_GOALS_AVG)?,
                avg_goal_diff: parse_or(&var, "PENALTY_GOAL_DIFF", PENALTY_GOAL_DIFF)?,
            },
        };
        validate_scoring(&scoring)?;
        // History is capped at H2H_LAST records, so a larger minimum could never be met.
        if scoring.min_history > h2h_last as usize {
            return Err(AppError::Config(format!(
                "MIN_HISTORY ({}) must not exceed H2H_LAST ({h2h_last})",
                scoring.min_history
            )));
        }

        let quality_threshold: f64 = parse_or(&var, "QUALITY_THRESHOLD", QUALITY_THRESHOLD)?;
        if !quality_threshold.is_finite() {
            return Err(AppError::Config("QUALITY_THRESHOLD must be a finite number".to_string()));
        }

        let offset_hours: i32 = parse_or(&var, "DISPLAY_UTC_OFFSET_HOURS", -5)?;
        let display_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::Config("DISPLAY_UTC_OFFSET_HOURS must be between -23 and 23".to_string())
            })?;

        let http_timeout_secs: u64 = parse_or(&var, "HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS)?;
        if http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP_TIMEOUT_SECS must be >= 1".to_string()));
        }
        let history_concurrency: usize = parse_or(&var, "HISTORY_CONCURRENCY", 4)?;
        if history_concurrency == 0 {
            return Err(AppError::Config("HISTORY_CONCURRENCY must be >= 1".to_string()));
        }

        Ok(Self {
            api_url: var("API_URL").unwrap_or_else(|| API_URL.to_string()),
            api_key,
            telegram_api_url: var("TELEGRAM_API_URL")
                .unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
            bot_token,
            chat_id,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            query,
            h2h_last,
            scoring,
            quality_threshold,
            display_offset,
            display_tz_label: var("DISPLAY_TZ_LABEL").unwrap_or_else(|| "Ecuador".to_string()),
            http_timeout_secs,
            history_concurrency,
        })
    }
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value '{raw}'"))),
        None => Ok(default),
    }
}

fn validate_scoring(s: &ScoringConfig) -> Result<()> {
    if s.min_history == 0 {
        return Err(AppError::Config("MIN_HISTORY must be >= 1".to_string()));
    }
    for (key, w) in [
        ("WEIGHT_DRAW", s.weight_draw),
        ("WEIGHT_GOALS", s.weight_goals),
        ("WEIGHT_DIFF", s.weight_diff),
    ] {
        if !w.is_finite() || w < 0.0 {
            return Err(AppError::Config(format!("{key} must be a finite number >= 0")));
        }
    }
    if !(0.0..=1.0).contains(&s.penalty.draw_rate) {
        return Err(AppError::Config("PENALTY_DRAW_RATE must be within [0, 1]".to_string()));
    }
    for (key, v) in [
        ("PENALTY_GOALS_AVG", s.penalty.avg_total_goals),
        ("PENALTY_GOAL_DIFF", s.penalty.avg_goal_diff),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(AppError::Config(format!("{key} must be a finite number >= 0")));
        }
    }
    Ok(())
}
