use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{Fixture, FixtureQuery, HeadToHead, MatchScore};

/// One fixture record exactly as returned by the API, parsed later per record
/// so a single bad entry cannot fail the whole batch.
pub type RawFixture = Value;

#[async_trait]
pub trait FixtureSource: Send + Sync {
    async fn fetch_fixtures(&self, query: &FixtureQuery) -> Result<Vec<RawFixture>>;
}

#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Up to `last` finished meetings between the two teams, most recent first.
    async fn fetch_head_to_head(&self, home_id: u64, away_id: u64, last: u32) -> Result<HeadToHead>;
}

/// API-Football v3 REST client (`x-apisports-key` auth).
pub struct ApiFootballClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiFootballClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// GET `{base}/{endpoint}` and unwrap the `response` array of the envelope.
    async fn api_get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<Value>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let body: Value = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        unwrap_envelope(endpoint, body)
    }
}

#[async_trait]
impl FixtureSource for ApiFootballClient {
    async fn fetch_fixtures(&self, query: &FixtureQuery) -> Result<Vec<RawFixture>> {
        let mut fixtures = Vec::new();
        for params in fixture_params(query) {
            let page = self.api_get("fixtures", &params).await?;
            debug!("fixtures {:?} → {} records", params, page.len());
            fixtures.extend(page);
        }

        let before = fixtures.len();
        let fixtures = dedup_fixtures(fixtures);
        if fixtures.len() < before {
            info!("Dropped {} duplicate fixtures", before - fixtures.len());
        }
        Ok(fixtures)
    }
}

#[async_trait]
impl HistorySource for ApiFootballClient {
    async fn fetch_head_to_head(&self, home_id: u64, away_id: u64, last: u32) -> Result<HeadToHead> {
        let params = [
            ("h2h", format!("{home_id}-{away_id}")),
            ("last", last.to_string()),
        ];
        let records = self.api_get("fixtures/headtohead", &params).await?;
        Ok(parse_head_to_head(&records, last))
    }
}

/// Query parameter sets for a fixture query. League queries issue one request per league.
pub fn fixture_params(query: &FixtureQuery) -> Vec<Vec<(&'static str, String)>> {
    match query {
        FixtureQuery::DateRange { from, to } => vec![vec![
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("status", "NS".to_string()),
        ]],
        FixtureQuery::Date(date) => vec![vec![
            ("date", date.to_string()),
            ("status", "NS".to_string()),
        ]],
        FixtureQuery::Next(n) => vec![vec![("next", n.to_string())]],
        FixtureQuery::Leagues { ids, season, from, to } => ids
            .iter()
            .map(|id| {
                vec![
                    ("league", id.to_string()),
                    ("season", season.to_string()),
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                    ("status", "NS".to_string()),
                ]
            })
            .collect(),
    }
}

/// API-Football answers quota and auth failures with HTTP 200 and a non-empty `errors`.
pub fn check_api_errors(endpoint: &str, body: &Value) -> Result<()> {
    let has_errors = match body.get("errors") {
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    if has_errors {
        let detail = body.get("errors").map(|e| e.to_string()).unwrap_or_default();
        return Err(AppError::Api(format!("/{endpoint} returned errors: {detail}")));
    }
    Ok(())
}

/// Check `errors`, then take the `response` array.
pub fn unwrap_envelope(endpoint: &str, body: Value) -> Result<Vec<Value>> {
    check_api_errors(endpoint, &body)?;
    match body.get("response") {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(AppError::Api(format!("/{endpoint} response was not an array"))),
    }
}

/// Keep the first occurrence of each fixture id. Records without an id pass through.
pub fn dedup_fixtures(fixtures: Vec<RawFixture>) -> Vec<RawFixture> {
    let mut seen = std::collections::HashSet::new();
    fixtures
        .into_iter()
        .filter(|fx| match fx.pointer("/fixture/id").and_then(Value::as_u64) {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingTeams,
    MissingTeamId,
    MissingTeamName,
    MissingLeague,
    BadKickoff(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MissingTeams => write!(f, "missing teams"),
            Rejection::MissingTeamId => write!(f, "missing team id"),
            Rejection::MissingTeamName => write!(f, "missing team name"),
            Rejection::MissingLeague => write!(f, "missing league"),
            Rejection::BadKickoff(raw) => write!(f, "bad kickoff date '{raw}'"),
        }
    }
}

/// Parse one API-Football fixture record.
pub fn parse_fixture(v: &Value) -> std::result::Result<Fixture, Rejection> {
    let teams = v.get("teams").ok_or(Rejection::MissingTeams)?;
    let home = teams.get("home").ok_or(Rejection::MissingTeams)?;
    let away = teams.get("away").ok_or(Rejection::MissingTeams)?;

    let team_id = |t: &Value| t.get("id").and_then(Value::as_u64).ok_or(Rejection::MissingTeamId);
    let team_name = |t: &Value| {
        t.get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(Rejection::MissingTeamName)
    };

    let league = v.get("league").ok_or(Rejection::MissingLeague)?;
    let league_name = league
        .get("name")
        .and_then(Value::as_str)
        .ok_or(Rejection::MissingLeague)?
        .to_string();
    let league_country = league
        .get("country")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let raw_date = v
        .pointer("/fixture/date")
        .and_then(Value::as_str)
        .ok_or_else(|| Rejection::BadKickoff(String::new()))?;
    let kickoff_utc = DateTime::parse_from_rfc3339(raw_date)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Rejection::BadKickoff(raw_date.to_string()))?;

    Ok(Fixture {
        fixture_id: v.pointer("/fixture/id").and_then(Value::as_u64).unwrap_or(0),
        home_team_id: team_id(home)?,
        home_team_name: team_name(home)?,
        away_team_id: team_id(away)?,
        away_team_name: team_name(away)?,
        league_name,
        league_country,
        kickoff_utc,
    })
}

/// Finished meetings only: unplayed or abandoned ones carry `null` goals.
pub fn parse_head_to_head(records: &[Value], last: u32) -> HeadToHead {
    records
        .iter()
        .filter_map(|m| {
            let home = m.pointer("/goals/home").and_then(Value::as_u64)?;
            let away = m.pointer("/goals/away").and_then(Value::as_u64)?;
            Some(MatchScore::new(u32::try_from(home).ok()?, u32::try_from(away).ok()?))
        })
        .take(last as usize)
        .collect()
}
