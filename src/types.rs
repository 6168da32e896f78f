use chrono::{DateTime, NaiveDate, Utc};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// A scheduled, not-yet-played match as reported by the fixture source.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub fixture_id: u64,
    pub home_team_id: u64,
    pub home_team_name: String,
    pub away_team_id: u64,
    pub away_team_name: String,
    pub league_name: String,
    pub league_country: String,
    pub kickoff_utc: DateTime<Utc>,
}

/// How upcoming fixtures are requested from the fixture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureQuery {
    /// Not-started fixtures between two dates, inclusive.
    DateRange { from: NaiveDate, to: NaiveDate },
    /// Not-started fixtures on a single date.
    Date(NaiveDate),
    /// The next N fixtures regardless of date.
    Next(u32),
    /// Not-started fixtures of specific leagues in one season, within a date window.
    Leagues {
        ids: Vec<u32>,
        season: i32,
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl std::fmt::Display for FixtureQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureQuery::DateRange { from, to } => write!(f, "range {from}..{to}"),
            FixtureQuery::Date(d) => write!(f, "date {d}"),
            FixtureQuery::Next(n) => write!(f, "next {n}"),
            FixtureQuery::Leagues { ids, season, from, to } => {
                write!(f, "leagues {ids:?} season {season} {from}..{to}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Head-to-head history
// ---------------------------------------------------------------------------

/// Final score of one past meeting between the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchScore {
    pub fn new(home_goals: u32, away_goals: u32) -> Self {
        Self { home_goals, away_goals }
    }

    pub fn is_draw(&self) -> bool {
        self.home_goals == self.away_goals
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals + self.away_goals
    }

    pub fn goal_diff(&self) -> u32 {
        self.home_goals.abs_diff(self.away_goals)
    }
}

/// Most recent meetings first. Empty means no usable history.
pub type HeadToHead = Vec<MatchScore>;

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataQuality {
    /// Statistics computed from enough head-to-head history.
    Ok,
    /// Too little history; statistics are the configured penalty values.
    Low,
}

impl DataQuality {
    /// Label shown in the chat message.
    pub fn label(&self) -> &'static str {
        match self {
            DataQuality::Ok => "OK",
            DataQuality::Low => "BAJA",
        }
    }
}

impl std::fmt::Display for DataQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQuality::Ok => write!(f, "ok"),
            DataQuality::Low => write!(f, "low"),
        }
    }
}

/// A fixture together with its draw-suitability metrics. Built once by the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedCandidate {
    pub fixture: Fixture,
    pub score: f64,
    /// Share of head-to-head meetings that ended level, in [0, 1].
    pub draw_rate: f64,
    pub avg_total_goals: f64,
    /// Mean absolute goal difference.
    pub avg_goal_diff: f64,
    pub data_quality: DataQuality,
    /// Number of head-to-head records the metrics were derived from.
    pub history_len: usize,
}

/// Evaluation attached to the selected candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Score reaches the quality threshold and the data is backed by enough history.
    Suitable,
    /// The best candidate available, with moderate confidence.
    BestAvailable,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Suitable => "APTO para empate",
            Verdict::BestAvailable => "MEJOR OPCIÓN DISPONIBLE (confianza moderada)",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Suitable => write!(f, "suitable"),
            Verdict::BestAvailable => write!(f, "best_available"),
        }
    }
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// The single user-visible result of one run. Each variant maps to one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Best {
        candidate: AnalyzedCandidate,
        verdict: Verdict,
    },
    /// The fixture source answered with zero fixtures.
    NoFixtures,
    /// Fixtures were returned but none survived analysis.
    NoAnalyzable,
    /// The fixture source could not be reached or returned an error.
    FixturesUnavailable(String),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Best { verdict, .. } => write!(f, "best ({verdict})"),
            Outcome::NoFixtures => write!(f, "no_fixtures"),
            Outcome::NoAnalyzable => write!(f, "no_analyzable"),
            Outcome::FixturesUnavailable(_) => write!(f, "fixtures_unavailable"),
        }
    }
}
