// Shared models for the play tracker
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod feed;

pub use feed::{DiffBatch, DiffChange, LiveFeed, Play, ScheduledGame};

/// Path suffix of the change records that carry a play's human-readable text.
pub const DESCRIPTION_SUFFIX: &str = "/result/description";

/// Path prefix of play records inside the live feed.
pub const ALL_PLAYS_PREFIX: &str = "/liveData/plays/allPlays/";

// ============================================================================
// Cursor
// ============================================================================

/// Feed timecode (`metaData.timeStamp`, e.g. `20240812_231542`).
///
/// The format is fixed-width, so string ordering is time ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Sides, scores, status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    /// The batting side for a half inning ("top" means the away team bats).
    pub fn batting_in(half_inning: &str) -> Option<Side> {
        match half_inning.trim().to_lowercase().as_str() {
            "top" => Some(Side::Away),
            "bottom" => Some(Side::Home),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub away: u32,
    pub home: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Live,
    Final,
}

impl GameStatus {
    /// Map the feed's `abstractGameState` onto the tracker's status.
    pub fn from_abstract_state(state: Option<&str>) -> Self {
        match state.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("live") => GameStatus::Live,
            Some("final") => GameStatus::Final,
            _ => GameStatus::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live => "live",
            GameStatus::Final => "final",
        }
    }
}

// ============================================================================
// Fragment
// ============================================================================

/// A newly observed play description plus whatever the feed said about the
/// play alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub path: String,
    pub text: String,
    pub scoring: bool,
    pub scoring_side: Option<Side>,
    /// Score right after the play, when the feed carried it
    pub score: Option<Score>,
}

impl Fragment {
    /// Plain, non-scoring fragment.
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            scoring: false,
            scoring_side: None,
            score: None,
        }
    }

    pub fn scored_by(mut self, side: Option<Side>) -> Self {
        self.scoring = true;
        self.scoring_side = side;
        self
    }

    pub fn with_score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }
}

// ============================================================================
// Aggregate state
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamInfo {
    pub id: u64,
    pub name: String,
    pub abbreviation: Option<String>,
    pub runs: u32,
}

impl TeamInfo {
    /// Short label for score lines; falls back to the full name.
    pub fn label(&self) -> &str {
        match self.abbreviation.as_deref() {
            Some(abbr) if !abbr.is_empty() => abbr,
            _ => &self.name,
        }
    }
}

/// Current game summary: score, inning, outs and status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateState {
    pub away: TeamInfo,
    pub home: TeamInfo,
    pub inning: Option<u32>,
    pub inning_ordinal: Option<String>,
    pub inning_state: Option<String>,
    pub outs: u32,
    pub status: GameStatus,
}

impl AggregateState {
    pub fn from_live_feed(feed: &LiveFeed) -> Self {
        let teams = &feed.game_data.teams;
        let linescore = &feed.live_data.linescore;

        Self {
            away: TeamInfo {
                id: teams.away.id,
                name: teams.away.name.clone(),
                abbreviation: teams.away.abbreviation.clone(),
                runs: linescore.teams.away.runs.unwrap_or(0),
            },
            home: TeamInfo {
                id: teams.home.id,
                name: teams.home.name.clone(),
                abbreviation: teams.home.abbreviation.clone(),
                runs: linescore.teams.home.runs.unwrap_or(0),
            },
            inning: linescore.current_inning,
            inning_ordinal: linescore.current_inning_ordinal.clone(),
            inning_state: linescore.inning_state.clone(),
            outs: linescore.outs.unwrap_or(0),
            status: GameStatus::from_abstract_state(
                feed.game_data.status.abstract_game_state.as_deref(),
            ),
        }
    }

    pub fn score(&self) -> Score {
        Score {
            away: self.away.runs,
            home: self.home.runs,
        }
    }

    pub fn team(&self, side: Side) -> &TeamInfo {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }

    /// Which side, if any, the given team id plays on.
    pub fn side_of(&self, team_id: u64) -> Option<Side> {
        if self.away.id == team_id {
            Some(Side::Away)
        } else if self.home.id == team_id {
            Some(Side::Home)
        } else {
            None
        }
    }

    /// True while an inning is underway (the linescore reports a current inning).
    pub fn inning_in_progress(&self) -> bool {
        self.inning.map(|i| i > 0).unwrap_or(false)
    }

    /// Side currently at bat, derived from the inning state.
    pub fn batting_side(&self) -> Option<Side> {
        self.inning_state.as_deref().and_then(Side::batting_in)
    }
}
