//! Wire types for the MLB Stats API responses the tracker consumes.
//!
//! Every field the feed is known to omit is defaulted so a sparse document
//! still deserializes. `LiveFeed::live_data` is the one required field: it is
//! what separates a restated live document from any other object.

use serde::Deserialize;

// ============================================================================
// Live feed (`/api/v1.1/game/{pk}/feed/live`)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeed {
    #[serde(default)]
    pub game_pk: Option<u64>,
    #[serde(default)]
    pub meta_data: MetaData,
    #[serde(default)]
    pub game_data: GameData,
    pub live_data: LiveData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    #[serde(default)]
    pub time_stamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default)]
    pub status: StatusRecord,
    #[serde(default)]
    pub teams: GameTeams,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    /// "Preview", "Live" or "Final"
    #[serde(default)]
    pub abstract_game_state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameTeams {
    #[serde(default)]
    pub away: TeamRecord,
    #[serde(default)]
    pub home: TeamRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveData {
    #[serde(default)]
    pub plays: Plays,
    #[serde(default)]
    pub linescore: Linescore,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plays {
    #[serde(default)]
    pub all_plays: Vec<Play>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Play {
    #[serde(default)]
    pub result: PlayResult,
    #[serde(default)]
    pub about: PlayAbout,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default)]
    pub home_score: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayAbout {
    /// "top" or "bottom"
    #[serde(default)]
    pub half_inning: Option<String>,
    #[serde(default)]
    pub is_scoring_play: Option<bool>,
}

// ============================================================================
// Linescore (`/api/v1/game/{pk}/linescore`, also embedded in the live feed)
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linescore {
    #[serde(default)]
    pub current_inning: Option<u32>,
    #[serde(default)]
    pub current_inning_ordinal: Option<String>,
    /// "Top", "Middle", "Bottom" or "End"
    #[serde(default)]
    pub inning_state: Option<String>,
    #[serde(default)]
    pub outs: Option<u32>,
    #[serde(default)]
    pub teams: LinescoreTeams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinescoreTeams {
    #[serde(default)]
    pub away: LinescoreTeam,
    #[serde(default)]
    pub home: LinescoreTeam,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinescoreTeam {
    #[serde(default)]
    pub runs: Option<u32>,
}

// ============================================================================
// Diff patch (`/feed/live/diffPatch`)
// ============================================================================

/// One entry of the diffPatch array. The feed sometimes repeats the same
/// batch across several entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffBatch {
    #[serde(default)]
    pub diff: Vec<DiffChange>,
}

/// JSON-patch style change record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffChange {
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

// ============================================================================
// Schedule and team lookup
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub game_pk: u64,
    #[serde(default)]
    pub status: StatusRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<TeamRecord>,
}
