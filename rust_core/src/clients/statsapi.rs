//! MLB Stats API client.
//!
//! Implements [`GameFeed`] over the public statsapi endpoints:
//! - `/api/v1/schedule/games/` for picking today's game
//! - `/api/v1.1/game/{pk}/feed/live` for the full document and game state
//! - `/api/v1.1/game/{pk}/feed/live/diffPatch` for incremental changes
//! - `/api/v1/teams/{id}` for team codes

use crate::circuit_breaker::{ApiCircuitBreaker, ApiCircuitBreakerConfig};
use crate::models::feed::{ScheduleResponse, TeamsResponse};
use crate::models::{AggregateState, Cursor, GameStatus, LiveFeed, ScheduledGame};
use crate::providers::GameFeed;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use log::debug;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub const STATSAPI_BASE_URL: &str = "https://statsapi.mlb.com";

#[derive(Debug, Clone)]
pub struct StatsApiConfig {
    pub base_url: String,
    /// 1 = MLB, 17 = winter leagues
    pub sport_id: u32,
    pub team_id: u64,
    /// Zone that decides what "today" means for the schedule lookup
    pub schedule_timezone: Tz,
}

impl Default for StatsApiConfig {
    fn default() -> Self {
        Self {
            base_url: STATSAPI_BASE_URL.to_string(),
            sport_id: 17,
            team_id: 671,
            schedule_timezone: chrono_tz::America::Los_Angeles,
        }
    }
}

#[derive(Clone)]
pub struct StatsApiClient {
    client: Client,
    config: StatsApiConfig,
    circuit_breaker: Arc<ApiCircuitBreaker>,
}

impl std::fmt::Debug for StatsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsApiClient")
            .field("base_url", &self.config.base_url)
            .field("team_id", &self.config.team_id)
            .field("circuit_breaker_state", &self.circuit_breaker.state())
            .finish()
    }
}

impl StatsApiClient {
    pub fn new(config: StatsApiConfig) -> Self {
        Self::with_breaker_config(config, ApiCircuitBreakerConfig::default())
    }

    pub fn with_breaker_config(config: StatsApiConfig, breaker: ApiCircuitBreakerConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
            circuit_breaker: Arc::new(ApiCircuitBreaker::new("statsapi", breaker)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Schedule URL for today's date in the configured zone.
    pub fn schedule_url(&self) -> String {
        let today = Utc::now()
            .with_timezone(&self.config.schedule_timezone)
            .format("%m/%d/%Y");
        self.url(&format!(
            "/api/v1/schedule/games/?sportId={}&date={}&teamId={}",
            self.config.sport_id, today, self.config.team_id
        ))
    }

    pub fn live_feed_url(&self, game_pk: u64) -> String {
        self.url(&format!("/api/v1.1/game/{game_pk}/feed/live"))
    }

    pub fn diff_url(&self, game_pk: u64, since: &Cursor) -> String {
        self.url(&format!(
            "/api/v1.1/game/{game_pk}/feed/live/diffPatch?language=en&startTimecode={}",
            since.as_str()
        ))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.circuit_breaker
            .call(|| async {
                debug!("GET {}", url);
                let resp = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("Stats API request failed: {url}"))?;

                let status = resp.status();
                let text = resp
                    .text()
                    .await
                    .with_context(|| format!("Stats API body read failed: {url}"))?;
                if !status.is_success() {
                    bail!("Stats API non-2xx: {status} url={url}");
                }
                Ok::<String, anyhow::Error>(text)
            })
            .await
    }
}

/// Today's pick: a game in progress, otherwise one already finished.
pub fn pick_game(schedule: &ScheduleResponse) -> Option<u64> {
    let games = || schedule.dates.iter().flat_map(|d| d.games.iter());

    games()
        .find(|g| status_of(g) == GameStatus::Live)
        .or_else(|| games().find(|g| status_of(g) == GameStatus::Final))
        .map(|g| g.game_pk)
}

fn status_of(game: &ScheduledGame) -> GameStatus {
    GameStatus::from_abstract_state(game.status.abstract_game_state.as_deref())
}

#[async_trait]
impl GameFeed for StatsApiClient {
    async fn select_event_for_today(&self) -> Result<Option<u64>> {
        let body = self.get_text(&self.schedule_url()).await?;
        let schedule: ScheduleResponse =
            serde_json::from_str(&body).context("Stats API schedule did not parse")?;
        Ok(pick_game(&schedule))
    }

    async fn fetch_event_document(&self, game_pk: u64) -> Result<String> {
        self.get_text(&self.live_feed_url(game_pk)).await
    }

    async fn fetch_event_diff(&self, game_pk: u64, since: &Cursor) -> Result<String> {
        self.get_text(&self.diff_url(game_pk, since)).await
    }

    async fn fetch_aggregate_snapshot(&self, game_pk: u64) -> Result<AggregateState> {
        let body = self.get_text(&self.live_feed_url(game_pk)).await?;
        let feed: LiveFeed =
            serde_json::from_str(&body).context("Stats API live feed did not parse")?;
        Ok(AggregateState::from_live_feed(&feed))
    }

    async fn fetch_tag(&self, team_id: u64) -> Result<String> {
        let body = self.get_text(&self.url(&format!("/api/v1/teams/{team_id}"))).await?;
        let teams: TeamsResponse =
            serde_json::from_str(&body).context("Stats API team lookup did not parse")?;
        teams
            .teams
            .into_iter()
            .find_map(|t| t.abbreviation.filter(|a| !a.is_empty()))
            .ok_or_else(|| anyhow!("team {team_id} has no abbreviation"))
    }

    fn provider_name(&self) -> &str {
        "statsapi"
    }
}
