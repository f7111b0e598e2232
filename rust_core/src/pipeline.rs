//! One polling cycle: select → fetch → interpret → compose → dispatch.
//!
//! All fetching happens before any state is touched, so a failed fetch or a
//! malformed response leaves the snapshot exactly as it was. Posting is the
//! only step with outside effects and it runs last, one message at a time.

use crate::composer::{tag_line, MessageComposer};
use crate::diff::{interpret, interpret_document, CursorUpdate, DiffOutcome, DiffResponse};
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::{Result, TrackerError};
use crate::models::{AggregateState, GameStatus, LiveFeed, Side};
use crate::providers::{GameFeed, MessagePoster};
use crate::snapshot::SnapshotStore;
use log::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Team whose runs get the emphatic template
    pub team_id: u64,
    pub hashtags_enabled: bool,
}

/// What a cycle did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub game_pk: Option<u64>,
    /// Status reported by the aggregate snapshot this cycle
    pub status: Option<GameStatus>,
    pub bootstrapped: bool,
    /// Diff endpoint answered with a full document
    pub restated: bool,
    pub fragments: usize,
    pub sent: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub final_sent: bool,
}

impl CycleReport {
    fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent => self.sent += 1,
            DispatchOutcome::Duplicate => self.duplicates += 1,
            DispatchOutcome::Failed => self.failed += 1,
        }
    }
}

pub struct PlayTracker<F, P> {
    feed: F,
    poster: P,
    config: TrackerConfig,
}

impl<F: GameFeed, P: MessagePoster> PlayTracker<F, P> {
    pub fn new(feed: F, poster: P, config: TrackerConfig) -> Self {
        Self {
            feed,
            poster,
            config,
        }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn poster(&self) -> &P {
        &self.poster
    }

    /// Run one cycle against `store`.
    ///
    /// The exclusive borrow keeps cycles on one store strictly sequential.
    pub async fn run_cycle(&self, store: &mut SnapshotStore) -> Result<CycleReport> {
        let Some(game_pk) = self.ensure_tracked(store).await? else {
            debug!("No game to follow today");
            return Ok(CycleReport::default());
        };

        let mut report = CycleReport {
            game_pk: Some(game_pk),
            ..Default::default()
        };

        // Announced final: stay quiet until the feed un-finalizes or the
        // schedule picks another game.
        if store.final_sent() {
            let state = self.fetch_state(game_pk).await?;
            if state.status == GameStatus::Final {
                debug!("Game {} already announced final, skipping", game_pk);
                report.status = Some(state.status);
                return Ok(report);
            }
        }

        // Fetch everything first; nothing below may fail after state changes.
        let outcome = match store.cursor().cloned() {
            None => {
                report.bootstrapped = true;
                let body = self
                    .feed
                    .fetch_event_document(game_pk)
                    .await
                    .map_err(|e| TrackerError::fetch("live feed", e))?;
                let document: LiveFeed = serde_json::from_str(&body)?;
                interpret_document(&document)
            }
            Some(cursor) => {
                let body = self
                    .feed
                    .fetch_event_diff(game_pk, &cursor)
                    .await
                    .map_err(|e| TrackerError::fetch("diff patch", e))?;
                let outcome = interpret(&DiffResponse::parse(&body)?);
                report.restated = outcome.restated;
                if outcome.restated {
                    info!("Diff for game {} came back as a full document, resyncing", game_pk);
                }
                outcome
            }
        };

        let state = self.fetch_state(game_pk).await?;
        report.status = Some(state.status);

        let tags = self.resolve_tags(store, &state).await;

        self.commit_cursor(store, &outcome);
        report.fragments = outcome.fragments.len();

        let composer = MessageComposer::new(self.config.team_id).with_tags(tags);
        let messages: Vec<String> = outcome
            .fragments
            .iter()
            .map(|fragment| composer.compose_play(fragment, &state))
            .collect();

        let dispatcher = Dispatcher::new(&self.poster);
        for message in &messages {
            report.record(dispatcher.dispatch(store, message).await);
        }

        if let Some(summary) = composer.half_inning_summary(&state) {
            report.record(dispatcher.dispatch(store, &summary).await);
        }

        let is_final = state.status == GameStatus::Final;
        store.observe_final(is_final);

        // Only announce a final for a game we actually posted about.
        if is_final && !store.final_sent() && store.dispatched_count() > 0 {
            let final_outcome = dispatcher.dispatch(store, &composer.final_score(&state)).await;
            report.record(final_outcome);
            if final_outcome.sent() {
                store.mark_final_sent();
                report.final_sent = true;
                info!("Final score posted for game {}", game_pk);
            }
        }

        Ok(report)
    }

    async fn fetch_state(&self, game_pk: u64) -> Result<AggregateState> {
        self.feed
            .fetch_aggregate_snapshot(game_pk)
            .await
            .map_err(|e| TrackerError::fetch("aggregate snapshot", e))
    }

    /// Ask the schedule which game to follow, switching when the answer changes.
    async fn ensure_tracked(&self, store: &mut SnapshotStore) -> Result<Option<u64>> {
        let selected = self
            .feed
            .select_event_for_today()
            .await
            .map_err(|e| TrackerError::fetch("schedule", e))?;

        match selected {
            Some(game_pk) => {
                if store.track(game_pk) {
                    info!("Tracking game {} via {}", game_pk, self.feed.provider_name());
                }
                Ok(Some(game_pk))
            }
            None => {
                if let Some(previous) = store.tracked_event() {
                    info!("Game {} no longer scheduled for today, releasing it", previous);
                    store.untrack();
                }
                Ok(None)
            }
        }
    }

    fn commit_cursor(&self, store: &mut SnapshotStore, outcome: &DiffOutcome) {
        match &outcome.cursor {
            CursorUpdate::Advance(cursor) => {
                if store.advance(cursor.clone()) {
                    debug!("Cursor advanced to {}", cursor);
                }
            }
            CursorUpdate::Resync(cursor) => store.resync(cursor.clone()),
            CursorUpdate::Unchanged => {}
        }
    }

    /// Hashtag suffix for this game, or `None` when disabled or unresolvable.
    ///
    /// Decided on the first cycle of a game and kept, even partial or empty.
    async fn resolve_tags(&self, store: &mut SnapshotStore, state: &AggregateState) -> Option<String> {
        if !self.config.hashtags_enabled {
            return None;
        }
        if store.tags_resolved() {
            return store.tags().map(str::to_string);
        }

        let away = self.lookup_tag(state, Side::Away).await;
        let home = self.lookup_tag(state, Side::Home).await;
        let tags = tag_line(away.as_deref(), home.as_deref());
        store.set_tags(tags.clone());
        tags
    }

    async fn lookup_tag(&self, state: &AggregateState, side: Side) -> Option<String> {
        let team = state.team(side);
        if team.id != 0 {
            match self.feed.fetch_tag(team.id).await {
                Ok(code) if !code.trim().is_empty() => return Some(code),
                Ok(_) => {}
                Err(e) => warn!("Tag lookup failed for team {}: {:#}", team.id, e),
            }
        }
        team.abbreviation.clone().filter(|code| !code.is_empty())
    }
}
