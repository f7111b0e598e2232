//! In-memory tracking state for the game currently being followed.
//!
//! Holds the feed cursor, the set of message bodies already posted, the
//! final-score flag and the cached hashtag line. Everything here belongs to
//! exactly one tracked game; switching games goes through
//! [`SnapshotStore::reset_for_new_event`].

use crate::models::Cursor;
use log::{debug, info};
use std::collections::HashSet;

/// Where the tracked game sits in its notification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No game selected
    None,
    /// Game selected, nothing fetched or posted yet
    Bootstrapped,
    /// Cursor set, posts flowing
    Live,
    /// Final status seen, final message not yet sent
    FinalPending,
    /// Final message sent; posted set cleared
    FinalSent,
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    tracked_event: Option<u64>,
    cursor: Option<Cursor>,
    dispatched: HashSet<String>,
    final_sent: bool,
    final_seen: bool,
    tags: Option<String>,
    tags_resolved: bool,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked_event(&self) -> Option<u64> {
        self.tracked_event
    }

    /// Follow `game_pk`, resetting all state if it differs from the current game.
    ///
    /// Returns true when the tracked game changed.
    pub fn track(&mut self, game_pk: u64) -> bool {
        if self.tracked_event == Some(game_pk) {
            return false;
        }
        if let Some(previous) = self.tracked_event {
            info!("Switching tracked game {} -> {}", previous, game_pk);
        }
        self.reset_for_new_event();
        self.tracked_event = Some(game_pk);
        true
    }

    /// Forget the tracked game entirely.
    pub fn untrack(&mut self) {
        self.reset_for_new_event();
        self.tracked_event = None;
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Move the cursor forward. Ignored unless `cursor` is strictly later.
    pub fn advance(&mut self, cursor: Cursor) -> bool {
        match &self.cursor {
            Some(current) if cursor <= *current => {
                debug!("Cursor {} not after {}, keeping current", cursor, current);
                false
            }
            _ => {
                self.cursor = Some(cursor);
                true
            }
        }
    }

    /// Set the cursor unconditionally. Only for full-document resyncs.
    pub fn resync(&mut self, cursor: Cursor) {
        if let Some(current) = &self.cursor {
            if cursor < *current {
                info!("Full resync moves cursor back {} -> {}", current, cursor);
            }
        }
        self.cursor = Some(cursor);
    }

    pub fn has_dispatched(&self, text: &str) -> bool {
        self.dispatched.contains(text)
    }

    /// Record a confirmed send.
    pub fn mark_dispatched(&mut self, text: &str) {
        self.dispatched.insert(text.to_string());
    }

    pub fn dispatched_count(&self) -> usize {
        self.dispatched.len()
    }

    pub fn final_sent(&self) -> bool {
        self.final_sent
    }

    /// Record that the final-score message went out. Clears the posted set.
    pub fn mark_final_sent(&mut self) {
        self.final_sent = true;
        self.final_seen = true;
        self.dispatched.clear();
    }

    /// Note the status reported by the latest cycle.
    ///
    /// A non-final status clears the final flag so a corrected feed can
    /// finalize again later.
    pub fn observe_final(&mut self, is_final: bool) {
        if !is_final && (self.final_sent || self.final_seen) {
            info!("Game no longer reported final, clearing final flag");
            self.final_sent = false;
        }
        self.final_seen = is_final;
    }

    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    /// True once the hashtag line was decided for this game, even if empty.
    pub fn tags_resolved(&self) -> bool {
        self.tags_resolved
    }

    /// Fix the hashtag line for the rest of this game. `None` means no suffix.
    pub fn set_tags(&mut self, tags: Option<String>) {
        self.tags = tags;
        self.tags_resolved = true;
    }

    /// Clear everything tied to the current game except the game id itself.
    pub fn reset_for_new_event(&mut self) {
        self.cursor = None;
        self.dispatched.clear();
        self.final_sent = false;
        self.final_seen = false;
        self.tags = None;
        self.tags_resolved = false;
    }

    pub fn phase(&self) -> TrackerPhase {
        if self.tracked_event.is_none() {
            return TrackerPhase::None;
        }
        if self.final_sent {
            return TrackerPhase::FinalSent;
        }
        if self.final_seen {
            return TrackerPhase::FinalPending;
        }
        if self.cursor.is_none() && self.dispatched.is_empty() {
            return TrackerPhase::Bootstrapped;
        }
        TrackerPhase::Live
    }
}
