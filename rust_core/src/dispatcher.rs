//! Deduplicating front for the message poster.
//!
//! A body is recorded in the snapshot only after the poster confirms it, so a
//! failed post stays eligible if the same text is composed again later.

use crate::providers::MessagePoster;
use crate::snapshot::SnapshotStore;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    /// Already posted for this game
    Duplicate,
    Failed,
}

impl DispatchOutcome {
    pub fn sent(self) -> bool {
        self == DispatchOutcome::Sent
    }
}

pub struct Dispatcher<'a, P: MessagePoster + ?Sized> {
    poster: &'a P,
}

impl<'a, P: MessagePoster + ?Sized> Dispatcher<'a, P> {
    pub fn new(poster: &'a P) -> Self {
        Self { poster }
    }

    /// Post `text` unless it already went out. Failures are logged, never raised.
    pub async fn dispatch(&self, store: &mut SnapshotStore, text: &str) -> DispatchOutcome {
        if store.has_dispatched(text) {
            return DispatchOutcome::Duplicate;
        }

        match self.poster.post_message(text).await {
            Ok(()) => {
                store.mark_dispatched(text);
                info!("Posted via {}: {}", self.poster.poster_name(), text);
                DispatchOutcome::Sent
            }
            Err(e) => {
                warn!(
                    "Failed to post via {}: {:#} | message: {}",
                    self.poster.poster_name(),
                    e,
                    text
                );
                DispatchOutcome::Failed
            }
        }
    }
}
