//! Collaborator abstractions for the tracker.
//!
//! The tracker only talks to the outside world through these traits:
//! - [`GameFeed`] for schedule, live feed, diff patches and team lookups
//! - [`MessagePoster`] for publishing composed messages
//!
//! Feed methods hand back raw bodies where the tracker must classify the
//! shape itself, so transport failures and malformed payloads stay distinct.

use crate::models::{AggregateState, Cursor};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GameFeed: Send + Sync {
    /// Game to follow today: an in-progress game first, then a finished one.
    async fn select_event_for_today(&self) -> Result<Option<u64>>;

    /// Full live document (raw JSON body).
    async fn fetch_event_document(&self, game_pk: u64) -> Result<String>;

    /// Changes since `since` (raw JSON body, either shape).
    async fn fetch_event_diff(&self, game_pk: u64, since: &Cursor) -> Result<String>;

    /// Current score, inning, outs and status.
    async fn fetch_aggregate_snapshot(&self, game_pk: u64) -> Result<AggregateState>;

    /// Short team code used for hashtags.
    async fn fetch_tag(&self, team_id: u64) -> Result<String>;

    /// Provider name for logging and debugging
    fn provider_name(&self) -> &str;
}

#[async_trait]
pub trait MessagePoster: Send + Sync {
    /// Publish one message. `Ok` means the service confirmed it.
    async fn post_message(&self, text: &str) -> Result<()>;

    fn poster_name(&self) -> &str;
}

#[async_trait]
impl<T: MessagePoster + ?Sized> MessagePoster for Box<T> {
    async fn post_message(&self, text: &str) -> Result<()> {
        (**self).post_message(text).await
    }

    fn poster_name(&self) -> &str {
        (**self).poster_name()
    }
}
