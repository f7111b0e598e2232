//! Playfeed Core - incremental play tracking and idempotent game notifications.
//!
//! This crate provides:
//! - Bootstrap extraction of plays from a full live-feed document
//! - Diff-patch interpretation that tolerates both response shapes
//! - Message composition (situation suffix, scoring, half-inning, final)
//! - Content-based deduplication of posted messages
//! - A single-cycle pipeline over pluggable feed and poster collaborators
//! - Stats API and Twitter clients behind circuit breakers

pub mod circuit_breaker;
pub mod clients;
pub mod composer;
pub mod diff;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod snapshot;

pub use error::{Result, TrackerError};
pub use pipeline::{CycleReport, PlayTracker, TrackerConfig};
pub use providers::{GameFeed, MessagePoster};
pub use snapshot::{SnapshotStore, TrackerPhase};
