//! Diff-patch interpretation.
//!
//! The diffPatch endpoint answers in one of two shapes and never says which:
//! - a JSON array of change batches (`[{"diff": [{op, path, value}, ...]}, ...]`)
//! - a restated live document, identical to the bootstrap response
//!
//! [`DiffResponse::parse`] is the only place the shape is sniffed. Everything
//! downstream works on the tagged enum.

use crate::error::{Result, TrackerError};
use crate::extractor::extract_fragments;
use crate::models::{
    Cursor, DiffBatch, DiffChange, Fragment, LiveFeed, Score, Side, DESCRIPTION_SUFFIX,
};
use log::debug;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum DiffResponse {
    Batches(Vec<DiffBatch>),
    FullDocument(Box<LiveFeed>),
}

impl DiffResponse {
    /// Parse a raw diffPatch body into one of the two known shapes.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_array() {
            return Ok(DiffResponse::Batches(serde_json::from_value(value)?));
        }
        if value.get("liveData").is_some() {
            return Ok(DiffResponse::FullDocument(Box::new(serde_json::from_value(value)?)));
        }
        Err(TrackerError::Malformed(format!(
            "expected diff batches or a live document, got {}",
            json_kind(&value)
        )))
    }
}

/// What the interpreter wants done with the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorUpdate {
    /// Diff path: move forward if later than the stored cursor
    Advance(Cursor),
    /// Full document: take the document's own timecode as-is
    Resync(Cursor),
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct DiffOutcome {
    pub fragments: Vec<Fragment>,
    pub cursor: CursorUpdate,
    pub restated: bool,
}

impl DiffOutcome {
    fn empty() -> Self {
        Self {
            fragments: Vec::new(),
            cursor: CursorUpdate::Unchanged,
            restated: false,
        }
    }
}

/// Normalize a diff response into new fragments and a cursor update.
pub fn interpret(response: &DiffResponse) -> DiffOutcome {
    match response {
        DiffResponse::Batches(batches) => interpret_batches(batches),
        DiffResponse::FullDocument(feed) => interpret_document(feed),
    }
}

/// Bootstrap and shape-B handling share this path.
pub fn interpret_document(feed: &LiveFeed) -> DiffOutcome {
    DiffOutcome {
        fragments: extract_fragments(feed).collect(),
        cursor: feed
            .meta_data
            .time_stamp
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .map(|ts| CursorUpdate::Resync(Cursor::new(ts)))
            .unwrap_or(CursorUpdate::Unchanged),
        restated: true,
    }
}

fn interpret_batches(batches: &[DiffBatch]) -> DiffOutcome {
    let Some(first) = batches.first() else {
        return DiffOutcome::empty();
    };

    // Content from the first batch only, timecode from the last.
    let fragments = batch_fragments(first);

    let cursor = batches
        .last()
        .and_then(|batch| batch.diff.first())
        .and_then(|change| change.value.as_str())
        .filter(|ts| !ts.is_empty())
        .map(|ts| CursorUpdate::Advance(Cursor::new(ts)))
        .unwrap_or(CursorUpdate::Unchanged);

    debug!(
        "Diff: {} batches, {} fragments in first batch, cursor {:?}",
        batches.len(),
        fragments.len(),
        cursor
    );

    DiffOutcome {
        fragments,
        cursor,
        restated: false,
    }
}

fn batch_fragments(batch: &DiffBatch) -> Vec<Fragment> {
    batch
        .diff
        .iter()
        .filter_map(|change| {
            let text = description_text(change)?;
            Some(enrich(Fragment::new(change.path.clone(), text), change, &batch.diff))
        })
        .collect()
}

/// Text of a change that carries a play description, if it is one.
fn description_text(change: &DiffChange) -> Option<&str> {
    if !change.path.ends_with(DESCRIPTION_SUFFIX) {
        return None;
    }
    change.value.as_str().filter(|text| !text.is_empty())
}

/// Attach scoring details found in sibling changes of the same play.
fn enrich(mut fragment: Fragment, change: &DiffChange, siblings: &[DiffChange]) -> Fragment {
    let prefix = &change.path[..change.path.len() - DESCRIPTION_SUFFIX.len()];

    let is_scoring_play = sibling(siblings, prefix, "about/isScoringPlay").and_then(Value::as_bool);
    let half_inning = sibling(siblings, prefix, "about/halfInning").and_then(Value::as_str);
    let away_score = sibling(siblings, prefix, "result/awayScore").and_then(as_u32);
    let home_score = sibling(siblings, prefix, "result/homeScore").and_then(as_u32);

    let score_changed = away_score.is_some() || home_score.is_some();
    let scoring = is_scoring_play.unwrap_or(score_changed);

    if scoring {
        let side = match (away_score, home_score) {
            (Some(_), None) => Some(Side::Away),
            (None, Some(_)) => Some(Side::Home),
            _ => half_inning.and_then(Side::batting_in),
        };
        fragment = fragment.scored_by(side);
    }

    if let (Some(away), Some(home)) = (away_score, home_score) {
        fragment = fragment.with_score(Score { away, home });
    }

    fragment
}

fn sibling<'a>(siblings: &'a [DiffChange], prefix: &str, suffix: &str) -> Option<&'a Value> {
    let path = format!("{prefix}/{suffix}");
    siblings.iter().find(|c| c.path == path).map(|c| &c.value)
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without liveData",
    }
}
