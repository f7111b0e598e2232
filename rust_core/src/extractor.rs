//! Play extraction from a full live-feed document.
//!
//! Used for the first poll of a game and whenever the diff endpoint answers
//! with a restated document instead of a patch list.

use crate::models::{Fragment, LiveFeed, Play, Score, Side, ALL_PLAYS_PREFIX, DESCRIPTION_SUFFIX};

/// Plays with a non-empty description, in feed order.
pub fn extract_fragments(feed: &LiveFeed) -> impl Iterator<Item = Fragment> + '_ {
    feed.live_data
        .plays
        .all_plays
        .iter()
        .enumerate()
        .filter_map(|(index, play)| play_fragment(index, play))
}

fn play_fragment(index: usize, play: &Play) -> Option<Fragment> {
    let text = play.result.description.as_deref()?;
    if text.is_empty() {
        return None;
    }

    let path = format!("{ALL_PLAYS_PREFIX}{index}{DESCRIPTION_SUFFIX}");
    let mut fragment = Fragment::new(path, text);

    if play.about.is_scoring_play.unwrap_or(false) {
        let side = play.about.half_inning.as_deref().and_then(Side::batting_in);
        fragment = fragment.scored_by(side);
    }

    if let (Some(away), Some(home)) = (play.result.away_score, play.result.home_score) {
        fragment = fragment.with_score(Score { away, home });
    }

    Some(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed_with_plays(plays: serde_json::Value) -> LiveFeed {
        serde_json::from_value(json!({
            "metaData": { "timeStamp": "20240812_231542" },
            "liveData": { "plays": { "allPlays": plays } }
        }))
        .unwrap()
    }

    #[test]
    fn test_keeps_order_and_skips_empty_descriptions() {
        let feed = feed_with_plays(json!([
            { "result": { "description": "A" } },
            { "result": { "description": "" } },
            { "result": {} },
            { "result": { "description": "B" } }
        ]));

        let fragments: Vec<_> = extract_fragments(&feed).collect();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "A");
        assert_eq!(fragments[0].path, "/liveData/plays/allPlays/0/result/description");
        assert_eq!(fragments[1].text, "B");
        assert_eq!(fragments[1].path, "/liveData/plays/allPlays/3/result/description");
        assert!(!fragments[0].scoring);
    }

    #[test]
    fn test_scoring_play_carries_side_and_score() {
        let feed = feed_with_plays(json!([
            {
                "result": { "description": "J. Doe homers.", "awayScore": 0, "homeScore": 2 },
                "about": { "halfInning": "bottom", "isScoringPlay": true }
            }
        ]));

        let fragment = extract_fragments(&feed).next().unwrap();
        assert!(fragment.scoring);
        assert_eq!(fragment.scoring_side, Some(Side::Home));
        assert_eq!(fragment.score, Some(Score { away: 0, home: 2 }));
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let feed = feed_with_plays(json!([]));
        assert_eq!(extract_fragments(&feed).count(), 0);
    }
}
