//! Message text for plays, half-inning summaries and final scores.

use crate::models::{AggregateState, Fragment, GameStatus, Score, Side};

/// Outs that end a half inning.
pub const MAX_OUTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct MessageComposer {
    tracked_team_id: u64,
    tags: Option<String>,
}

impl MessageComposer {
    pub fn new(tracked_team_id: u64) -> Self {
        Self {
            tracked_team_id,
            tags: None,
        }
    }

    /// Hashtag suffix appended to every message. `None` leaves messages bare.
    pub fn with_tags(mut self, tags: Option<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Text for one newly observed play.
    pub fn compose_play(&self, fragment: &Fragment, state: &AggregateState) -> String {
        let body = if fragment.scoring {
            self.scoring_text(fragment, state)
        } else {
            format!("{}{}", fragment.text, situational_suffix(state))
        };
        self.finish(body)
    }

    /// Score summary once the third out is recorded in a live game.
    pub fn half_inning_summary(&self, state: &AggregateState) -> Option<String> {
        if state.status != GameStatus::Live || state.outs != MAX_OUTS || !state.inning_in_progress() {
            return None;
        }

        let half = state
            .inning_state
            .as_deref()
            .and_then(completed_half)
            .map(|h| format!("{h} "))
            .unwrap_or_default();

        Some(self.finish(format!(
            "End of the {}{}. {}",
            half,
            inning_ordinal(state),
            score_line(state, state.score())
        )))
    }

    pub fn final_score(&self, state: &AggregateState) -> String {
        self.finish(format!(
            "Final: {} {}, {} {}",
            state.away.name, state.away.runs, state.home.name, state.home.runs
        ))
    }

    fn scoring_text(&self, fragment: &Fragment, state: &AggregateState) -> String {
        let score = fragment.score.unwrap_or_else(|| state.score());
        let scoring_side = fragment.scoring_side.or_else(|| state.batting_side());
        let tracked_side = state.side_of(self.tracked_team_id);

        let line = score_line(state, score);
        match (scoring_side, tracked_side) {
            (Some(scored), Some(tracked)) if scored == tracked => {
                format!("SCORE! {} {}", fragment.text, line)
            }
            _ => format!("{} {}", fragment.text, line),
        }
    }

    fn finish(&self, body: String) -> String {
        match &self.tags {
            Some(tags) => format!("{body}{tags}"),
            None => body,
        }
    }
}

/// ` Top of the 7th. 2 outs`, or empty when no inning is underway.
pub fn situational_suffix(state: &AggregateState) -> String {
    if !state.inning_in_progress() {
        return String::new();
    }

    let inning_state = state.inning_state.as_deref().unwrap_or("Middle");
    let outs_word = if state.outs == 1 { "out" } else { "outs" };
    format!(
        " {} of the {}. {} {}",
        inning_state,
        inning_ordinal(state),
        state.outs,
        outs_word
    )
}

/// `ESC 3, LIC 1`
pub fn score_line(state: &AggregateState, score: Score) -> String {
    format!(
        "{} {}, {} {}",
        state.team(Side::Away).label(),
        score.away,
        state.team(Side::Home).label(),
        score.home
    )
}

/// ` #ESC #LIC` from whichever team codes resolved.
pub fn tag_line(away_code: Option<&str>, home_code: Option<&str>) -> Option<String> {
    let tags: String = [away_code, home_code]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| format!(" #{code}"))
        .collect();

    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Half that just ended. The linescore moves to "Middle" after the top and
/// to "End" after the bottom once the third out is in.
fn completed_half(inning_state: &str) -> Option<&'static str> {
    match inning_state.trim().to_lowercase().as_str() {
        "top" | "middle" => Some("top"),
        "bottom" | "end" => Some("bottom"),
        _ => None,
    }
}

fn inning_ordinal(state: &AggregateState) -> String {
    match (&state.inning_ordinal, state.inning) {
        (Some(ordinal), _) if !ordinal.is_empty() => ordinal.clone(),
        (_, Some(inning)) => ordinal(inning),
        _ => "inning".to_string(),
    }
}

/// 1 -> "1st", 12 -> "12th", 23 -> "23rd"
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamInfo;

    const ESCOGIDO: u64 = 671;
    const LICEY: u64 = 667;

    fn live_state(inning_state: &str, outs: u32) -> AggregateState {
        AggregateState {
            away: TeamInfo {
                id: ESCOGIDO,
                name: "Leones del Escogido".to_string(),
                abbreviation: Some("ESC".to_string()),
                runs: 3,
            },
            home: TeamInfo {
                id: LICEY,
                name: "Tigres del Licey".to_string(),
                abbreviation: Some("LIC".to_string()),
                runs: 1,
            },
            inning: Some(7),
            inning_ordinal: Some("7th".to_string()),
            inning_state: Some(inning_state.to_string()),
            outs,
            status: GameStatus::Live,
        }
    }

    #[test]
    fn test_plain_play_gets_situation() {
        let composer = MessageComposer::new(ESCOGIDO);
        let fragment = Fragment::new("/p/result/description", "J. Doe singles.");
        assert_eq!(
            composer.compose_play(&fragment, &live_state("Top", 2)),
            "J. Doe singles. Top of the 7th. 2 outs"
        );
        assert_eq!(
            composer.compose_play(&fragment, &live_state("Bottom", 1)),
            "J. Doe singles. Bottom of the 7th. 1 out"
        );
    }

    #[test]
    fn test_no_suffix_before_first_pitch() {
        let composer = MessageComposer::new(ESCOGIDO);
        let mut state = live_state("Top", 0);
        state.inning = None;
        state.status = GameStatus::Scheduled;
        let fragment = Fragment::new("/p/result/description", "Lineups posted.");
        assert_eq!(composer.compose_play(&fragment, &state), "Lineups posted.");
    }

    #[test]
    fn test_tracked_side_scoring_is_emphatic() {
        let composer = MessageComposer::new(ESCOGIDO);
        let fragment = Fragment::new("/p/result/description", "R. Roe homers.")
            .scored_by(Some(Side::Away))
            .with_score(Score { away: 3, home: 1 });
        assert_eq!(
            composer.compose_play(&fragment, &live_state("Top", 1)),
            "SCORE! R. Roe homers. ESC 3, LIC 1"
        );
    }

    #[test]
    fn test_opponent_scoring_is_neutral() {
        let composer = MessageComposer::new(ESCOGIDO);
        let fragment = Fragment::new("/p/result/description", "A. Poe doubles.")
            .scored_by(Some(Side::Home));
        assert_eq!(
            composer.compose_play(&fragment, &live_state("Bottom", 0)),
            "A. Poe doubles. ESC 3, LIC 1"
        );
    }

    #[test]
    fn test_scoring_side_falls_back_to_batting_side() {
        let composer = MessageComposer::new(ESCOGIDO);
        let fragment = Fragment::new("/p/result/description", "R. Roe walks.").scored_by(None);
        assert!(composer
            .compose_play(&fragment, &live_state("Top", 0))
            .starts_with("SCORE! "));
    }

    #[test]
    fn test_half_inning_summary_only_at_three_outs() {
        let composer = MessageComposer::new(ESCOGIDO);
        assert_eq!(composer.half_inning_summary(&live_state("Top", 2)), None);
        assert_eq!(
            composer.half_inning_summary(&live_state("Top", 3)).as_deref(),
            Some("End of the top 7th. ESC 3, LIC 1")
        );

        let mut finished = live_state("Bottom", 3);
        finished.status = GameStatus::Final;
        assert_eq!(composer.half_inning_summary(&finished), None);
    }

    #[test]
    fn test_half_inning_summary_names_the_completed_half() {
        let composer = MessageComposer::new(ESCOGIDO);
        assert_eq!(
            composer.half_inning_summary(&live_state("Middle", 3)).as_deref(),
            Some("End of the top 7th. ESC 3, LIC 1")
        );
        assert_eq!(
            composer.half_inning_summary(&live_state("End", 3)).as_deref(),
            Some("End of the bottom 7th. ESC 3, LIC 1")
        );
        assert_eq!(
            composer.half_inning_summary(&live_state("Bottom", 3)).as_deref(),
            Some("End of the bottom 7th. ESC 3, LIC 1")
        );
    }

    #[test]
    fn test_final_score_uses_full_names() {
        let composer = MessageComposer::new(ESCOGIDO);
        assert_eq!(
            composer.final_score(&live_state("End", 3)),
            "Final: Leones del Escogido 3, Tigres del Licey 1"
        );
    }

    #[test]
    fn test_tags_are_appended_when_available() {
        let composer = MessageComposer::new(ESCOGIDO).with_tags(tag_line(Some("ESC"), Some("LIC")));
        let fragment = Fragment::new("/p/result/description", "J. Doe singles.");
        assert_eq!(
            composer.compose_play(&fragment, &live_state("Top", 2)),
            "J. Doe singles. Top of the 7th. 2 outs #ESC #LIC"
        );
    }

    #[test]
    fn test_tag_line_tolerates_missing_codes() {
        assert_eq!(tag_line(None, None), None);
        assert_eq!(tag_line(Some(" "), None), None);
        assert_eq!(tag_line(None, Some("LIC")).as_deref(), Some(" #LIC"));
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(21), "21st");
    }
}
