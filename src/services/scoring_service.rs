use chrono::{DateTime, Utc};

use crate::config::{CORRECT_ANSWER_MULTIPLIER, PENALTY_MULTIPLIER, TIME_PENALTY_INTERVAL_SECONDS};
use crate::models::session::Score;

pub struct ScoringService;

impl ScoringService {
    /// Whole 30-second blocks since the node was entered; zero if it never was.
    pub fn node_penalty_units(started_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i32 {
        let Some(started_at) = started_at else {
            return 0;
        };
        let elapsed_seconds = (now - started_at).num_seconds().max(0);
        (elapsed_seconds / TIME_PENALTY_INTERVAL_SECONDS) as i32
    }

    pub fn final_score(correct: i32, penalty_units: i32) -> i32 {
        (correct * CORRECT_ANSWER_MULTIPLIER - penalty_units * PENALTY_MULTIPLIER).max(0)
    }

    pub fn score(score: &Score) -> Score {
        Score {
            final_score: Self::final_score(score.correct, score.time_penalty),
            ..*score
        }
    }
}
