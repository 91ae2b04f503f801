use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::{DEFAULT_NODE_START, MAX_SESSION_DURATION_SECONDS};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: i32,
    pub total: i32,
    pub time_penalty: i32,
    pub final_score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    InProgress,
    Expired,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub player_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub current_node: i32,
    pub score: Score,
    /// Index 0 is node 1.
    pub categories: Vec<String>,
    pub node_start_times: BTreeMap<i32, i64>,
    pub version: i64,
}

impl Session {
    pub fn new(player_id: Uuid, categories: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            started_at: now,
            finished_at: None,
            current_node: DEFAULT_NODE_START,
            score: Score::default(),
            categories,
            node_start_times: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if self.finished_at.is_some() {
            return false;
        }
        self.elapsed_at(now) < Duration::seconds(MAX_SESSION_DURATION_SECONDS)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        if self.finished_at.is_some() {
            SessionStatus::Finished
        } else if !self.is_active_at(now) {
            SessionStatus::Expired
        } else if self.current_node == DEFAULT_NODE_START {
            SessionStatus::Created
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.started_at
    }

    pub fn category_for_node(&self, node_number: i32) -> Result<&str, GameError> {
        if node_number < 1 {
            return Err(GameError::InvalidNodeNumber(node_number));
        }
        self.categories
            .get((node_number - 1) as usize)
            .map(String::as_str)
            .ok_or(GameError::InvalidNodeNumber(node_number))
    }

    pub fn record_node_entry(&mut self, node_number: i32, now: DateTime<Utc>) -> bool {
        if self.node_start_times.contains_key(&node_number) {
            return false;
        }
        self.node_start_times.insert(node_number, now.timestamp());
        true
    }

    pub fn node_started_at(&self, node_number: i32) -> Option<DateTime<Utc>> {
        self.node_start_times
            .get(&node_number)
            .and_then(|secs| Utc.timestamp_opt(*secs, 0).single())
    }

    pub fn record_answer(&mut self, is_correct: bool) {
        self.score.total += 1;
        if is_correct {
            self.score.correct += 1;
        }
    }
}
