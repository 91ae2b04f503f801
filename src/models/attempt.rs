use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attempt {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub is_correct: bool,
    pub attempted_at: DateTime<Utc>,
}

impl Attempt {
    pub fn new(
        session_id: Uuid,
        question_id: Uuid,
        answer: String,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            question_id,
            answer,
            is_correct,
            attempted_at: now,
        }
    }
}
