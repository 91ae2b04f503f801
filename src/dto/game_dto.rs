use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::QUESTIONS_PER_NODE;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::question::{Node, Question, QuestionType};
use crate::models::session::{Session, SessionStatus};
use crate::services::answer_service::AnswerResult;
use crate::utils::time::format_duration;

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub message: String,
}

impl StartSessionResponse {
    pub fn new(session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session.id,
            started_at: session.started_at,
            status: session.status_at(now),
            message: "Session created! Scan a node QR code at any carnival location to begin your journey."
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScanNodeRequest {
    #[validate(length(min = 1, message = "node_code is required"))]
    pub node_code: String,
    pub session_id: Option<Uuid>,
}

/// Question as shown to players; the correct option is never included.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub option_a: String,
    pub option_b: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_c: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_d: Option<String>,
}

impl From<Question> for QuestionResponse {
    fn from(q: Question) -> Self {
        Self {
            question_type: q.question_type(),
            id: q.id,
            text: q.text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeResponse {
    pub number: i32,
    pub category_name: String,
    pub category_title: String,
    pub category_description: String,
    pub questions: Vec<QuestionResponse>,
}

impl From<Node> for NodeResponse {
    fn from(node: Node) -> Self {
        Self {
            number: node.number,
            category_name: node.category.name,
            category_title: node.category.title,
            category_description: node.category.description,
            questions: node.questions.into_iter().map(QuestionResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScanNodeResponse {
    pub session_id: Uuid,
    pub node: NodeResponse,
    pub message: String,
}

impl ScanNodeResponse {
    pub fn new(session_id: Uuid, node: Node) -> Self {
        let message = format!(
            "Welcome to Node {}! Answer all {} questions to continue your journey.",
            node.number, QUESTIONS_PER_NODE
        );
        Self {
            session_id,
            node: node.into(),
            message,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "answer is required"))]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub node_completed: bool,
    pub questions_answered_in_node: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_score: Option<i32>,
}

impl From<AnswerResult> for SubmitAnswerResponse {
    fn from(result: AnswerResult) -> Self {
        let message = if result.node_completed {
            "Node completed! Check your updated leaderboard position. Find the next location to continue."
                .to_string()
        } else {
            let remaining = (QUESTIONS_PER_NODE as i64 - result.questions_answered_in_node).max(0);
            if result.is_correct {
                format!("Correct! {} questions remaining in this node.", remaining)
            } else {
                format!("Incorrect. {} questions remaining in this node.", remaining)
            }
        };
        Self {
            is_correct: result.is_correct,
            node_completed: result.node_completed,
            questions_answered_in_node: result.questions_answered_in_node,
            message,
            current_score: result.current_score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: i32,
    pub player_name: String,
    pub final_score: i32,
    pub completion_time: String,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardRow>,
}

impl From<Vec<LeaderboardEntry>> for LeaderboardResponse {
    fn from(entries: Vec<LeaderboardEntry>) -> Self {
        let entries = entries
            .into_iter()
            .zip(1..)
            .map(|(entry, rank)| LeaderboardRow {
                rank,
                completion_time: format_duration(entry.completion_time()),
                player_name: entry.player_name,
                final_score: entry.final_score,
                achieved_at: entry.achieved_at,
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn result(is_correct: bool, answered: i64, completed: bool) -> AnswerResult {
        AnswerResult {
            is_correct,
            node_completed: completed,
            questions_answered_in_node: answered,
            current_score: completed.then_some(470),
        }
    }

    #[test]
    fn answer_messages_count_down() {
        let r = SubmitAnswerResponse::from(result(true, 1, false));
        assert_eq!(r.message, "Correct! 4 questions remaining in this node.");
        let r = SubmitAnswerResponse::from(result(false, 3, false));
        assert_eq!(r.message, "Incorrect. 2 questions remaining in this node.");
        assert!(r.current_score.is_none());
    }

    #[test]
    fn completed_answer_carries_score() {
        let r = SubmitAnswerResponse::from(result(true, 5, true));
        assert!(r.message.starts_with("Node completed!"));
        assert_eq!(r.current_score, Some(470));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["current_score"], 470);
    }

    #[test]
    fn score_is_omitted_until_completion() {
        let json = serde_json::to_value(SubmitAnswerResponse::from(result(true, 1, false))).unwrap();
        assert!(json.get("current_score").is_none());
    }

    #[test]
    fn leaderboard_rows_are_ranked_from_one() {
        let now = Utc::now();
        let entries = vec![
            LeaderboardEntry::new(Uuid::new_v4(), "Rostam".into(), Uuid::new_v4(), 850, Duration::seconds(2325), now),
            LeaderboardEntry::new(Uuid::new_v4(), "Sohrab".into(), Uuid::new_v4(), 700, Duration::seconds(45), now),
        ];
        let resp = LeaderboardResponse::from(entries);
        assert_eq!(resp.entries[0].rank, 1);
        assert_eq!(resp.entries[0].completion_time, "38m45s");
        assert_eq!(resp.entries[1].rank, 2);
        assert_eq!(resp.entries[1].completion_time, "45s");
    }
}
