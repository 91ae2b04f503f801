use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    #[serde(skip_serializing)]
    pub correct: String,
    pub explanation: String,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Binary,
    MultipleChoice,
}

impl Question {
    pub fn is_binary_choice(&self) -> bool {
        self.option_c.is_none() && self.option_d.is_none()
    }

    pub fn question_type(&self) -> QuestionType {
        if self.is_binary_choice() {
            QuestionType::Binary
        } else {
            QuestionType::MultipleChoice
        }
    }

    pub fn validate_answer(&self, answer: &str) -> bool {
        self.correct == answer
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub description: String,
    pub is_phdt: bool,
}

/// A generated bundle of questions for one node visit. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub number: i32,
    pub category: Category,
    pub questions: Vec<Question>,
}
