use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::attempt::Attempt;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::player::Player;
use crate::models::question::{Category, Question};
use crate::models::session::Session;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_categories(&self) -> Result<Vec<Category>>;
    async fn get_questions_by_category(&self, category_id: Uuid, limit: i64) -> Result<Vec<Question>>;
    async fn get_unused_fun_questions_for_session(&self, session_id: Uuid, limit: i64) -> Result<Vec<Question>>;
    async fn find_question_by_id(&self, id: Uuid) -> Result<Option<Question>>;
    async fn insert_category(&self, category: &Category) -> Result<()>;
    async fn insert_question(&self, question: &Question) -> Result<()>;
}

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn save_player(&self, player: &Player) -> Result<()>;
    async fn find_player_by_id(&self, id: Uuid) -> Result<Option<Player>>;
    async fn find_player_by_email(&self, email: &str) -> Result<Option<Player>>;
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn save_attempt(&self, attempt: &Attempt) -> Result<()>;
    async fn has_answered_question(&self, session_id: Uuid, question_id: Uuid) -> Result<bool>;
    async fn count_attempts_by_category(&self, session_id: Uuid, category_id: Uuid) -> Result<i64>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save_session(&self, session: &Session) -> Result<()>;
    async fn find_session_by_id(&self, id: Uuid) -> Result<Option<Session>>;
    /// Compare-and-swap on `version`; a stale copy fails with `SessionConflict`.
    async fn update_session(&self, session: &mut Session) -> Result<()>;
}

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    async fn upsert_entry(&self, entry: &LeaderboardEntry) -> Result<()>;
    async fn get_top(&self, limit: i64) -> Result<Vec<LeaderboardEntry>>;
}

#[async_trait]
pub trait GameStore:
    CatalogRepository + PlayerRepository + AttemptRepository + SessionRepository + LeaderboardRepository
{
    /// Attempt, session update and leaderboard upsert in one transaction.
    async fn commit_answer(
        &self,
        attempt: &Attempt,
        session: &mut Session,
        entry: Option<&LeaderboardEntry>,
    ) -> Result<()>;
}
