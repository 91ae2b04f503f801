use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::config::FUN_CATEGORY_NAME;
use crate::database::repository::{
    AttemptRepository, CatalogRepository, GameStore, LeaderboardRepository, PlayerRepository,
    SessionRepository,
};
use crate::error::{Error, GameError, Result};
use crate::models::attempt::Attempt;
use crate::models::leaderboard::{rank_entries, LeaderboardEntry};
use crate::models::player::Player;
use crate::models::question::{Category, Question};
use crate::models::session::Session;

#[derive(Default)]
struct Inner {
    categories: Vec<Category>,
    questions: Vec<Question>,
    players: HashMap<Uuid, Player>,
    sessions: HashMap<Uuid, Session>,
    attempts: Vec<Attempt>,
    leaderboard: HashMap<Uuid, LeaderboardEntry>,
}

impl Inner {
    fn insert_attempt(&mut self, attempt: &Attempt) -> Result<()> {
        if self.has_attempt(attempt.session_id, attempt.question_id) {
            return Err(GameError::AlreadyAnswered.into());
        }
        self.attempts.push(attempt.clone());
        Ok(())
    }

    fn has_attempt(&self, session_id: Uuid, question_id: Uuid) -> bool {
        self.attempts
            .iter()
            .any(|a| a.session_id == session_id && a.question_id == question_id)
    }

    fn check_version(&self, session: &Session) -> Result<()> {
        match self.sessions.get(&session.id) {
            None => Err(GameError::SessionNotFound.into()),
            Some(stored) if stored.version != session.version => {
                Err(GameError::SessionConflict.into())
            }
            Some(_) => Ok(()),
        }
    }

    fn store_session(&mut self, session: &mut Session) {
        session.version += 1;
        self.sessions.insert(session.id, session.clone());
    }

    fn upsert(&mut self, entry: &LeaderboardEntry) {
        match self.leaderboard.get_mut(&entry.session_id) {
            Some(existing) => {
                existing.final_score = entry.final_score;
                existing.completion_time_ms = entry.completion_time_ms;
                existing.achieved_at = entry.achieved_at;
            }
            None => {
                self.leaderboard.insert(entry.session_id, entry.clone());
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("memory store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn get_categories(&self) -> Result<Vec<Category>> {
        Ok(self.lock()?.categories.clone())
    }

    async fn get_questions_by_category(&self, category_id: Uuid, limit: i64) -> Result<Vec<Question>> {
        let inner = self.lock()?;
        Ok(inner
            .questions
            .iter()
            .filter(|q| q.category_id == category_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_unused_fun_questions_for_session(&self, session_id: Uuid, limit: i64) -> Result<Vec<Question>> {
        let inner = self.lock()?;
        let fun_ids: Vec<Uuid> = inner
            .categories
            .iter()
            .filter(|c| c.name == FUN_CATEGORY_NAME)
            .map(|c| c.id)
            .collect();
        Ok(inner
            .questions
            .iter()
            .filter(|q| fun_ids.contains(&q.category_id))
            .filter(|q| !inner.has_attempt(session_id, q.id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_question_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        Ok(self.lock()?.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        self.lock()?.categories.push(category.clone());
        Ok(())
    }

    async fn insert_question(&self, question: &Question) -> Result<()> {
        self.lock()?.questions.push(question.clone());
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for MemoryStore {
    async fn save_player(&self, player: &Player) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.players.values().any(|p| p.email == player.email) {
            return Err(GameError::PlayerAlreadyExists.into());
        }
        inner.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn find_player_by_id(&self, id: Uuid) -> Result<Option<Player>> {
        Ok(self.lock()?.players.get(&id).cloned())
    }

    async fn find_player_by_email(&self, email: &str) -> Result<Option<Player>> {
        Ok(self
            .lock()?
            .players
            .values()
            .find(|p| p.email == email)
            .cloned())
    }
}

#[async_trait]
impl AttemptRepository for MemoryStore {
    async fn save_attempt(&self, attempt: &Attempt) -> Result<()> {
        self.lock()?.insert_attempt(attempt)
    }

    async fn has_answered_question(&self, session_id: Uuid, question_id: Uuid) -> Result<bool> {
        Ok(self.lock()?.has_attempt(session_id, question_id))
    }

    async fn count_attempts_by_category(&self, session_id: Uuid, category_id: Uuid) -> Result<i64> {
        let inner = self.lock()?;
        let count = inner
            .attempts
            .iter()
            .filter(|a| a.session_id == session_id)
            .filter(|a| {
                inner
                    .questions
                    .iter()
                    .any(|q| q.id == a.question_id && q.category_id == category_id)
            })
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn save_session(&self, session: &Session) -> Result<()> {
        self.lock()?.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        Ok(self.lock()?.sessions.get(&id).cloned())
    }

    async fn update_session(&self, session: &mut Session) -> Result<()> {
        let mut inner = self.lock()?;
        inner.check_version(session)?;
        inner.store_session(session);
        Ok(())
    }
}

#[async_trait]
impl LeaderboardRepository for MemoryStore {
    async fn upsert_entry(&self, entry: &LeaderboardEntry) -> Result<()> {
        self.lock()?.upsert(entry);
        Ok(())
    }

    async fn get_top(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let mut entries: Vec<LeaderboardEntry> = self.lock()?.leaderboard.values().cloned().collect();
        rank_entries(&mut entries);
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn commit_answer(
        &self,
        attempt: &Attempt,
        session: &mut Session,
        entry: Option<&LeaderboardEntry>,
    ) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.has_attempt(attempt.session_id, attempt.question_id) {
            return Err(GameError::AlreadyAnswered.into());
        }
        inner.check_version(session)?;

        inner.insert_attempt(attempt)?;
        inner.store_session(session);
        if let Some(entry) = entry {
            inner.upsert(entry);
        }
        Ok(())
    }
}
