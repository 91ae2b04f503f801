use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::QUESTIONS_TO_COMPLETE_NODE;
use crate::database::repository::{
    AttemptRepository, CatalogRepository, GameStore, PlayerRepository, SessionRepository,
};
use crate::error::{Error, GameError, Result};
use crate::models::attempt::Attempt;
use crate::services::leaderboard_service::LeaderboardService;
use crate::services::scoring_service::ScoringService;
use crate::services::session_service::find_category_by_name;
use crate::utils::time::Clock;

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    pub node_completed: bool,
    pub questions_answered_in_node: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_score: Option<i32>,
}

#[derive(Clone)]
pub struct AnswerService {
    store: Arc<dyn GameStore>,
    clock: Arc<dyn Clock>,
}

impl AnswerService {
    pub fn new(store: Arc<dyn GameStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn submit_answer(&self, session_id: Uuid, question_id: Uuid, answer: &str) -> Result<AnswerResult> {
        let now = self.clock.now();

        let mut session = self
            .store
            .find_session_by_id(session_id)
            .await?
            .ok_or(GameError::SessionNotFound)?;
        if !session.is_active_at(now) {
            return Err(GameError::SessionInactive.into());
        }

        let question = self
            .store
            .find_question_by_id(question_id)
            .await?
            .ok_or(GameError::QuestionNotFound)?;

        if self.store.has_answered_question(session_id, question_id).await? {
            return Err(GameError::AlreadyAnswered.into());
        }

        let is_correct = question.validate_answer(answer);
        let attempt = Attempt::new(session_id, question_id, answer.to_string(), is_correct, now);
        session.record_answer(is_correct);

        let node_number = session.current_node;
        let category_name = session.category_for_node(node_number)?.to_string();
        let category = find_category_by_name(self.store.as_ref(), &category_name).await?;

        let previously_answered = self
            .store
            .count_attempts_by_category(session_id, category.id)
            .await?;
        let answered_in_node = previously_answered + i64::from(question.category_id == category.id);
        let node_completed = answered_in_node >= QUESTIONS_TO_COMPLETE_NODE;

        let mut entry = None;
        if node_completed {
            let units = ScoringService::node_penalty_units(session.node_started_at(node_number), now);
            session.score.time_penalty += units;
            session.score = ScoringService::score(&session.score);

            let player = self
                .store
                .find_player_by_id(session.player_id)
                .await?
                .ok_or(GameError::PlayerNotFound)?;
            entry = Some(LeaderboardService::entry_for_session(&session, &player, now));

            tracing::info!(
                %session_id,
                node = node_number,
                penalty_units = units,
                final_score = session.score.final_score,
                "node completed"
            );
        }

        if let Err(err) = self
            .store
            .commit_answer(&attempt, &mut session, entry.as_ref())
            .await
        {
            if matches!(err, Error::Game(GameError::SessionConflict)) {
                tracing::warn!(%session_id, "session changed while answering");
            }
            return Err(err);
        }
        tracing::info!(%session_id, %question_id, is_correct, "answer recorded");
        if let Some(entry) = &entry {
            tracing::info!(%session_id, final_score = entry.final_score, "leaderboard upserted");
        }

        Ok(AnswerResult {
            is_correct,
            node_completed,
            questions_answered_in_node: answered_in_node,
            current_score: node_completed.then_some(session.score.final_score),
        })
    }
}
