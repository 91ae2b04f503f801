use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    node_number_for_code, CATEGORY_QUESTIONS_PER_NODE, FUN_CATEGORY_NAME, FUN_QUESTIONS_PER_NODE,
    MAX_CARNIVAL_NODES, MIN_REQUIRED_GENERAL_CATEGORIES, QUESTION_FETCH_MULTIPLIER,
};
use crate::database::repository::{CatalogRepository, GameStore, PlayerRepository, SessionRepository};
use crate::error::{Error, GameError, Result};
use crate::models::question::{Category, Node};
use crate::models::session::Session;
use crate::utils::random::{shuffle, RandomSource};
use crate::utils::time::Clock;

#[derive(Debug, Clone)]
pub struct UnlockedNode {
    pub session: Session,
    pub node: Node,
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn GameStore>,
    rng: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    pub fn new(store: Arc<dyn GameStore>, rng: Arc<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        Self { store, rng, clock }
    }

    pub async fn create_session(&self, player_id: Uuid) -> Result<Session> {
        self.store
            .find_player_by_id(player_id)
            .await?
            .ok_or(GameError::PlayerNotFound)?;
        self.start_session(player_id).await
    }

    /// Loads a session, hiding sessions owned by other players.
    pub async fn get_session_for_player(&self, player_id: Uuid, session_id: Uuid) -> Result<Session> {
        let session = self
            .store
            .find_session_by_id(session_id)
            .await?
            .ok_or(GameError::SessionNotFound)?;
        if session.player_id != player_id {
            return Err(GameError::SessionNotFound.into());
        }
        Ok(session)
    }

    pub async fn unlock_node(
        &self,
        player_id: Uuid,
        node_code: &str,
        session_id: Option<Uuid>,
    ) -> Result<UnlockedNode> {
        self.store
            .find_player_by_id(player_id)
            .await?
            .ok_or(GameError::PlayerNotFound)?;

        let node_number = node_number_for_code(node_code).ok_or(GameError::NodeNotFound)?;

        let mut session = match session_id {
            Some(id) => {
                let session = self.get_session_for_player(player_id, id).await?;
                if !session.is_active_at(self.clock.now()) {
                    return Err(GameError::SessionExpired.into());
                }
                session
            }
            None => self.start_session(player_id).await?,
        };

        let category_name = session.category_for_node(node_number)?.to_string();
        let category = find_category_by_name(self.store.as_ref(), &category_name).await?;
        let node = self.generate_node(node_number, category, session.id).await?;

        if session.record_node_entry(node_number, self.clock.now()) {
            tracing::info!(session_id = %session.id, node = node_number, "node clock started");
        }
        session.current_node = node_number;
        if let Err(err) = self.store.update_session(&mut session).await {
            if matches!(err, Error::Game(GameError::SessionConflict)) {
                tracing::warn!(session_id = %session.id, "session changed during node scan");
            }
            return Err(err);
        }
        tracing::info!(
            session_id = %session.id,
            node = node_number,
            category = %node.category.name,
            questions = node.questions.len(),
            "node unlocked"
        );

        Ok(UnlockedNode { session, node })
    }

    async fn start_session(&self, player_id: Uuid) -> Result<Session> {
        let categories = self.assign_categories().await?;
        let session = Session::new(player_id, categories, self.clock.now());
        self.store.save_session(&session).await?;
        tracing::info!(session_id = %session.id, player_id = %player_id, "session started");
        Ok(session)
    }

    async fn assign_categories(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .get_categories()
            .await?
            .into_iter()
            .filter(|c| c.name != FUN_CATEGORY_NAME)
            .map(|c| c.name)
            .collect();

        if names.len() < MIN_REQUIRED_GENERAL_CATEGORIES {
            return Err(GameError::InsufficientCategories {
                available: names.len(),
                required: MIN_REQUIRED_GENERAL_CATEGORIES,
            }
            .into());
        }

        shuffle(self.rng.as_ref(), &mut names);
        names.truncate(MAX_CARNIVAL_NODES);
        Ok(names)
    }

    async fn generate_node(&self, number: i32, category: Category, session_id: Uuid) -> Result<Node> {
        let fetch = (CATEGORY_QUESTIONS_PER_NODE * QUESTION_FETCH_MULTIPLIER) as i64;
        let mut questions = self.store.get_questions_by_category(category.id, fetch).await?;
        if questions.len() < CATEGORY_QUESTIONS_PER_NODE {
            return Err(GameError::InsufficientQuestions {
                available: questions.len(),
                required: CATEGORY_QUESTIONS_PER_NODE,
            }
            .into());
        }
        shuffle(self.rng.as_ref(), &mut questions);
        questions.truncate(CATEGORY_QUESTIONS_PER_NODE);

        let fun = self
            .store
            .get_unused_fun_questions_for_session(session_id, FUN_QUESTIONS_PER_NODE as i64)
            .await?;
        if fun.is_empty() {
            tracing::warn!(%session_id, node = number, "no unused fun question left for session");
        }
        questions.extend(fun);
        shuffle(self.rng.as_ref(), &mut questions);

        Ok(Node {
            number,
            category,
            questions,
        })
    }
}

pub(crate) async fn find_category_by_name(store: &dyn GameStore, name: &str) -> Result<Category> {
    store
        .get_categories()
        .await?
        .into_iter()
        .find(|c| c.name == name)
        .ok_or_else(|| GameError::CategoryNotFound(name.to_string()).into())
}
