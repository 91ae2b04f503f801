pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::repository::GameStore;
use crate::services::{
    answer_service::AnswerService, leaderboard_service::LeaderboardService,
    player_service::PlayerService, session_service::SessionService,
};
use crate::utils::random::{RandomSource, ThreadRandom};
use crate::utils::time::{Clock, SystemClock};
use crate::utils::token::TokenKeys;

#[derive(Clone)]
pub struct AppState {
    pub token_keys: TokenKeys,
    pub clock: Arc<dyn Clock>,
    pub player_service: PlayerService,
    pub session_service: SessionService,
    pub answer_service: AnswerService,
    pub leaderboard_service: LeaderboardService,
}

impl AppState {
    pub fn new(store: Arc<dyn GameStore>, token_keys: TokenKeys) -> Self {
        Self::with_sources(store, token_keys, Arc::new(ThreadRandom), Arc::new(SystemClock))
    }

    pub fn with_sources(
        store: Arc<dyn GameStore>,
        token_keys: TokenKeys,
        rng: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let player_service = PlayerService::new(store.clone(), token_keys.clone(), clock.clone());
        let session_service = SessionService::new(store.clone(), rng, clock.clone());
        let answer_service = AnswerService::new(store.clone(), clock.clone());
        let leaderboard_service = LeaderboardService::new(store);

        Self {
            token_keys,
            clock,
            player_service,
            session_service,
            answer_service,
            leaderboard_service,
        }
    }
}
