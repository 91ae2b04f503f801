use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::middleware::auth::require_player;
use crate::AppState;

pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod nodes;
pub mod sessions;

pub fn router(state: AppState) -> Router {
    let player_api = Router::new()
        .route("/api/v1/auth/profile", get(auth::profile))
        .route("/api/v1/sessions/start", post(sessions::start_session))
        .route("/api/v1/sessions/:id/answer", post(sessions::submit_answer))
        .route("/api/v1/nodes/scan", post(nodes::scan_node))
        .layer(from_fn_with_state(state.clone(), require_player));

    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/leaderboard", get(leaderboard::get_leaderboard));

    public_api.merge(player_api).with_state(state)
}
