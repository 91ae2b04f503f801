use axum::{extract::State, response::Json};

use crate::dto::game_dto::LeaderboardResponse;
use crate::error::Result;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<Json<LeaderboardResponse>> {
    let entries = state.leaderboard_service.get_leaderboard().await?;
    Ok(Json(entries.into()))
}
