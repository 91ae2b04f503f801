use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, PlayerInfo, SignupRequest, SignupResponse};
use crate::error::Result;
use crate::utils::token::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn signup(State(state): State<AppState>, Json(req): Json<SignupRequest>) -> Result<Response> {
    let req = req.normalized();
    req.validate()?;
    let player = state
        .player_service
        .signup(&req.name, &req.email, &req.password)
        .await?;

    let response = SignupResponse {
        player: PlayerInfo::from(&player),
        message: "Welcome to the carnival! Your account has been created.".to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[axum::debug_handler]
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>> {
    let req = req.normalized();
    req.validate()?;
    let auth = state.player_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        player: PlayerInfo::from(&auth.player),
        access_token: auth.token,
        token_type: "Bearer".to_string(),
        expires_in: state.player_service.token_expiry_seconds(),
        message: "Welcome back to the carnival!".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn profile(Extension(claims): Extension<Claims>) -> Json<PlayerInfo> {
    Json(claims.into())
}
