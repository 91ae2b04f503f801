use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::game_dto::{StartSessionResponse, SubmitAnswerRequest, SubmitAnswerResponse};
use crate::error::Result;
use crate::utils::token::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<StartSessionResponse>> {
    let session = state.session_service.create_session(claims.sub).await?;
    Ok(Json(StartSessionResponse::new(&session, state.clock.now())))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>> {
    req.validate()?;
    // Ownership check only; the answer flow reloads the session itself.
    state
        .session_service
        .get_session_for_player(claims.sub, session_id)
        .await?;

    let result = state
        .answer_service
        .submit_answer(session_id, req.question_id, &req.answer)
        .await?;
    Ok(Json(result.into()))
}
