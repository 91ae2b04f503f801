use axum::{
    extract::{Extension, State},
    response::Json,
};
use validator::Validate;

use crate::dto::game_dto::{ScanNodeRequest, ScanNodeResponse};
use crate::error::Result;
use crate::utils::token::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn scan_node(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ScanNodeRequest>,
) -> Result<Json<ScanNodeResponse>> {
    req.validate()?;
    let unlocked = state
        .session_service
        .unlock_node(claims.sub, req.node_code.trim(), req.session_id)
        .await?;
    Ok(Json(ScanNodeResponse::new(unlocked.session.id, unlocked.node)))
}
