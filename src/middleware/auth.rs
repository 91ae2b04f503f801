use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::AppState;

fn unauthorized(code: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// Verifies the bearer token and stores its `Claims` in request extensions.
pub async fn require_player(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized("missing_authorization", "Authorization header required");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization", "Malformed authorization header");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme", "Bearer token required");
    };

    match state.token_keys.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            unauthorized("invalid_token", "Invalid or expired token")
        }
    }
}
