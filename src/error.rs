use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    InsufficientData,
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("player not found")]
    PlayerNotFound,

    #[error("player already exists")]
    PlayerAlreadyExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session not found")]
    SessionNotFound,

    #[error("question not found")]
    QuestionNotFound,

    #[error("assigned category not found: {0}")]
    CategoryNotFound(String),

    #[error("node not found")]
    NodeNotFound,

    #[error("question already answered")]
    AlreadyAnswered,

    #[error("session was modified concurrently")]
    SessionConflict,

    #[error("session expired")]
    SessionExpired,

    #[error("session expired or finished")]
    SessionInactive,

    #[error("invalid node number {0} for session")]
    InvalidNodeNumber(i32),

    #[error("insufficient general categories available: {available} of {required}")]
    InsufficientCategories { available: usize, required: usize },

    #[error("insufficient questions in category: {available} of {required}")]
    InsufficientQuestions { available: usize, required: usize },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::PlayerNotFound
            | GameError::SessionNotFound
            | GameError::QuestionNotFound
            | GameError::CategoryNotFound(_)
            | GameError::NodeNotFound => ErrorKind::NotFound,
            GameError::PlayerAlreadyExists
            | GameError::AlreadyAnswered
            | GameError::SessionConflict => ErrorKind::Conflict,
            GameError::SessionExpired
            | GameError::SessionInactive
            | GameError::InvalidNodeNumber(_) => ErrorKind::InvalidState,
            GameError::InsufficientCategories { .. } | GameError::InsufficientQuestions { .. } => {
                ErrorKind::InsufficientData
            }
            GameError::InvalidCredentials => ErrorKind::Unauthorized,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GameError::PlayerNotFound => "player_not_found",
            GameError::PlayerAlreadyExists => "player_already_exists",
            GameError::InvalidCredentials => "invalid_credentials",
            GameError::SessionNotFound => "session_not_found",
            GameError::QuestionNotFound => "question_not_found",
            GameError::CategoryNotFound(_) => "category_not_found",
            GameError::NodeNotFound => "node_not_found",
            GameError::AlreadyAnswered => "already_answered",
            GameError::SessionConflict => "session_conflict",
            GameError::SessionExpired => "session_expired",
            GameError::SessionInactive => "session_inactive",
            GameError::InvalidNodeNumber(_) => "invalid_node_number",
            GameError::InsufficientCategories { .. } => "insufficient_categories",
            GameError::InsufficientQuestions { .. } => "insufficient_questions",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            Error::Game(err) => {
                let status = match err.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                    ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::InsufficientData => StatusCode::SERVICE_UNAVAILABLE,
                    ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                };
                (status, err.code(), err.to_string())
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, "validation_failed", err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "bad_request", err.to_string()),
            Error::Token(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired token".to_string(),
            ),
            other => {
                tracing::error!(error = ?other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": code, "message": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(err.to_string())
    }
}
