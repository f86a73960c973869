//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qttt_core::{GameError, ParseError, RulesError};
use serde_json::json;

/// Error returned by a handler as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn no_session() -> Self {
        Self::new(StatusCode::NOT_FOUND, "no game in progress, POST /api/game/start first")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match err {
            GameError::IllegalMove { .. } | GameError::BoardShape { .. } => StatusCode::BAD_REQUEST,
            GameError::NotYourTurn { .. } | GameError::GameOver(_) | GameError::NoLegalMove => {
                StatusCode::CONFLICT
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl From<RulesError> for ApiError {
    fn from(err: RulesError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}
