//! API Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rizz_engine::EngineError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("{0} not found")]
    NotFound(String),

    #[error("max level reached")]
    MaxLevelReached,

    #[error("not enough rizz points: have {have}, need {cost}")]
    InsufficientPoints { cost: u64, have: u64 },

    #[error("already voted today")]
    AlreadyVotedToday,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::HouseNotFound(fid) => ApiError::NotFound(format!("house for fid {}", fid)),
            EngineError::PlayerNotFound(fid) => {
                ApiError::NotFound(format!("player for fid {}", fid))
            }
            EngineError::MaxLevelReached => ApiError::MaxLevelReached,
            EngineError::InsufficientPoints { cost, have } => {
                ApiError::InsufficientPoints { cost, have }
            }
            EngineError::AlreadyVotedToday => ApiError::AlreadyVotedToday,
            EngineError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                "missing_field",
                format!("Missing field: {}", field),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} not found", what),
            ),
            ApiError::MaxLevelReached => (
                StatusCode::BAD_REQUEST,
                "max_level",
                "Max level reached (10)".to_string(),
            ),
            ApiError::InsufficientPoints { cost, have } => (
                StatusCode::BAD_REQUEST,
                "insufficient_points",
                format!("Not enough Rizz Points: have {}, need {}", have, cost),
            ),
            ApiError::AlreadyVotedToday => (
                StatusCode::BAD_REQUEST,
                "already_voted",
                "Already voted today".to_string(),
            ),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let mut body = json!({
            "error": error_type,
            "message": message,
        });
        // Callers disable the upgrade button off this
        if let ApiError::InsufficientPoints { cost, .. } = &self {
            body["cost"] = json!(cost);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_api_kinds() {
        let err: ApiError = EngineError::HouseNotFound(5).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = EngineError::InsufficientPoints { cost: 425, have: 10 }.into();
        match err {
            ApiError::InsufficientPoints { cost, have } => {
                assert_eq!(cost, 425);
                assert_eq!(have, 10);
            }
            other => panic!("unexpected mapping: {}", other),
        }

        let err: ApiError = EngineError::AlreadyVotedToday.into();
        assert!(matches!(err, ApiError::AlreadyVotedToday));
    }

    #[test]
    fn test_insufficient_points_response_carries_cost() {
        let response = ApiError::InsufficientPoints { cost: 425, have: 10 }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
