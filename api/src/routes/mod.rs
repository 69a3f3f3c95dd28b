//! API routes organization
//!
//! This module contains all HTTP route definitions organized by domain:
//! - `house` - Settlement (claim), upgrades, votes, live mining status
//! - `stay` - Stay lifecycle and guest queries
//! - `user` - Player initialization and profiles
//! - `leaderboard` - Vote and point rankings
//!
//! Each submodule is responsible for its own domain and exports a router
//! function.

mod house;
mod leaderboard;
mod stay;
mod user;

use crate::ApiState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Create the main router with all API endpoints
pub fn create_routes() -> Router<ApiState> {
    Router::new()
        // Core application routes
        .route("/", get(root))
        .route("/health", get(health_check))
        // Domain-specific route groups
        .nest("/house", house::house_routes())
        .nest("/houses", house::houses_routes())
        .nest("/stay", stay::stay_routes())
        .nest("/user", user::user_routes())
        .nest("/leaderboard", leaderboard::leaderboard_routes())
}

/// Identity keys come in as optional JSON numbers; zero and absent are
/// both caller errors, rejected before any read or write.
pub(crate) fn require_fid(
    value: Option<u64>,
    field: &'static str,
) -> Result<u64, crate::ApiError> {
    match value {
        Some(fid) if fid > 0 => Ok(fid),
        _ => Err(crate::ApiError::MissingField(field)),
    }
}

// Root endpoints

async fn root() -> &'static str {
    "Rizz House API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<ApiState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::require_fid;
    use crate::ApiError;

    #[test]
    fn test_require_fid_rejects_missing_and_zero() {
        assert!(matches!(require_fid(None, "fid"), Err(ApiError::MissingField("fid"))));
        assert!(matches!(require_fid(Some(0), "fid"), Err(ApiError::MissingField("fid"))));
        assert_eq!(require_fid(Some(42), "fid").unwrap(), 42);
    }
}
