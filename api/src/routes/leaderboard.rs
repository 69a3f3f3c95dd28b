//! Leaderboard endpoints

use crate::{ApiResult, ApiState};
use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;
use rizz_engine::{RizzEntry, VoteEntry};
use serde::Serialize;

/// Register leaderboard routes
pub fn leaderboard_routes() -> Router<ApiState> {
    Router::new()
        .route("/alltime", get(alltime))
        .route("/weekly", get(weekly))
        .route("/top-rizz", get(top_rizz))
}

#[derive(Serialize)]
struct VoteLeaderboardResponse {
    leaderboard: Vec<VoteEntry>,
}

async fn alltime(State(state): State<ApiState>) -> ApiResult<Json<VoteLeaderboardResponse>> {
    Ok(Json(VoteLeaderboardResponse {
        leaderboard: state.engine.votes_alltime()?,
    }))
}

#[derive(Serialize)]
struct WeeklyLeaderboardResponse {
    leaderboard: Vec<VoteEntry>,
    from: NaiveDate,
}

async fn weekly(State(state): State<ApiState>) -> ApiResult<Json<WeeklyLeaderboardResponse>> {
    let (leaderboard, from) = state.engine.votes_weekly()?;
    Ok(Json(WeeklyLeaderboardResponse { leaderboard, from }))
}

#[derive(Serialize)]
struct RizzLeaderboardResponse {
    leaderboard: Vec<RizzEntry>,
}

async fn top_rizz(State(state): State<ApiState>) -> ApiResult<Json<RizzLeaderboardResponse>> {
    Ok(Json(RizzLeaderboardResponse {
        leaderboard: state.engine.top_rizz()?,
    }))
}
