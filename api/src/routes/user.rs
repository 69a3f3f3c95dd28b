//! Player initialization and profile endpoints

use super::require_fid;
use crate::{ApiResult, ApiState};
use axum::{extract::State, routing::post, Json, Router};
use rizz_engine::{InitOutcome, ProfileView};
use serde::Deserialize;

/// Register user routes
pub fn user_routes() -> Router<ApiState> {
    Router::new()
        .route("/init", post(init))
        .route("/profile", post(profile))
}

#[derive(Deserialize)]
struct InitRequest {
    fid: Option<u64>,
    username: Option<String>,
    pfp_url: Option<String>,
}

async fn init(
    State(state): State<ApiState>,
    Json(body): Json<InitRequest>,
) -> ApiResult<Json<InitOutcome>> {
    let fid = require_fid(body.fid, "fid")?;
    let outcome = state.engine.init_player(fid, body.username, body.pfp_url)?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
struct FidRequest {
    fid: Option<u64>,
}

async fn profile(
    State(state): State<ApiState>,
    Json(body): Json<FidRequest>,
) -> ApiResult<Json<ProfileView>> {
    let fid = require_fid(body.fid, "fid")?;
    Ok(Json(state.engine.profile(fid)?))
}
