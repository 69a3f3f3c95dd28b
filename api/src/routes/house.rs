//! House endpoints: settlement, upgrades, votes and projections

use super::require_fid;
use crate::{ApiResult, ApiState};
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use rizz_engine::{ExploreEntry, ExploreMode, HouseInfo, MiningStatus, SettlementOutcome};
use rizz_storage::House;
use serde::{Deserialize, Serialize};

/// Register house routes
pub fn house_routes() -> Router<ApiState> {
    Router::new()
        .route("/claim", post(claim))
        .route("/upgrade", post(upgrade))
        .route("/vote", post(vote))
        .route("/mining", post(mining))
        .route("/info", post(info))
}

/// Register house discovery routes
pub fn houses_routes() -> Router<ApiState> {
    Router::new().route("/explore", post(explore))
}

#[derive(Deserialize)]
struct FidRequest {
    fid: Option<u64>,
}

async fn claim(
    State(state): State<ApiState>,
    Json(body): Json<FidRequest>,
) -> ApiResult<Json<SettlementOutcome>> {
    let fid = require_fid(body.fid, "fid")?;
    let outcome = state.engine.settle(fid).await?;
    Ok(Json(outcome))
}

#[derive(Serialize)]
struct UpgradeResponse {
    house: House,
}

async fn upgrade(
    State(state): State<ApiState>,
    Json(body): Json<FidRequest>,
) -> ApiResult<Json<UpgradeResponse>> {
    let fid = require_fid(body.fid, "fid")?;
    let house = state.engine.upgrade(fid).await?;
    Ok(Json(UpgradeResponse { house }))
}

#[derive(Deserialize)]
struct VoteRequest {
    voter_fid: Option<u64>,
    host_fid: Option<u64>,
}

#[derive(Serialize)]
struct VoteResponse {
    success: bool,
}

async fn vote(
    State(state): State<ApiState>,
    Json(body): Json<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let voter_fid = require_fid(body.voter_fid, "voter_fid")?;
    let host_fid = require_fid(body.host_fid, "host_fid")?;
    state.engine.vote(voter_fid, host_fid).await?;
    Ok(Json(VoteResponse { success: true }))
}

async fn mining(
    State(state): State<ApiState>,
    Json(body): Json<FidRequest>,
) -> ApiResult<Json<MiningStatus>> {
    let fid = require_fid(body.fid, "fid")?;
    Ok(Json(state.engine.mining_status(fid)?))
}

#[derive(Serialize)]
struct InfoResponse {
    house: HouseInfo,
}

async fn info(
    State(state): State<ApiState>,
    Json(body): Json<FidRequest>,
) -> ApiResult<Json<InfoResponse>> {
    let fid = require_fid(body.fid, "fid")?;
    Ok(Json(InfoResponse {
        house: state.engine.house_info(fid)?,
    }))
}

#[derive(Deserialize)]
struct ExploreRequest {
    #[serde(default)]
    mode: ExploreMode,
    exclude_fid: Option<u64>,
}

#[derive(Serialize)]
struct ExploreResponse {
    houses: Vec<ExploreEntry>,
}

async fn explore(
    State(state): State<ApiState>,
    Json(body): Json<ExploreRequest>,
) -> ApiResult<Json<ExploreResponse>> {
    let houses = state.engine.explore_houses(body.mode, body.exclude_fid)?;
    Ok(Json(ExploreResponse { houses }))
}
