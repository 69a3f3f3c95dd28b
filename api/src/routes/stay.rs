//! Stay lifecycle endpoints

use super::require_fid;
use crate::{ApiResult, ApiState};
use axum::{extract::State, routing::post, Json, Router};
use rizz_engine::GuestInfo;
use rizz_storage::Stay;
use serde::{Deserialize, Serialize};

/// Register stay routes
pub fn stay_routes() -> Router<ApiState> {
    Router::new()
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/current", post(current))
        .route("/guests", post(guest_count))
        .route("/my-guests", post(my_guests))
}

#[derive(Deserialize)]
struct StartRequest {
    guest_fid: Option<u64>,
    host_fid: Option<u64>,
}

#[derive(Serialize)]
struct StayResponse {
    stay: Stay,
}

async fn start(
    State(state): State<ApiState>,
    Json(body): Json<StartRequest>,
) -> ApiResult<Json<StayResponse>> {
    let guest_fid = require_fid(body.guest_fid, "guest_fid")?;
    let host_fid = require_fid(body.host_fid, "host_fid")?;
    let stay = state.engine.start_stay(guest_fid, host_fid).await?;
    Ok(Json(StayResponse { stay }))
}

#[derive(Deserialize)]
struct GuestRequest {
    guest_fid: Option<u64>,
}

#[derive(Serialize)]
struct StopResponse {
    stopped: bool,
    stay: Option<Stay>,
}

async fn stop(
    State(state): State<ApiState>,
    Json(body): Json<GuestRequest>,
) -> ApiResult<Json<StopResponse>> {
    let guest_fid = require_fid(body.guest_fid, "guest_fid")?;
    let stay = state.engine.stop_stay(guest_fid).await?;
    Ok(Json(StopResponse {
        stopped: true,
        stay,
    }))
}

#[derive(Serialize)]
struct CurrentResponse {
    stay: Option<Stay>,
}

async fn current(
    State(state): State<ApiState>,
    Json(body): Json<GuestRequest>,
) -> ApiResult<Json<CurrentResponse>> {
    let guest_fid = require_fid(body.guest_fid, "guest_fid")?;
    Ok(Json(CurrentResponse {
        stay: state.engine.current_stay(guest_fid)?,
    }))
}

#[derive(Deserialize)]
struct HostRequest {
    host_fid: Option<u64>,
}

#[derive(Serialize)]
struct GuestCountResponse {
    count: u64,
}

async fn guest_count(
    State(state): State<ApiState>,
    Json(body): Json<HostRequest>,
) -> ApiResult<Json<GuestCountResponse>> {
    let host_fid = require_fid(body.host_fid, "host_fid")?;
    Ok(Json(GuestCountResponse {
        count: state.engine.guest_count(host_fid)?,
    }))
}

#[derive(Serialize)]
struct MyGuestsResponse {
    guests: Vec<GuestInfo>,
}

async fn my_guests(
    State(state): State<ApiState>,
    Json(body): Json<HostRequest>,
) -> ApiResult<Json<MyGuestsResponse>> {
    let host_fid = require_fid(body.host_fid, "host_fid")?;
    Ok(Json(MyGuestsResponse {
        guests: state.engine.guests_of(host_fid)?,
    }))
}
