//! Read-only projections of houses
//!
//! Live point projections never commit anything; settlement is the only
//! writer of `last_tick`.

use crate::{Engine, EngineResult};
use chrono::{DateTime, Utc};
use rizz_economy::hours_between;
use serde::{Deserialize, Serialize};

const EXPLORE_LIMIT: usize = 30;

/// Live view of a house's accrual without settling it.
#[derive(Debug, Clone, Serialize)]
pub struct MiningStatus {
    /// Settled balance plus self-mined points accrued since `last_tick`.
    pub current_points: u64,
    pub rizz_point: u64,
    pub mining_rate: u64,
    pub last_tick: DateTime<Utc>,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HouseInfo {
    pub level: u32,
    pub total_votes: u64,
}

/// Sort order for house discovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExploreMode {
    #[default]
    Popular,
    Level,
    /// No recent-vote window yet; sorts by total votes like `Popular`.
    Trending,
    /// No follower data; sorts by fid as a rough proxy.
    Followers,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploreEntry {
    pub fid: u64,
    pub level: u32,
    pub total_votes: u64,
    pub username: Option<String>,
    pub pfp_url: Option<String>,
}

impl Engine {
    /// Live projection of a house's points, self-mining only.
    pub fn mining_status(&self, fid: u64) -> EngineResult<MiningStatus> {
        let house = self.require_house(fid)?;
        let now = Utc::now();
        let mined =
            (house.mining_rate as f64 * hours_between(house.last_tick, now)).floor() as u64;

        Ok(MiningStatus {
            current_points: house.rizz_point + mined,
            rizz_point: house.rizz_point,
            mining_rate: house.mining_rate,
            last_tick: house.last_tick,
            level: house.level,
        })
    }

    pub fn house_info(&self, fid: u64) -> EngineResult<HouseInfo> {
        let house = self.require_house(fid)?;
        Ok(HouseInfo {
            level: house.level,
            total_votes: house.total_votes,
        })
    }

    /// Houses to visit, ordered per `mode`, joined to player metadata.
    pub fn explore_houses(
        &self,
        mode: ExploreMode,
        exclude_fid: Option<u64>,
    ) -> EngineResult<Vec<ExploreEntry>> {
        let mut houses = self.db().all_houses()?;
        if let Some(excluded) = exclude_fid {
            houses.retain(|h| h.fid != excluded);
        }

        match mode {
            ExploreMode::Popular | ExploreMode::Trending => {
                houses.sort_by(|a, b| b.total_votes.cmp(&a.total_votes));
            }
            ExploreMode::Level => houses.sort_by(|a, b| b.level.cmp(&a.level)),
            ExploreMode::Followers => houses.sort_by(|a, b| b.fid.cmp(&a.fid)),
        }
        houses.truncate(EXPLORE_LIMIT);

        let fids: Vec<u64> = houses.iter().map(|h| h.fid).collect();
        let players = self.db().players_by_fids(&fids)?;

        Ok(houses
            .into_iter()
            .map(|house| {
                let player = players.get(&house.fid);
                ExploreEntry {
                    fid: house.fid,
                    level: house.level,
                    total_votes: house.total_votes,
                    username: player.and_then(|p| p.username.clone()),
                    pfp_url: player.and_then(|p| p.pfp_url.clone()),
                }
            })
            .collect())
    }
}
