//! Player registry
//!
//! Identity metadata is supplied by the caller (an external identity
//! provider resolves it) and cached here; the house is created on first
//! contact.

use crate::{Engine, EngineError, EngineResult};
use chrono::Utc;
use rizz_economy::mining_rate;
use rizz_storage::{House, Player};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct InitOutcome {
    pub player: Player,
    pub house: House,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProfileStats {
    pub total_votes_given: u64,
    pub total_stays: u64,
    pub current_guests: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub player: Player,
    pub house: House,
    pub stats: ProfileStats,
}

impl Engine {
    /// Upsert the player's metadata and create their house if absent
    /// (level 1, zero balance, settlement window starting now).
    pub fn init_player(
        &self,
        fid: u64,
        username: Option<String>,
        pfp_url: Option<String>,
    ) -> EngineResult<InitOutcome> {
        let now = Utc::now();
        let player = Player {
            fid,
            username,
            pfp_url,
            last_seen: now,
        };
        self.db().put_player(&player)?;

        let house = match self.db().get_house(fid)? {
            Some(house) => house,
            None => {
                let house = House::new(fid, mining_rate(1), now);
                self.db().put_house(&house)?;
                info!(fid, "created house");
                house
            }
        };

        Ok(InitOutcome { player, house })
    }

    pub fn profile(&self, fid: u64) -> EngineResult<ProfileView> {
        let player = self
            .db()
            .get_player(fid)?
            .ok_or(EngineError::PlayerNotFound(fid))?;
        let house = self.require_house(fid)?;

        let stats = ProfileStats {
            total_votes_given: self.db().count_votes_by_voter(fid)?,
            total_stays: self.db().count_stays_as_guest(fid)?,
            current_guests: self.db().count_open_stays_for_host(fid)?,
        };

        Ok(ProfileView {
            player,
            house,
            stats,
        })
    }
}
