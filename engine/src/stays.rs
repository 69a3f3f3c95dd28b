//! Stay lifecycle
//!
//! A guest has at most one open stay; starting a new one force-closes
//! the previous stay first.

use crate::{Engine, EngineResult};
use chrono::{DateTime, Utc};
use rizz_storage::Stay;
use serde::Serialize;
use tracing::info;

/// Projection of an open stay from the host's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct GuestInfo {
    pub guest_fid: u64,
    pub username: Option<String>,
    pub start_at: DateTime<Utc>,
}

impl Engine {
    /// Start a stay for `guest_fid` at `host_fid`'s house, closing any
    /// prior open stay for the guest first.
    pub async fn start_stay(&self, guest_fid: u64, host_fid: u64) -> EngineResult<Stay> {
        let lock = self.guest_lock(guest_fid);
        let _guard = lock.lock().await;

        // Hosts always have an initialized house.
        self.require_house(host_fid)?;

        let now = Utc::now();
        if let Some(mut open) = self.db().open_stay_for_guest(guest_fid)? {
            open.end_at = Some(now);
            self.db().put_stay(&open)?;
            info!(guest_fid, prior = open.id, "closed prior open stay");
        }

        let stay = Stay {
            id: self.db().allocate_stay_id()?,
            guest_fid,
            host_fid,
            start_at: now,
            end_at: None,
        };
        self.db().put_stay(&stay)?;

        info!(guest_fid, host_fid, stay = stay.id, "stay started");
        Ok(stay)
    }

    /// Stop the guest's open stay. Returns `None` when there is nothing
    /// to stop; that is not an error.
    pub async fn stop_stay(&self, guest_fid: u64) -> EngineResult<Option<Stay>> {
        let lock = self.guest_lock(guest_fid);
        let _guard = lock.lock().await;

        let Some(mut open) = self.db().open_stay_for_guest(guest_fid)? else {
            return Ok(None);
        };
        open.end_at = Some(Utc::now());
        self.db().put_stay(&open)?;

        info!(guest_fid, stay = open.id, "stay stopped");
        Ok(Some(open))
    }

    pub fn current_stay(&self, guest_fid: u64) -> EngineResult<Option<Stay>> {
        Ok(self.db().open_stay_for_guest(guest_fid)?)
    }

    /// Number of guests currently staying at a host's house.
    pub fn guest_count(&self, host_fid: u64) -> EngineResult<u64> {
        Ok(self.db().count_open_stays_for_host(host_fid)?)
    }

    /// Open stays at a host's house, joined to guest usernames.
    pub fn guests_of(&self, host_fid: u64) -> EngineResult<Vec<GuestInfo>> {
        let stays = self.db().open_stays_for_host(host_fid)?;
        let guest_fids: Vec<u64> = stays.iter().map(|s| s.guest_fid).collect();
        let players = self.db().players_by_fids(&guest_fids)?;

        Ok(stays
            .into_iter()
            .map(|stay| GuestInfo {
                guest_fid: stay.guest_fid,
                username: players
                    .get(&stay.guest_fid)
                    .and_then(|p| p.username.clone()),
                start_at: stay.start_at,
            })
            .collect())
    }
}
