//! Settlement engine
//!
//! Computes and commits the points a house earned since its last
//! settlement: baseline self-mining plus the guest and host shares of any
//! stays overlapping the window `[last_tick, now)`.

use crate::{Engine, EngineResult};
use chrono::{DateTime, Utc};
use rizz_economy::{hours_between, mining_rate, overlap_hours, stay_split};
use rizz_storage::House;
use serde::Serialize;
use tracing::{info, warn};

/// Earned-point breakdown for one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Earned {
    /// Self-mined points for the window.
    pub base: u64,
    /// Share drawn from hosts this identity stayed at.
    pub guest: u64,
    /// Share drawn from guests staying at this identity's house.
    pub host: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementOutcome {
    pub earned: Earned,
    pub house: House,
}

impl Engine {
    /// Settle a house's accrual window, committing the new balance and
    /// advancing `last_tick` to now. Idempotent with respect to elapsed
    /// time: an immediate second call earns zero.
    pub async fn settle(&self, fid: u64) -> EngineResult<SettlementOutcome> {
        let lock = self.house_lock(fid);
        let _guard = lock.lock().await;
        self.settle_window(fid, Utc::now())
    }

    /// Read-compute-write against the house row; caller must hold the
    /// fid's house lock.
    fn settle_window(&self, fid: u64, now: DateTime<Utc>) -> EngineResult<SettlementOutcome> {
        let house = self.require_house(fid)?;
        let window_start = house.last_tick;
        let window_end = now;

        let base_hours = hours_between(window_start, window_end);
        let base = (mining_rate(house.level) as f64 * base_hours).floor() as u64;

        // Open and closed stays alike: a closed stay can still hold
        // unsettled overlap when settlement has lagged behind it.
        let stays = self.db().stays_touching(fid)?;
        let split = stay_split();
        let mut guest_acc = 0.0f64;
        let mut host_acc = 0.0f64;

        if !stays.is_empty() {
            let host_fids: Vec<u64> = stays.iter().map(|s| s.host_fid).collect();
            let host_houses = self.db().houses_by_fids(&host_fids)?;

            for stay in &stays {
                let hours = overlap_hours(stay.start_at, stay.end_at, window_start, window_end);
                if hours <= 0.0 {
                    continue;
                }
                // Every host should have an initialized house; fall back
                // to level 1 rather than dropping the contribution.
                let host_level = match host_houses.get(&stay.host_fid) {
                    Some(h) => h.level,
                    None => {
                        warn!(stay = stay.id, host = stay.host_fid, "host house missing, assuming level 1");
                        1
                    }
                };
                let pot = mining_rate(host_level) as f64 * hours;
                if stay.guest_fid == fid {
                    guest_acc += pot * split.guest_share;
                }
                if stay.host_fid == fid {
                    host_acc += pot * split.host_share;
                }
            }
        }

        // Each income stream is summed in f64 and floored once, never
        // per stay and never only on the grand total.
        let guest = guest_acc.floor() as u64;
        let host = host_acc.floor() as u64;
        let total = base + guest + host;

        let mut updated = house;
        updated.rizz_point += total;
        updated.last_tick = now;
        updated.updated_at = now;
        self.db().put_house(&updated)?;

        info!(fid, base, guest, host, total, "settled house");

        Ok(SettlementOutcome {
            earned: Earned {
                base,
                guest,
                host,
                total,
            },
            house: updated,
        })
    }
}
