//! Upgrade engine
//!
//! Advances a house one level when the projected balance covers the cost.
//! Projection folds in self-mining accrued since `last_tick` only; pending
//! stay income is intentionally excluded from affordability.

use crate::{Engine, EngineError, EngineResult};
use chrono::Utc;
use rizz_economy::constants::MAX_LEVEL;
use rizz_economy::{hours_between, mining_rate, upgrade_cost};
use rizz_storage::House;
use tracing::info;

impl Engine {
    /// Upgrade a house by exactly one level, debiting the upgrade cost
    /// from the projected balance and resetting the settlement window.
    pub async fn upgrade(&self, fid: u64) -> EngineResult<House> {
        let lock = self.house_lock(fid);
        let _guard = lock.lock().await;

        let house = self.require_house(fid)?;
        if house.level >= MAX_LEVEL {
            return Err(EngineError::MaxLevelReached);
        }

        let now = Utc::now();
        // The upgrade may consume unclaimed self-mined points without a
        // separate claim first, so accrue them into the balance here. The
        // window resets below, so they are never credited twice.
        let accrued =
            (mining_rate(house.level) as f64 * hours_between(house.last_tick, now)).floor() as u64;
        let projected = house.rizz_point + accrued;

        let cost = upgrade_cost(house.level);
        if projected < cost {
            return Err(EngineError::InsufficientPoints {
                cost,
                have: projected,
            });
        }

        let mut updated = house;
        updated.level += 1;
        updated.mining_rate = mining_rate(updated.level);
        updated.rizz_point = projected - cost;
        updated.last_tick = now;
        updated.updated_at = now;
        self.db().put_house(&updated)?;

        info!(fid, level = updated.level, cost, "upgraded house");

        Ok(updated)
    }
}
