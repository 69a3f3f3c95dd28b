//! Vote ledger
//!
//! One vote per voter per UTC calendar day, plus a denormalized counter
//! on the target house.

use crate::{Engine, EngineError, EngineResult};
use chrono::Utc;
use rizz_storage::Vote;
use tracing::info;

impl Engine {
    /// Record a vote for `host_fid`. The conditional insert on
    /// (voter, date) is the uniqueness guarantee; the counter increment
    /// happens after it, and a failure there is surfaced to the caller
    /// rather than swallowed.
    pub async fn vote(&self, voter_fid: u64, host_fid: u64) -> EngineResult<()> {
        let today = Utc::now().date_naive();

        // Counter increment rewrites the host's house row, so it takes
        // the same lock settlement does.
        let lock = self.house_lock(host_fid);
        let _guard = lock.lock().await;

        let house = self.require_house(host_fid)?;

        let vote = Vote {
            voter_fid,
            host_fid,
            voted_at: today,
        };
        if !self.db().try_insert_vote(&vote)? {
            return Err(EngineError::AlreadyVotedToday);
        }

        let mut updated = house;
        updated.total_votes += 1;
        updated.updated_at = Utc::now();
        self.db().put_house(&updated)?;

        info!(voter_fid, host_fid, "vote recorded");
        Ok(())
    }
}
