//! Typed row shapes for every persisted entity
//!
//! Every store read is decoded into one of these records before use;
//! malformed rows fail fast as codec errors instead of flowing onward.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A player's house: level, settled balance and settlement cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub fid: u64,
    pub level: u32,
    /// Settled balance. Only ever decreases by an exact upgrade cost.
    pub rizz_point: u64,
    /// Points per hour. Redundant derivation of `level`, persisted for
    /// cheap leaderboard reads; must match the curve after every write.
    pub mining_rate: u64,
    pub total_votes: u64,
    /// Timestamp of the last settlement; accrual windows start here.
    pub last_tick: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl House {
    pub fn new(fid: u64, mining_rate: u64, now: DateTime<Utc>) -> Self {
        House {
            fid,
            level: 1,
            rizz_point: 0,
            mining_rate,
            total_votes: 0,
            last_tick: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A guest occupying a host's house. `end_at = None` means still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stay {
    pub id: u64,
    pub guest_fid: u64,
    pub host_fid: u64,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
}

impl Stay {
    pub fn is_open(&self) -> bool {
        self.end_at.is_none()
    }
}

/// One voter's daily vote for a host. Unique per (voter, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_fid: u64,
    pub host_fid: u64,
    /// Calendar date (UTC), not a timestamp.
    pub voted_at: NaiveDate,
}

/// Identity metadata cache, refreshed on every init call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub fid: u64,
    pub username: Option<String>,
    pub pfp_url: Option<String>,
    pub last_seen: DateTime<Utc>,
}
