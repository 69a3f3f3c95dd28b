//! Rizz House Game Engine
//!
//! Settlement, upgrades, votes and stay lifecycle on top of the storage
//! layer. Every operation re-reads current rows before computing deltas;
//! the engine keeps no authoritative state between requests.
//!
//! Per-identity serialization: settlement, upgrade and vote-counter writes
//! to the same house row are guarded by an in-process async mutex keyed by
//! fid, so two concurrent settlements can never credit the same elapsed
//! window twice. Different fids proceed fully in parallel.

pub mod leaderboard;
pub mod players;
pub mod queries;
pub mod settlement;
pub mod stays;
pub mod upgrade;
pub mod votes;

pub use leaderboard::{RizzEntry, VoteEntry};
pub use players::{InitOutcome, ProfileStats, ProfileView};
pub use queries::{ExploreEntry, ExploreMode, HouseInfo, MiningStatus};
pub use settlement::{Earned, SettlementOutcome};
pub use stays::GuestInfo;

use dashmap::DashMap;
use rizz_economy::constants::MAX_LEVEL;
use rizz_storage::{GameDb, House, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("house not found for fid {0}")]
    HouseNotFound(u64),

    #[error("player not found for fid {0}")]
    PlayerNotFound(u64),

    #[error("max level reached ({MAX_LEVEL})")]
    MaxLevelReached,

    #[error("not enough rizz points: have {have}, need {cost}")]
    InsufficientPoints { cost: u64, have: u64 },

    #[error("already voted today")]
    AlreadyVotedToday,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The game engine. Cheap to clone; all clones share the database handle
/// and the per-fid lock registry.
#[derive(Clone)]
pub struct Engine {
    db: GameDb,
    house_locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
    stay_locks: Arc<DashMap<u64, Arc<Mutex<()>>>>,
}

impl Engine {
    pub fn new(db: GameDb) -> Self {
        Engine {
            db,
            house_locks: Arc::new(DashMap::new()),
            stay_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn db(&self) -> &GameDb {
        &self.db
    }

    /// Exclusive lock for one identity's house row. All read-compute-write
    /// sequences against the row must hold this for their full duration.
    fn house_lock(&self, fid: u64) -> Arc<Mutex<()>> {
        self.house_locks
            .entry(fid)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Exclusive lock for one guest's stay lifecycle. The close-then-insert
    /// in `start_stay` and the read-then-close in `stop_stay` must hold
    /// this, or two racing starts could leave a guest with two open stays.
    fn guest_lock(&self, fid: u64) -> Arc<Mutex<()>> {
        self.stay_locks
            .entry(fid)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn require_house(&self, fid: u64) -> EngineResult<House> {
        self.db
            .get_house(fid)?
            .ok_or(EngineError::HouseNotFound(fid))
    }
}
