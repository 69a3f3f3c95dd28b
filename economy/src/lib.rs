//! Rizz House Economy Module
//!
//! Implements the economic model including:
//! - Mining rate and upgrade cost curves
//! - Guest/host split for stays
//! - Settlement window overlap arithmetic

pub mod curve;
pub mod overlap;

pub use curve::{mining_rate, next_upgrade_cost, stay_split, upgrade_cost, StaySplit};
pub use overlap::{hours_between, overlap_hours};

/// Economic constants
pub mod constants {
    /// Highest house level; `upgrade_cost` is undefined beyond it
    pub const MAX_LEVEL: u32 = 10;

    /// Fraction of a host's yield credited to a guest during a stay
    pub const GUEST_SHARE: f64 = 0.8;

    /// Fraction of a host's yield credited back to the host during a stay
    pub const HOST_SHARE: f64 = 0.2;

    /// Milliseconds per hour, used for wall-clock overlap arithmetic
    pub const MS_PER_HOUR: f64 = 3_600_000.0;
}
