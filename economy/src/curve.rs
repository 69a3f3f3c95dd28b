//! Level-based rate and cost curves

use crate::constants::{GUEST_SHARE, HOST_SHARE, MAX_LEVEL};
use serde::{Deserialize, Serialize};

/// Points mined per hour at a given house level.
///
/// `8 + floor(level * 1.5)`, strictly increasing for level >= 1.
pub fn mining_rate(level: u32) -> u64 {
    8 + (level as u64 * 3) / 2
}

/// Cost to advance from `level` to `level + 1`.
///
/// `50 + floor(level^2 * 5) + level * 50`, strictly increasing.
pub fn upgrade_cost(level: u32) -> u64 {
    let level = level as u64;
    50 + level * level * 5 + level * 50
}

/// Cost of the next upgrade, or `None` once the level cap is reached.
pub fn next_upgrade_cost(level: u32) -> Option<u64> {
    if level >= MAX_LEVEL {
        None
    } else {
        Some(upgrade_cost(level))
    }
}

/// How a host's mining yield is divided during an overlapping stay.
///
/// The host share is paid on top of the host's own baseline mining,
/// not in place of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaySplit {
    pub guest_share: f64,
    pub host_share: f64,
}

pub fn stay_split() -> StaySplit {
    StaySplit {
        guest_share: GUEST_SHARE,
        host_share: HOST_SHARE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mining_rate_matches_curve() {
        assert_eq!(mining_rate(1), 9);
        assert_eq!(mining_rate(2), 11);
        assert_eq!(mining_rate(3), 12);
        assert_eq!(mining_rate(10), 23);
    }

    #[test]
    fn upgrade_cost_matches_curve() {
        assert_eq!(upgrade_cost(1), 105);
        assert_eq!(upgrade_cost(2), 170);
        assert_eq!(upgrade_cost(5), 425);
        assert_eq!(upgrade_cost(9), 905);
    }

    #[test]
    fn curves_strictly_increase() {
        for level in 1..MAX_LEVEL {
            assert!(mining_rate(level + 1) > mining_rate(level));
            assert!(upgrade_cost(level + 1) > upgrade_cost(level));
        }
    }

    #[test]
    fn no_upgrade_past_max_level() {
        assert_eq!(next_upgrade_cost(9), Some(upgrade_cost(9)));
        assert_eq!(next_upgrade_cost(10), None);
        assert_eq!(next_upgrade_cost(11), None);
    }

    #[test]
    fn split_sums_to_one() {
        let split = stay_split();
        assert_eq!(split.guest_share, 0.8);
        assert_eq!(split.host_share, 0.2);
        assert!((split.guest_share + split.host_share - 1.0).abs() < f64::EPSILON);
    }
}
