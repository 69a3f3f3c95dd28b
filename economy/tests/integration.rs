use chrono::{Duration, TimeZone, Utc};
use rizz_economy::*;

#[test]
fn test_curve_table() {
    // Level 1 house mines 9/hr; cap at level 10 mines 23/hr
    assert_eq!(mining_rate(1), 9);
    assert_eq!(mining_rate(10), 23);

    // First upgrade costs 105, last affordable upgrade (9 -> 10) costs 905
    assert_eq!(upgrade_cost(1), 105);
    assert_eq!(upgrade_cost(9), 905);
    assert_eq!(next_upgrade_cost(10), None);
}

#[test]
fn test_stay_yield_over_window() {
    // A guest staying 2.5h at a level-4 host draws 80% of the host pot
    let window_start = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
    let window_end = window_start + Duration::hours(4);
    let stay_start = window_start + Duration::minutes(30);
    let stay_end = stay_start + Duration::hours(2) + Duration::minutes(30);

    let hours = overlap_hours(stay_start, Some(stay_end), window_start, window_end);
    assert!((hours - 2.5).abs() < 1e-9);

    let pot = mining_rate(4) as f64 * hours;
    let split = stay_split();
    assert_eq!((pot * split.guest_share).floor() as u64, 28);
    assert_eq!((pot * split.host_share).floor() as u64, 7);
}

#[test]
fn test_zero_width_window_yields_nothing() {
    let now = Utc::now();
    assert_eq!(hours_between(now, now), 0.0);
    assert_eq!(overlap_hours(now - Duration::hours(1), None, now, now), 0.0);
}
