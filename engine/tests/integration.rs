use chrono::{Duration, Utc};
use rizz_economy::{mining_rate, upgrade_cost};
use rizz_engine::{Engine, EngineError};
use rizz_storage::{GameDb, House, Stay, Vote};
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::Barrier;

fn engine() -> (tempfile::TempDir, Engine) {
    let dir = tempdir().unwrap();
    let db = GameDb::open(dir.path()).unwrap();
    (dir, Engine::new(db))
}

/// Seed a house whose settlement window opened `hours_ago` hours ago.
fn seed_house(engine: &Engine, fid: u64, level: u32, rizz_point: u64, hours_ago: i64) -> House {
    let now = Utc::now();
    let mut house = House::new(fid, mining_rate(level), now - Duration::hours(hours_ago));
    house.level = level;
    house.rizz_point = rizz_point;
    engine.db().put_house(&house).unwrap();
    house
}

#[tokio::test]
async fn test_settlement_self_mining_only() {
    let (_dir, engine) = engine();
    // Level 3 house, rate 12, window opened 2 hours ago, balance 100
    seed_house(&engine, 10, 3, 100, 2);

    let outcome = engine.settle(10).await.unwrap();
    assert_eq!(outcome.earned.base, 24);
    assert_eq!(outcome.earned.guest, 0);
    assert_eq!(outcome.earned.host, 0);
    assert_eq!(outcome.earned.total, 24);
    assert_eq!(outcome.house.rizz_point, 124);
    assert!(outcome.house.last_tick > outcome.house.created_at);
}

#[tokio::test]
async fn test_settlement_is_idempotent_back_to_back() {
    let (_dir, engine) = engine();
    seed_house(&engine, 11, 2, 50, 3);

    let first = engine.settle(11).await.unwrap();
    assert!(first.earned.total > 0);

    let second = engine.settle(11).await.unwrap();
    assert_eq!(second.earned.total, 0);
    assert_eq!(second.house.rizz_point, first.house.rizz_point);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_settlements_credit_window_once() {
    let (_dir, engine) = engine();
    // Level 3 house, rate 12, 2 hours unsettled: exactly one of the
    // racing calls may earn the 24 points, the rest settle a zero-width
    // window.
    seed_house(&engine, 12, 3, 100, 2);

    let barrier = Arc::new(Barrier::new(8));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let (e, b) = (engine.clone(), barrier.clone());
        handles.push(tokio::spawn(async move {
            b.wait().await;
            e.settle(12).await.unwrap().earned.total
        }));
    }

    let mut credited = 0;
    for handle in handles {
        credited += handle.await.unwrap();
    }

    assert_eq!(credited, 24);
    let house = engine.db().get_house(12).unwrap().unwrap();
    assert_eq!(house.rizz_point, 124);
}

#[tokio::test]
async fn test_settlement_splits_stay_income() {
    let (_dir, engine) = engine();
    // Guest at level 1 (rate 9), host at level 4 (rate 14), stay open
    // for the whole 2-hour window.
    let guest = seed_house(&engine, 20, 1, 0, 2);
    let host = seed_house(&engine, 21, 4, 0, 2);
    let stay = Stay {
        id: engine.db().allocate_stay_id().unwrap(),
        guest_fid: guest.fid,
        host_fid: host.fid,
        start_at: Utc::now() - Duration::hours(2),
        end_at: None,
    };
    engine.db().put_stay(&stay).unwrap();

    // Guest: base floor(9*2) = 18, guest share floor(14*2*0.8) = 22
    let guest_outcome = engine.settle(guest.fid).await.unwrap();
    assert_eq!(guest_outcome.earned.base, 18);
    assert_eq!(guest_outcome.earned.guest, 22);
    assert_eq!(guest_outcome.earned.host, 0);
    assert_eq!(guest_outcome.earned.total, 40);

    // Host: base floor(14*2) = 28, host share floor(14*2*0.2) = 5
    let host_outcome = engine.settle(host.fid).await.unwrap();
    assert_eq!(host_outcome.earned.base, 28);
    assert_eq!(host_outcome.earned.guest, 0);
    assert_eq!(host_outcome.earned.host, 5);
    assert_eq!(host_outcome.earned.total, 33);
}

#[tokio::test]
async fn test_settlement_defaults_missing_host_to_level_one() {
    let (_dir, engine) = engine();
    let guest = seed_house(&engine, 30, 1, 0, 2);
    // Host fid 31 has no house row; the stay still pays at level 1.
    let stay = Stay {
        id: engine.db().allocate_stay_id().unwrap(),
        guest_fid: guest.fid,
        host_fid: 31,
        start_at: Utc::now() - Duration::hours(2),
        end_at: None,
    };
    engine.db().put_stay(&stay).unwrap();

    let outcome = engine.settle(guest.fid).await.unwrap();
    // guest share floor(9*2*0.8) = 14
    assert_eq!(outcome.earned.guest, 14);
}

#[tokio::test]
async fn test_settlement_ignores_stays_outside_window() {
    let (_dir, engine) = engine();
    let guest = seed_house(&engine, 40, 1, 0, 1);
    // Closed long before the window opened
    let stay = Stay {
        id: engine.db().allocate_stay_id().unwrap(),
        guest_fid: guest.fid,
        host_fid: 41,
        start_at: Utc::now() - Duration::hours(10),
        end_at: Some(Utc::now() - Duration::hours(5)),
    };
    engine.db().put_stay(&stay).unwrap();

    let outcome = engine.settle(guest.fid).await.unwrap();
    assert_eq!(outcome.earned.guest, 0);
    assert_eq!(outcome.earned.total, outcome.earned.base);
}

#[tokio::test]
async fn test_settlement_requires_house() {
    let (_dir, engine) = engine();
    assert!(matches!(
        engine.settle(999).await,
        Err(EngineError::HouseNotFound(999))
    ));
}

#[tokio::test]
async fn test_upgrade_with_exact_balance() {
    let (_dir, engine) = engine();
    seed_house(&engine, 50, 5, upgrade_cost(5), 0);

    let house = engine.upgrade(50).await.unwrap();
    assert_eq!(house.level, 6);
    assert_eq!(house.rizz_point, 0);
    assert_eq!(house.mining_rate, mining_rate(6));
}

#[tokio::test]
async fn test_upgrade_consumes_unclaimed_accrual() {
    let (_dir, engine) = engine();
    // Level 1, rate 9, 12 hours unclaimed: projected = 0 + 108 > 105
    seed_house(&engine, 51, 1, 0, 12);

    let house = engine.upgrade(51).await.unwrap();
    assert_eq!(house.level, 2);
    // 108 accrued minus cost 105; a sliver more may accrue before the
    // call lands, never less.
    assert!(house.rizz_point >= 3);
    assert!(house.last_tick > house.created_at);
}

#[tokio::test]
async fn test_upgrade_insufficient_reports_cost() {
    let (_dir, engine) = engine();
    seed_house(&engine, 52, 5, 10, 0);

    match engine.upgrade(52).await {
        Err(EngineError::InsufficientPoints { cost, have }) => {
            assert_eq!(cost, upgrade_cost(5));
            assert_eq!(have, 10);
        }
        other => panic!("expected InsufficientPoints, got {:?}", other.map(|h| h.level)),
    }
}

#[tokio::test]
async fn test_upgrade_at_max_level_fails() {
    let (_dir, engine) = engine();
    seed_house(&engine, 53, 10, 1_000_000, 0);

    assert!(matches!(
        engine.upgrade(53).await,
        Err(EngineError::MaxLevelReached)
    ));
}

#[tokio::test]
async fn test_vote_once_per_day() {
    let (_dir, engine) = engine();
    seed_house(&engine, 61, 1, 0, 0);

    engine.vote(60, 61).await.unwrap();
    assert_eq!(engine.db().get_house(61).unwrap().unwrap().total_votes, 1);

    assert!(matches!(
        engine.vote(60, 61).await,
        Err(EngineError::AlreadyVotedToday)
    ));
    assert_eq!(engine.db().get_house(61).unwrap().unwrap().total_votes, 1);
}

#[tokio::test]
async fn test_vote_on_new_date_is_allowed() {
    let (_dir, engine) = engine();
    seed_house(&engine, 63, 1, 0, 0);

    // A vote from yesterday does not block today's vote.
    let yesterday = Vote {
        voter_fid: 62,
        host_fid: 63,
        voted_at: (Utc::now() - Duration::days(1)).date_naive(),
    };
    assert!(engine.db().try_insert_vote(&yesterday).unwrap());

    engine.vote(62, 63).await.unwrap();
    assert_eq!(engine.db().count_votes_by_voter(62).unwrap(), 2);
}

#[tokio::test]
async fn test_vote_requires_target_house() {
    let (_dir, engine) = engine();
    assert!(matches!(
        engine.vote(70, 71).await,
        Err(EngineError::HouseNotFound(71))
    ));
}

#[tokio::test]
async fn test_starting_second_stay_closes_first() {
    let (_dir, engine) = engine();
    engine.init_player(80, Some("guest".into()), None).unwrap();
    engine.init_player(81, Some("host_a".into()), None).unwrap();
    engine.init_player(82, Some("host_b".into()), None).unwrap();

    let first = engine.start_stay(80, 81).await.unwrap();
    assert!(first.end_at.is_none());

    let second = engine.start_stay(80, 82).await.unwrap();
    let first_after = engine.db().get_stay(first.id).unwrap().unwrap();
    assert!(first_after.end_at.is_some());

    let current = engine.current_stay(80).unwrap().unwrap();
    assert_eq!(current.id, second.id);
    assert_eq!(engine.guest_count(81).unwrap(), 0);
    assert_eq!(engine.guest_count(82).unwrap(), 1);
}

#[tokio::test]
async fn test_stop_stay_without_open_stay_is_none() {
    let (_dir, engine) = engine();
    assert!(engine.stop_stay(90).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_stay_starts_leave_one_open_stay() {
    let (_dir, engine) = engine();
    engine.init_player(91, Some("guest".into()), None).unwrap();
    engine.init_player(92, Some("host_a".into()), None).unwrap();
    engine.init_player(93, Some("host_b".into()), None).unwrap();

    for round in 0..50 {
        let barrier = Arc::new(Barrier::new(2));

        let (e, b) = (engine.clone(), barrier.clone());
        let a = tokio::spawn(async move {
            b.wait().await;
            e.start_stay(91, 92).await.unwrap();
        });
        let (e, b) = (engine.clone(), barrier.clone());
        let other = tokio::spawn(async move {
            b.wait().await;
            e.start_stay(91, 93).await.unwrap();
        });
        a.await.unwrap();
        other.await.unwrap();

        let open: Vec<u64> = engine
            .db()
            .stays_touching(91)
            .unwrap()
            .into_iter()
            .filter(|s| s.is_open())
            .map(|s| s.id)
            .collect();
        assert_eq!(
            open.len(),
            1,
            "round {}: guest 91 holds open stays {:?}",
            round,
            open
        );
    }
}

#[test]
fn test_init_player_is_idempotent_for_house() {
    let (_dir, engine) = engine();
    let first = engine.init_player(100, Some("alice".into()), None).unwrap();
    assert_eq!(first.house.level, 1);
    assert_eq!(first.house.rizz_point, 0);

    // Re-init refreshes metadata but keeps the existing house.
    let again = engine
        .init_player(100, Some("alice_renamed".into()), None)
        .unwrap();
    assert_eq!(again.house.created_at, first.house.created_at);
    assert_eq!(again.player.username.as_deref(), Some("alice_renamed"));
}

#[tokio::test]
async fn test_profile_stats() {
    let (_dir, engine) = engine();
    engine.init_player(110, Some("p".into()), None).unwrap();
    engine.init_player(111, Some("q".into()), None).unwrap();

    engine.vote(110, 111).await.unwrap();
    engine.start_stay(110, 111).await.unwrap();
    engine.start_stay(111, 110).await.unwrap();

    let profile = engine.profile(110).unwrap();
    assert_eq!(profile.stats.total_votes_given, 1);
    assert_eq!(profile.stats.total_stays, 1);
    assert_eq!(profile.stats.current_guests, 1);
}

#[tokio::test]
async fn test_leaderboards() {
    let (_dir, engine) = engine();
    engine.init_player(120, Some("low".into()), None).unwrap();
    engine.init_player(121, Some("high".into()), None).unwrap();
    seed_house(&engine, 121, 3, 500, 0);

    engine.vote(120, 121).await.unwrap();

    let top = engine.top_rizz().unwrap();
    assert_eq!(top[0].host_fid, 121);
    assert!(top[0].current_rizz >= 500);

    let alltime = engine.votes_alltime().unwrap();
    assert_eq!(alltime.len(), 1);
    assert_eq!(alltime[0].host_fid, 121);
    assert_eq!(alltime[0].votes_count, 1);
    assert_eq!(alltime[0].username, "high");

    let (weekly, from) = engine.votes_weekly().unwrap();
    assert_eq!(weekly.len(), 1);
    assert!(from <= Utc::now().date_naive());
}
