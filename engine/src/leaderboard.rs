//! Leaderboard projections

use crate::{Engine, EngineResult};
use chrono::{Duration, NaiveDate, Utc};
use rizz_economy::hours_between;
use rizz_storage::Vote;
use serde::Serialize;
use std::collections::HashMap;

const LEADERBOARD_LIMIT: usize = 50;

/// House ranked by live-projected points.
#[derive(Debug, Clone, Serialize)]
pub struct RizzEntry {
    pub host_fid: u64,
    pub username: String,
    pub pfp_url: Option<String>,
    pub level: u32,
    pub current_rizz: u64,
    pub base_rizz: u64,
    pub mining_rate: u64,
    pub votes_count: u64,
}

/// Host ranked by votes received.
#[derive(Debug, Clone, Serialize)]
pub struct VoteEntry {
    pub host_fid: u64,
    pub username: String,
    pub pfp_url: Option<String>,
    pub level: u32,
    pub votes_count: u64,
}

impl Engine {
    /// Top houses by current points: settled balance plus self-mined
    /// accrual projected to now, no commit.
    pub fn top_rizz(&self) -> EngineResult<Vec<RizzEntry>> {
        let houses = self.db().all_houses()?;
        let now = Utc::now();

        let fids: Vec<u64> = houses.iter().map(|h| h.fid).collect();
        let players = self.db().players_by_fids(&fids)?;

        let mut entries: Vec<RizzEntry> = houses
            .into_iter()
            .map(|house| {
                let mined = (house.mining_rate as f64 * hours_between(house.last_tick, now))
                    .floor() as u64;
                let player = players.get(&house.fid);
                RizzEntry {
                    host_fid: house.fid,
                    username: display_name(
                        house.fid,
                        player.and_then(|p| p.username.as_deref()),
                    ),
                    pfp_url: player.and_then(|p| p.pfp_url.clone()),
                    level: house.level,
                    current_rizz: house.rizz_point + mined,
                    base_rizz: house.rizz_point,
                    mining_rate: house.mining_rate,
                    votes_count: house.total_votes,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.current_rizz.cmp(&a.current_rizz));
        entries.truncate(LEADERBOARD_LIMIT);
        Ok(entries)
    }

    /// Hosts ranked by all votes ever received.
    pub fn votes_alltime(&self) -> EngineResult<Vec<VoteEntry>> {
        let votes = self.db().all_votes()?;
        self.rank_votes(votes)
    }

    /// Hosts ranked by votes in the trailing 7 calendar days; also
    /// returns the window's starting date.
    pub fn votes_weekly(&self) -> EngineResult<(Vec<VoteEntry>, NaiveDate)> {
        let from = (Utc::now() - Duration::days(7)).date_naive();
        let votes: Vec<Vote> = self
            .db()
            .all_votes()?
            .into_iter()
            .filter(|v| v.voted_at >= from)
            .collect();
        Ok((self.rank_votes(votes)?, from))
    }

    fn rank_votes(&self, votes: Vec<Vote>) -> EngineResult<Vec<VoteEntry>> {
        let mut counts: HashMap<u64, u64> = HashMap::new();
        for vote in &votes {
            *counts.entry(vote.host_fid).or_insert(0) += 1;
        }

        let fids: Vec<u64> = counts.keys().copied().collect();
        let players = self.db().players_by_fids(&fids)?;
        let houses = self.db().houses_by_fids(&fids)?;

        let mut entries: Vec<VoteEntry> = counts
            .into_iter()
            .map(|(host_fid, votes_count)| {
                let player = players.get(&host_fid);
                VoteEntry {
                    host_fid,
                    username: display_name(host_fid, player.and_then(|p| p.username.as_deref())),
                    pfp_url: player.and_then(|p| p.pfp_url.clone()),
                    level: houses.get(&host_fid).map(|h| h.level).unwrap_or(1),
                    votes_count,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.votes_count.cmp(&a.votes_count));
        entries.truncate(LEADERBOARD_LIMIT);
        Ok(entries)
    }
}

fn display_name(fid: u64, username: Option<&str>) -> String {
    match username {
        Some(name) => name.to_string(),
        None => format!("fid:{}", fid),
    }
}
