//! Sled-based persistence for game state
//!
//! One keyspace, prefixed keys, bincode values. Secondary index entries
//! (`stay_guest/`, `stay_host/`, `stay_open/`) are maintained alongside the
//! primary row on every stay write so lookups never scan the whole table.

use crate::records::{House, Player, Stay, Vote};
use crate::{StorageError, StorageResult};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct GameDb {
    db: sled::Db,
}

fn house_key(fid: u64) -> String {
    format!("house/{:020}", fid)
}

fn player_key(fid: u64) -> String {
    format!("player/{:020}", fid)
}

fn stay_key(id: u64) -> String {
    format!("stay/{:020}", id)
}

fn stay_guest_key(guest_fid: u64, id: u64) -> String {
    format!("stay_guest/{:020}/{:020}", guest_fid, id)
}

fn stay_host_key(host_fid: u64, id: u64) -> String {
    format!("stay_host/{:020}/{:020}", host_fid, id)
}

fn stay_open_key(guest_fid: u64) -> String {
    format!("stay_open/{:020}", guest_fid)
}

fn vote_key(voter_fid: u64, date: NaiveDate) -> String {
    format!("vote/{:020}/{}", voter_fid, date)
}

impl GameDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path)?;
        Ok(GameDb { db })
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let bytes =
            bincode::serialize(value).map_err(|e| StorageError::Codec(e.to_string()))?;
        self.db.insert(key.as_bytes(), bytes)?;
        // Flush to disk to ensure durability
        self.db.flush()?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => {
                let value = bincode::deserialize(&bytes)
                    .map_err(|e| StorageError::Codec(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan_ids(&self, prefix: &str) -> StorageResult<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            let (_, value) = entry?;
            let mut buf = [0u8; 8];
            if value.len() != 8 {
                return Err(StorageError::Codec(format!(
                    "index entry under {} has malformed id",
                    prefix
                )));
            }
            buf.copy_from_slice(&value);
            ids.push(u64::from_be_bytes(buf));
        }
        Ok(ids)
    }

    // Houses

    pub fn get_house(&self, fid: u64) -> StorageResult<Option<House>> {
        self.get(&house_key(fid))
    }

    /// Write a house row. Single-key insert, atomic in sled.
    pub fn put_house(&self, house: &House) -> StorageResult<()> {
        self.put(&house_key(house.fid), house)
    }

    /// Batch-fetch houses for a set of fids (avoids N+1 lookups during
    /// settlement). Missing fids are simply absent from the result.
    pub fn houses_by_fids(&self, fids: &[u64]) -> StorageResult<HashMap<u64, House>> {
        let mut houses = HashMap::new();
        let distinct: HashSet<u64> = fids.iter().copied().collect();
        for fid in distinct {
            if let Some(house) = self.get_house(fid)? {
                houses.insert(fid, house);
            }
        }
        Ok(houses)
    }

    pub fn all_houses(&self) -> StorageResult<Vec<House>> {
        let mut houses = Vec::new();
        for entry in self.db.scan_prefix(b"house/") {
            let (_, bytes) = entry?;
            let house = bincode::deserialize(&bytes)
                .map_err(|e| StorageError::Codec(e.to_string()))?;
            houses.push(house);
        }
        Ok(houses)
    }

    // Players

    pub fn get_player(&self, fid: u64) -> StorageResult<Option<Player>> {
        self.get(&player_key(fid))
    }

    pub fn put_player(&self, player: &Player) -> StorageResult<()> {
        self.put(&player_key(player.fid), player)
    }

    pub fn players_by_fids(&self, fids: &[u64]) -> StorageResult<HashMap<u64, Player>> {
        let mut players = HashMap::new();
        let distinct: HashSet<u64> = fids.iter().copied().collect();
        for fid in distinct {
            if let Some(player) = self.get_player(fid)? {
                players.insert(fid, player);
            }
        }
        Ok(players)
    }

    // Stays

    /// Allocate a fresh stay id from sled's monotonic id generator.
    pub fn allocate_stay_id(&self) -> StorageResult<u64> {
        Ok(self.db.generate_id()?)
    }

    /// Write a stay row and keep its index entries in step. Sets the
    /// guest's open-stay pointer while the stay is open and clears it on
    /// close, preserving at-most-one-open-stay-per-guest.
    pub fn put_stay(&self, stay: &Stay) -> StorageResult<()> {
        let bytes =
            bincode::serialize(stay).map_err(|e| StorageError::Codec(e.to_string()))?;
        let id_bytes = stay.id.to_be_bytes().to_vec();

        self.db.insert(stay_key(stay.id).as_bytes(), bytes)?;
        self.db
            .insert(stay_guest_key(stay.guest_fid, stay.id).as_bytes(), id_bytes.clone())?;
        self.db
            .insert(stay_host_key(stay.host_fid, stay.id).as_bytes(), id_bytes.clone())?;

        let open_key = stay_open_key(stay.guest_fid);
        if stay.is_open() {
            self.db.insert(open_key.as_bytes(), id_bytes)?;
        } else if let Some(current) = self.db.get(open_key.as_bytes())? {
            if current.as_ref() == stay.id.to_be_bytes() {
                self.db.remove(open_key.as_bytes())?;
            }
        }

        self.db.flush()?;
        Ok(())
    }

    pub fn get_stay(&self, id: u64) -> StorageResult<Option<Stay>> {
        self.get(&stay_key(id))
    }

    pub fn open_stay_for_guest(&self, guest_fid: u64) -> StorageResult<Option<Stay>> {
        let pointer = self.db.get(stay_open_key(guest_fid).as_bytes())?;
        let Some(value) = pointer else {
            return Ok(None);
        };
        let mut buf = [0u8; 8];
        if value.len() != 8 {
            return Err(StorageError::Codec(
                "open-stay pointer has malformed id".to_string(),
            ));
        }
        buf.copy_from_slice(&value);
        self.get_stay(u64::from_be_bytes(buf))
    }

    /// All stays where `fid` appears as guest or host, open or closed.
    /// Closed stays may still carry unsettled overlap with a lagging
    /// settlement window, so nothing is filtered here.
    pub fn stays_touching(&self, fid: u64) -> StorageResult<Vec<Stay>> {
        let mut by_id: BTreeMap<u64, Stay> = BTreeMap::new();
        let mut ids = self.scan_ids(&format!("stay_guest/{:020}/", fid))?;
        ids.extend(self.scan_ids(&format!("stay_host/{:020}/", fid))?);
        for id in ids {
            if let Some(stay) = self.get_stay(id)? {
                by_id.insert(id, stay);
            }
        }
        Ok(by_id.into_values().collect())
    }

    pub fn open_stays_for_host(&self, host_fid: u64) -> StorageResult<Vec<Stay>> {
        let mut stays = Vec::new();
        for id in self.scan_ids(&format!("stay_host/{:020}/", host_fid))? {
            if let Some(stay) = self.get_stay(id)? {
                if stay.is_open() {
                    stays.push(stay);
                }
            }
        }
        Ok(stays)
    }

    pub fn count_open_stays_for_host(&self, host_fid: u64) -> StorageResult<u64> {
        Ok(self.open_stays_for_host(host_fid)?.len() as u64)
    }

    pub fn count_stays_as_guest(&self, guest_fid: u64) -> StorageResult<u64> {
        Ok(self.scan_ids(&format!("stay_guest/{:020}/", guest_fid))?.len() as u64)
    }

    // Votes

    /// Conditionally insert a vote. Returns false when the voter already
    /// has a vote for that date. The compare-and-swap on the vote key is
    /// the enforcement boundary for one-vote-per-day; any application
    /// pre-check is only an optimization.
    pub fn try_insert_vote(&self, vote: &Vote) -> StorageResult<bool> {
        let key = vote_key(vote.voter_fid, vote.voted_at);
        let bytes =
            bincode::serialize(vote).map_err(|e| StorageError::Codec(e.to_string()))?;
        let outcome =
            self.db
                .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(bytes))?;
        if outcome.is_err() {
            return Ok(false);
        }
        self.db.flush()?;
        Ok(true)
    }

    pub fn has_vote(&self, voter_fid: u64, date: NaiveDate) -> StorageResult<bool> {
        Ok(self.db.contains_key(vote_key(voter_fid, date).as_bytes())?)
    }

    pub fn count_votes_by_voter(&self, voter_fid: u64) -> StorageResult<u64> {
        let prefix = format!("vote/{:020}/", voter_fid);
        let mut count = 0;
        for entry in self.db.scan_prefix(prefix.as_bytes()) {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    pub fn all_votes(&self) -> StorageResult<Vec<Vote>> {
        let mut votes = Vec::new();
        for entry in self.db.scan_prefix(b"vote/") {
            let (_, bytes) = entry?;
            let vote = bincode::deserialize(&bytes)
                .map_err(|e| StorageError::Codec(e.to_string()))?;
            votes.push(vote);
        }
        Ok(votes)
    }
}
