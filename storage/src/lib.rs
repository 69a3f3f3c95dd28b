//! Rizz House Storage Layer
//!
//! Sled-backed persistence for game entities. The database is the sole
//! owner of all state; the engine re-reads current rows before computing
//! any delta, so nothing here is cached between requests.

mod db;
mod records;

pub use db::GameDb;
pub use records::{House, Player, Stay, Vote};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Backend(#[from] sled::Error),

    #[error("codec error: {0}")]
    Codec(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
