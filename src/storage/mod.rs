//! Durable state: the player statistics file and the single save slot.

#![cfg(feature = "std")]

use std::fmt;
use std::io;

pub mod session;
pub mod stats;

pub use session::SessionStore;
pub use stats::{PlayerRecord, StatsRepository};

/// Save/load failure. A missing save file is not an error; see
/// [`SessionStore::load`].
#[derive(Debug)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    Io(io::Error),
    /// The session snapshot could not be encoded or decoded.
    Encode(bincode::Error),
    /// The stats file could not be encoded or decoded.
    Json(serde_json::Error),
    /// The file decoded but its contents cannot be used.
    Corrupt(String),
}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        PersistenceError::Io(err)
    }
}

impl From<bincode::Error> for PersistenceError {
    fn from(err: bincode::Error) -> Self {
        PersistenceError::Encode(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Json(err)
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "storage unavailable: {}", e),
            PersistenceError::Encode(e) => write!(f, "unreadable save data: {}", e),
            PersistenceError::Json(e) => write!(f, "unreadable stats data: {}", e),
            PersistenceError::Corrupt(why) => write!(f, "corrupt data: {}", why),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Encode(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::Corrupt(_) => None,
        }
    }
}
