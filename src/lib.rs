#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod core;
#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
mod config;
#[cfg(feature = "std")]
pub mod engine;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod storage;

pub use crate::core::*;
#[cfg(feature = "std")]
pub use cli::{parse_command, parse_coord, print_session, print_stats, run_interactive, Command};
#[cfg(feature = "std")]
pub use config::{StorageConfig, DATA_DIR_ENV, SESSION_FILE, STATS_FILE};
#[cfg(feature = "std")]
pub use engine::{Engine, EngineError};
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use storage::{PersistenceError, PlayerRecord, SessionStore, StatsRepository};
