//! Core naval-combat engine (no_std compatible)
//!
//! Boards, placement validation, the turn state machine and the opponent's
//! targeting. Nothing in here touches the filesystem; persistence lives in
//! `storage` and is only compiled with `std`.

pub mod ai;
pub mod board;
pub mod common;
pub mod config;
pub mod game;

// Re-export commonly used types
pub use ai::HuntState;
pub use board::{Board, CellState, Grid};
pub use common::{BoardError, Coord, Direction, Orientation, ShotResult};
pub use config::*;
pub use game::{
    GameError, GameSession, Mode, PlacementReport, SessionSnapshot, TurnReport, SNAPSHOT_VERSION,
};
