#![cfg(feature = "std")]

//! Caller-facing command surface: one owned [`GameSession`] wired to the stats
//! file and the save slot.

use std::fmt;

use log::{info, warn};
use rand::rngs::SmallRng;

use crate::config::StorageConfig;
use crate::core::{Coord, GameError, GameSession, Mode, Orientation, ShotResult, TurnReport};
use crate::storage::{PersistenceError, SessionStore, StatsRepository};

/// Failure of an engine command. State is never left half-updated.
#[derive(Debug)]
pub enum EngineError {
    Game(GameError),
    Persistence(PersistenceError),
}

impl From<GameError> for EngineError {
    fn from(err: GameError) -> Self {
        EngineError::Game(err)
    }
}

impl From<PersistenceError> for EngineError {
    fn from(err: PersistenceError) -> Self {
        EngineError::Persistence(err)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Game(e) => write!(f, "{}", e),
            EngineError::Persistence(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Game(e) => Some(e),
            EngineError::Persistence(e) => Some(e),
        }
    }
}

pub struct Engine {
    session: GameSession,
    stats: StatsRepository,
    saves: SessionStore,
    rng: SmallRng,
    status: String,
    // shown ahead of the next status message
    notice: Option<String>,
}

impl Engine {
    /// Load the stats file (creating it if needed) and prepare the save slot.
    /// A stats file that can't be read is reported in the status and replaced
    /// by an empty table; the file itself is only rewritten on the next change.
    pub fn open(config: &StorageConfig, rng: SmallRng) -> Self {
        let stats_path = config.stats_path();
        let (stats, notice) = match StatsRepository::open(&stats_path) {
            Ok(stats) => (stats, None),
            Err(e) => {
                warn!("could not read stats from {}: {}", stats_path.display(), e);
                let notice = format!(
                    "Could not read player stats ({}); starting with an empty table.",
                    e
                );
                (StatsRepository::empty(stats_path), Some(notice))
            }
        };
        let greeting = "Start a new game or load a saved one.";
        // the stats notice also leads the first message after this one
        let status = match &notice {
            Some(notice) => format!("{} {}", notice, greeting),
            None => greeting.to_string(),
        };
        Self {
            session: GameSession::new(),
            stats,
            saves: SessionStore::new(config.session_path()),
            rng,
            status,
            notice,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> &StatsRepository {
        &self.stats
    }

    /// Message describing the outcome of the last command.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Throw away the current session and start placing ships for `name`.
    pub fn new_game(&mut self, name: &str) {
        self.session = GameSession::started(name);
        let prompt = self.placement_prompt();
        self.set_status(prompt);
    }

    /// Resume the saved game, or start a new one for `name` when there is
    /// none or it can't be read. A load failure stays in the status message.
    /// Returns whether a saved game was resumed.
    pub fn resume_or_new_game(&mut self, name: &str) -> bool {
        match self.load_session() {
            Ok(true) => true,
            Ok(false) => {
                self.new_game(name);
                false
            }
            Err(_) => {
                self.notice = Some(std::mem::take(&mut self.status));
                self.new_game(name);
                false
            }
        }
    }

    pub fn toggle_orientation(&mut self) -> Result<Orientation, EngineError> {
        let orientation = self.session.toggle_orientation()?;
        let prompt = self.placement_prompt();
        self.set_status(prompt);
        Ok(orientation)
    }

    pub fn place_ship(&mut self, origin: Coord) -> Result<(), EngineError> {
        match self.session.place_ship(&mut self.rng, origin) {
            Ok(report) => {
                let message = if report.mode == Mode::PlayerTurn {
                    "All ships placed. Fire at the enemy board.".to_string()
                } else {
                    self.placement_prompt()
                };
                self.set_status(message);
                Ok(())
            }
            Err(e) => {
                let message = match e {
                    GameError::PlacementRejected(_) => {
                        format!("Can't place a ship at {}. {}", origin, self.placement_prompt())
                    }
                    _ => e.to_string(),
                };
                self.set_status(message);
                Err(e.into())
            }
        }
    }

    /// Fire at the opponent. When the shot ends the game, the match is recorded
    /// for a named player; a failed stats write is returned after the game
    /// state has already advanced.
    pub fn fire_at(&mut self, target: Coord) -> Result<TurnReport, EngineError> {
        let report = match self.session.fire_at(&mut self.rng, target) {
            Ok(report) => report,
            Err(e) => {
                let message = match e {
                    GameError::RepeatGuess => format!("You already fired at {}. Try again.", target),
                    _ => e.to_string(),
                };
                self.set_status(message);
                return Err(e.into());
            }
        };
        let message = describe_turn(&report, &self.session);
        self.set_status(message);

        if let Some(score) = self.session.final_score() {
            if let Err(e) = self.stats.record_match(self.session.player_name(), score) {
                warn!("could not record match: {}", e);
                self.status.push_str(" (stats could not be saved)");
                return Err(e.into());
            }
        }
        Ok(report)
    }

    /// Write the current game to the save slot. Only allowed on the player's turn.
    pub fn save_session(&mut self) -> Result<(), EngineError> {
        let mode = self.session.mode();
        if mode != Mode::PlayerTurn {
            self.set_status("Games can only be saved during battle.".to_string());
            return Err(GameError::InvalidMode(mode).into());
        }
        match self.saves.save(&self.session.snapshot()) {
            Ok(()) => {
                self.set_status("Game saved.".to_string());
                Ok(())
            }
            Err(e) => {
                warn!("save failed: {}", e);
                self.set_status(format!("Could not save the game: {}", e));
                Err(e.into())
            }
        }
    }

    /// Resume the saved game. Returns `false` when there is nothing to load.
    /// The current session is replaced only after a successful read.
    pub fn load_session(&mut self) -> Result<bool, EngineError> {
        match self.saves.load() {
            Ok(Some(snapshot)) => {
                self.session = GameSession::from_snapshot(snapshot);
                info!("resumed game for {:?}", self.session.player_name());
                self.set_status("Game loaded. Your turn.".to_string());
                Ok(true)
            }
            Ok(None) => {
                self.set_status("No saved game found.".to_string());
                Ok(false)
            }
            Err(e) => {
                warn!("load failed: {}", e);
                self.set_status(format!("Could not load the saved game: {}", e));
                Err(e.into())
            }
        }
    }

    pub fn clear_player(&mut self, name: &str) -> Result<bool, EngineError> {
        Ok(self.stats.clear_player(name)?)
    }

    pub fn clear_all(&mut self) -> Result<(), EngineError> {
        Ok(self.stats.clear_all()?)
    }

    pub fn reset_best_score(&mut self, name: &str) -> Result<bool, EngineError> {
        Ok(self.stats.reset_best_score(name)?)
    }

    fn set_status(&mut self, message: String) {
        self.status = match self.notice.take() {
            Some(notice) => format!("{} {}", notice, message),
            None => message,
        };
    }

    fn placement_prompt(&self) -> String {
        match (self.session.current_ship_length(), self.session.mode().orientation()) {
            (Some(len), Some(orientation)) => format!(
                "Place your ship of length {} ({}).",
                len,
                match orientation {
                    Orientation::Horizontal => "horizontal",
                    Orientation::Vertical => "vertical",
                }
            ),
            _ => "Place your ships.".to_string(),
        }
    }
}

fn describe_turn(report: &TurnReport, session: &GameSession) -> String {
    let yours = match report.result {
        ShotResult::Hit => format!("You hit at {}!", report.target),
        _ => format!("You missed at {}.", report.target),
    };
    match report.mode {
        Mode::Won => format!(
            "{} You win with {} squares left!",
            yours,
            session.player_remaining()
        ),
        Mode::Lost => format!(
            "{} The enemy sank your last ship. You lose; they had {} squares left.",
            yours,
            session.opponent_remaining()
        ),
        _ => match report.opponent_shot {
            Some((coord, ShotResult::Hit)) => format!("{} The enemy hit you at {}.", yours, coord),
            Some((coord, _)) => format!("{} The enemy missed at {}.", yours, coord),
            None => yours,
        },
    }
}
