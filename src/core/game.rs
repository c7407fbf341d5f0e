use alloc::string::String;
use core::fmt;

use log::{debug, info};
use rand::Rng;

use super::{
    ai::HuntState,
    board::Board,
    common::{BoardError, Coord, Orientation, ShotResult},
    config::{ship_length, NUM_SHIPS, TOTAL_SHIP_CELLS},
};

/// Version tag written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Single authoritative session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    PreGame,
    PlacingHorizontal,
    PlacingVertical,
    PlayerTurn,
    Won,
    Lost,
}

impl Mode {
    /// Orientation used for the next placement, only while placing.
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            Mode::PlacingHorizontal => Some(Orientation::Horizontal),
            Mode::PlacingVertical => Some(Orientation::Vertical),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Mode::Won | Mode::Lost)
    }
}

/// Errors signalled by session operations. None of them change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Placement run leaves the board or overlaps another ship.
    PlacementRejected(BoardError),
    /// The targeted cell was already hit or missed.
    RepeatGuess,
    /// Operation is not accepted in the current mode.
    InvalidMode(Mode),
    /// Coordinate off the board, or the opponent could not place its ship.
    Board(BoardError),
}

impl From<BoardError> for GameError {
    fn from(err: BoardError) -> Self {
        GameError::Board(err)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::PlacementRejected(e) => write!(f, "Placement rejected: {}", e),
            GameError::RepeatGuess => write!(f, "That cell has already been fired at"),
            GameError::InvalidMode(mode) => write!(f, "Not allowed while in {:?}", mode),
            GameError::Board(e) => write!(f, "Board error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// Outcome of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementReport {
    pub length: usize,
    pub orientation: Orientation,
    pub placements_completed: usize,
    pub mode: Mode,
}

/// Outcome of one player shot, including the opponent's reply if it fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub target: Coord,
    pub result: ShotResult,
    pub opponent_shot: Option<(Coord, ShotResult)>,
    pub mode: Mode,
}

/// Serializable state of an in-progress session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSnapshot {
    pub version: u32,
    pub player_board: Board,
    pub opponent_board: Board,
    pub player_name: String,
    pub placements: usize,
    pub hunt: HuntState,
}

/// One match against the scripted opponent.
#[derive(Debug, Clone)]
pub struct GameSession {
    mode: Mode,
    player_board: Board,
    opponent_board: Board,
    placements: usize,
    player_remaining: usize,
    opponent_remaining: usize,
    hunt: HuntState,
    player_name: String,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Fresh session in `PreGame` with empty boards.
    pub fn new() -> Self {
        Self {
            mode: Mode::PreGame,
            player_board: Board::new(),
            opponent_board: Board::new(),
            placements: 0,
            player_remaining: TOTAL_SHIP_CELLS,
            opponent_remaining: TOTAL_SHIP_CELLS,
            hunt: HuntState::new(),
            player_name: String::new(),
        }
    }

    /// Fresh session already placing ships for `player_name`. An empty name
    /// plays anonymously.
    pub fn started(player_name: &str) -> Self {
        let session = Self {
            mode: Mode::PlacingHorizontal,
            player_name: String::from(player_name.trim()),
            ..Self::new()
        };
        info!("new game started for {:?}", session.player_name);
        session
    }

    /// Begin placement for `player_name` on a session still in `PreGame`.
    pub fn start(&mut self, player_name: &str) -> Result<(), GameError> {
        if self.mode != Mode::PreGame {
            return Err(GameError::InvalidMode(self.mode));
        }
        *self = Self::started(player_name);
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn opponent_board(&self) -> &Board {
        &self.opponent_board
    }

    pub fn placements_completed(&self) -> usize {
        self.placements
    }

    pub fn player_remaining(&self) -> usize {
        self.player_remaining
    }

    pub fn opponent_remaining(&self) -> usize {
        self.opponent_remaining
    }

    pub fn hunt(&self) -> &HuntState {
        &self.hunt
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Length of the ship the next placement will use.
    pub fn current_ship_length(&self) -> Option<usize> {
        match self.mode {
            Mode::PlacingHorizontal | Mode::PlacingVertical => ship_length(self.placements),
            _ => None,
        }
    }

    /// Flip between horizontal and vertical placement.
    pub fn toggle_orientation(&mut self) -> Result<Orientation, GameError> {
        self.mode = match self.mode {
            Mode::PlacingHorizontal => Mode::PlacingVertical,
            Mode::PlacingVertical => Mode::PlacingHorizontal,
            other => return Err(GameError::InvalidMode(other)),
        };
        Ok(self.mode.orientation().unwrap_or(Orientation::Horizontal))
    }

    /// Place the current fleet ship at `origin`; the opponent mirrors it with
    /// a ship of the same length at a random legal spot.
    pub fn place_ship<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Coord,
    ) -> Result<PlacementReport, GameError> {
        let orientation = self
            .mode
            .orientation()
            .ok_or(GameError::InvalidMode(self.mode))?;
        let length = ship_length(self.placements).ok_or(GameError::InvalidMode(self.mode))?;

        if !origin.in_bounds() {
            return Err(GameError::PlacementRejected(BoardError::ShipOutOfBounds));
        }
        // validate first so a rejected run leaves both boards alone
        let mut player_board = self.player_board;
        player_board
            .place(origin, length, orientation)
            .map_err(GameError::PlacementRejected)?;
        let mut opponent_board = self.opponent_board;
        let (opp_origin, opp_orientation) = opponent_board.place_random(rng, length)?;

        self.player_board = player_board;
        self.opponent_board = opponent_board;
        self.placements += 1;
        debug!(
            "placed length {} at {} {:?}; opponent at {} {:?}",
            length, origin, orientation, opp_origin, opp_orientation
        );

        if self.placements == NUM_SHIPS {
            self.mode = Mode::PlayerTurn;
            info!("fleet placed, battle begins");
        }
        Ok(PlacementReport {
            length,
            orientation,
            placements_completed: self.placements,
            mode: self.mode,
        })
    }

    /// Fire at the opponent board. Unless this shot wins the game or repeats
    /// an earlier one, the opponent fires back before this returns. On error
    /// the session is unchanged.
    pub fn fire_at<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        target: Coord,
    ) -> Result<TurnReport, GameError> {
        if self.mode != Mode::PlayerTurn {
            return Err(GameError::InvalidMode(self.mode));
        }
        let mut opponent_board = self.opponent_board;
        let mut opponent_remaining = self.opponent_remaining;
        let result = opponent_board.apply_shot(target)?;
        match result {
            ShotResult::AlreadyTried => return Err(GameError::RepeatGuess),
            ShotResult::Hit => opponent_remaining = opponent_remaining.saturating_sub(1),
            ShotResult::Miss => {}
        }
        debug!("player fired at {} -> {:?}", target, result);

        if opponent_remaining == 0 {
            self.opponent_board = opponent_board;
            self.opponent_remaining = 0;
            self.mode = Mode::Won;
            info!("player won with {} cells left", self.player_remaining);
            return Ok(TurnReport {
                target,
                result,
                opponent_shot: None,
                mode: self.mode,
            });
        }

        // the reply runs on copies so a failed opponent shot commits nothing
        let mut player_board = self.player_board;
        let mut hunt = self.hunt;
        let (coord, reply) = hunt.take_shot(rng, &mut player_board)?;
        debug!("opponent fired at {} -> {:?}", coord, reply);

        self.opponent_board = opponent_board;
        self.opponent_remaining = opponent_remaining;
        self.player_board = player_board;
        self.hunt = hunt;
        if reply == ShotResult::Hit {
            self.player_remaining = self.player_remaining.saturating_sub(1);
        }
        if self.player_remaining == 0 {
            self.mode = Mode::Lost;
            info!("player lost; opponent had {} cells left", self.opponent_remaining);
        }
        Ok(TurnReport {
            target,
            result,
            opponent_shot: Some((coord, reply)),
            mode: self.mode,
        })
    }

    /// Score reported to the stats repository once the game is over: the
    /// player's leftover cells on a win, minus the opponent's on a loss.
    pub fn final_score(&self) -> Option<i32> {
        match self.mode {
            Mode::Won => Some(self.player_remaining as i32),
            Mode::Lost => Some(-(self.opponent_remaining as i32)),
            _ => None,
        }
    }

    /// Capture the session for the save slot.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            player_board: self.player_board,
            opponent_board: self.opponent_board,
            player_name: self.player_name.clone(),
            placements: self.placements,
            hunt: self.hunt,
        }
    }

    /// Rebuild a session from a snapshot, resuming on the player's turn.
    /// Remaining counters are recounted from the boards.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            mode: Mode::PlayerTurn,
            player_remaining: snapshot.player_board.ship_cells_remaining(),
            opponent_remaining: snapshot.opponent_board.ship_cells_remaining(),
            player_board: snapshot.player_board,
            opponent_board: snapshot.opponent_board,
            placements: snapshot.placements,
            hunt: snapshot.hunt,
            player_name: snapshot.player_name,
        }
    }
}
