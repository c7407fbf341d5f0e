//! One side's 10×10 grid: placement validation, ship placement and shot
//! resolution.

use core::fmt;
use rand::Rng;

use super::common::{BoardError, Coord, Orientation, ShotResult};
use super::config::BOARD_SIZE;

/// Random attempts before `random_placement` falls back to a full scan.
const RANDOM_PLACEMENT_ATTEMPTS: usize = 1_000;

pub type Grid = [[CellState; BOARD_SIZE]; BOARD_SIZE];

/// State of a single cell. `Empty` only becomes `Miss` and `Ship` only becomes
/// `Hit`; resolved cells never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Ship,
    Hit,
    Miss,
}

impl CellState {
    /// `Hit` or `Miss`.
    pub fn is_resolved(self) -> bool {
        matches!(self, CellState::Hit | CellState::Miss)
    }

    /// `Ship` or `Hit`.
    pub fn is_ship_segment(self) -> bool {
        matches!(self, CellState::Ship | CellState::Hit)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    grid: Grid,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board (no ships, no shots).
    pub fn new() -> Self {
        Board {
            grid: [[CellState::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Rebuild a board from a raw grid, e.g. a restored snapshot.
    pub fn from_grid(grid: Grid) -> Self {
        Board { grid }
    }

    /// Raw grid, row-major.
    pub fn cells(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, coord: Coord) -> Result<CellState, BoardError> {
        if !coord.in_bounds() {
            return Err(BoardError::OutOfBounds(coord));
        }
        Ok(self.grid[coord.row][coord.col])
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == state)
            .count()
    }

    /// Unhit ship segments left on this board.
    pub fn ship_cells_remaining(&self) -> usize {
        self.count(CellState::Ship)
    }

    /// Ship segments placed on this board, hit or not.
    pub fn ship_segments(&self) -> usize {
        self.count(CellState::Ship) + self.count(CellState::Hit)
    }

    /// Whether a ship of `length` fits at `origin` without leaving the grid or
    /// touching another ship.
    pub fn can_place(&self, origin: Coord, length: usize, orientation: Orientation) -> bool {
        self.check_run(origin, length, orientation).is_ok()
    }

    /// Mark every cell of the run as `Ship`. The board is left untouched when
    /// the run is rejected.
    pub fn place(
        &mut self,
        origin: Coord,
        length: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        self.check_run(origin, length, orientation)?;
        for coord in run(origin, length, orientation) {
            self.grid[coord.row][coord.col] = CellState::Ship;
        }
        Ok(())
    }

    fn check_run(
        &self,
        origin: Coord,
        length: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let (end_row, end_col) = match orientation {
            Orientation::Horizontal => (origin.row, origin.col.saturating_add(length)),
            Orientation::Vertical => (origin.row.saturating_add(length), origin.col),
        };
        // the end is exclusive along the run axis
        let fits = match orientation {
            Orientation::Horizontal => end_row < BOARD_SIZE && end_col <= BOARD_SIZE,
            Orientation::Vertical => end_row <= BOARD_SIZE && end_col < BOARD_SIZE,
        };
        if length == 0 || !fits {
            return Err(BoardError::ShipOutOfBounds);
        }
        if run(origin, length, orientation).any(|c| self.grid[c.row][c.col] == CellState::Ship) {
            return Err(BoardError::ShipOverlaps);
        }
        Ok(())
    }

    /// Resolve a shot at `coord`. Repeat shots report `AlreadyTried` and leave
    /// the board as it was.
    pub fn apply_shot(&mut self, coord: Coord) -> Result<ShotResult, BoardError> {
        let cell = self.cell(coord)?;
        let (next, result) = match cell {
            CellState::Empty => (CellState::Miss, ShotResult::Miss),
            CellState::Ship => (CellState::Hit, ShotResult::Hit),
            CellState::Hit | CellState::Miss => return Ok(ShotResult::AlreadyTried),
        };
        self.grid[coord.row][coord.col] = next;
        Ok(result)
    }

    /// Returns a random legal `(origin, orientation)` for a ship of `length`.
    ///
    /// Origins are drawn uniformly from the whole grid and retried until one
    /// fits. If that keeps failing, every legal placement is enumerated and
    /// one is chosen uniformly.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Result<(Coord, Orientation), BoardError> {
        for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
            let origin = Coord::new(
                rng.random_range(0..BOARD_SIZE),
                rng.random_range(0..BOARD_SIZE),
            );
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if self.can_place(origin, length, orientation) {
                return Ok((origin, orientation));
            }
        }

        let legal = move || {
            Coord::all().flat_map(move |c| {
                [Orientation::Horizontal, Orientation::Vertical]
                    .into_iter()
                    .filter(move |&o| self.can_place(c, length, o))
                    .map(move |o| (c, o))
            })
        };
        let total = legal().count();
        if total == 0 {
            return Err(BoardError::UnableToPlaceShip);
        }
        let pick = rng.random_range(0..total);
        legal().nth(pick).ok_or(BoardError::UnableToPlaceShip)
    }

    /// Place a ship of `length` at a random legal location.
    pub fn place_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        length: usize,
    ) -> Result<(Coord, Orientation), BoardError> {
        let (origin, orientation) = self.random_placement(rng, length)?;
        self.place(origin, length, orientation)?;
        Ok((origin, orientation))
    }
}

/// Coordinates covered by a run. Callers check bounds first.
fn run(origin: Coord, length: usize, orientation: Orientation) -> impl Iterator<Item = Coord> {
    (0..length).map(move |i| match orientation {
        Orientation::Horizontal => Coord::new(origin.row, origin.col + i),
        Orientation::Vertical => Coord::new(origin.row + i, origin.col),
    })
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in self.grid.iter() {
            write!(f, "  ")?;
            for cell in row.iter() {
                let ch = match cell {
                    CellState::Empty => '.',
                    CellState::Ship => 'S',
                    CellState::Hit => 'X',
                    CellState::Miss => 'o',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
