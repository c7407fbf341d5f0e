// Hunt-then-pursue targeting for the opponent.
// Uses no_std and avoids heap allocations.

use log::trace;
use rand::Rng;

use super::board::Board;
use super::common::{BoardError, Coord, Direction, ShotResult};

/// Opponent targeting memory.
///
/// With no active direction the opponent fires at random untried cells. A hit
/// fills one candidate slot per open neighbour; the opponent then follows one
/// direction at a time, extending it on hits and dropping it on a miss or at
/// the edge, until every slot is empty and it falls back to random search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct HuntState {
    candidates: [Option<Coord>; 4],
    active: Option<Direction>,
}

impl HuntState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction currently being pursued, `None` while searching at random.
    pub fn active(&self) -> Option<Direction> {
        self.active
    }

    pub fn is_pursuing(&self) -> bool {
        self.active.is_some()
    }

    /// Coordinate queued for `direction`, if any.
    pub fn candidate(&self, direction: Direction) -> Option<Coord> {
        self.candidates[direction.index()]
    }

    pub fn candidates(&self) -> &[Option<Coord>; 4] {
        &self.candidates
    }

    /// Every queued candidate lies on the board and the active direction, if
    /// any, has a queued candidate. Always true for states built by play;
    /// restored states are checked with this before use.
    pub fn is_consistent(&self) -> bool {
        let on_board = self.candidates.iter().flatten().all(|c| c.in_bounds());
        let active_queued = self
            .active
            .map_or(true, |d| self.candidates[d.index()].is_some());
        on_board && active_queued
    }

    /// Fire exactly one shot at `board`, updating the hunt memory.
    pub fn take_shot<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        board: &mut Board,
    ) -> Result<(Coord, ShotResult), BoardError> {
        // drop queued targets that were resolved since they were stored
        while let Some(direction) = self.active {
            let queued = self.candidates[direction.index()];
            match queued {
                Some(target) if !board.cell(target)?.is_resolved() => break,
                _ => {
                    self.candidates[direction.index()] = None;
                    self.select_active();
                }
            }
        }

        match self.active {
            None => self.search(rng, board),
            Some(direction) => self.pursue(direction, board),
        }
    }

    fn search<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        board: &mut Board,
    ) -> Result<(Coord, ShotResult), BoardError> {
        let target = random_untried(rng, board)?;
        let result = board.apply_shot(target)?;
        trace!("hunt: random shot at {} -> {:?}", target, result);

        if result == ShotResult::Hit {
            for direction in Direction::ALL {
                self.candidates[direction.index()] = open_neighbour(board, target, direction);
            }
            self.select_active();
        }
        Ok((target, result))
    }

    fn pursue(
        &mut self,
        direction: Direction,
        board: &mut Board,
    ) -> Result<(Coord, ShotResult), BoardError> {
        let slot = direction.index();
        let target = match self.candidates[slot] {
            Some(target) => target,
            None => return Err(BoardError::NoTargetsLeft),
        };
        let result = board.apply_shot(target)?;
        trace!("hunt: pursuing {:?} at {} -> {:?}", direction, target, result);

        self.candidates[slot] = match result {
            ShotResult::Hit => open_neighbour(board, target, direction),
            ShotResult::Miss | ShotResult::AlreadyTried => None,
        };
        self.select_active();
        Ok((target, result))
    }

    /// First non-empty slot in Up, Down, Left, Right order.
    fn select_active(&mut self) {
        self.active = Direction::ALL
            .into_iter()
            .find(|d| self.candidates[d.index()].is_some());
    }
}

/// Neighbour of `from` in `direction` that is on the board and not yet resolved.
fn open_neighbour(board: &Board, from: Coord, direction: Direction) -> Option<Coord> {
    let next = from.step(direction)?;
    match board.cell(next) {
        Ok(cell) if !cell.is_resolved() => Some(next),
        _ => None,
    }
}

/// Uniformly chosen cell that is neither `Hit` nor `Miss`.
fn random_untried<R: Rng + ?Sized>(rng: &mut R, board: &Board) -> Result<Coord, BoardError> {
    let untried = move || {
        Coord::all().filter(move |c| {
            board
                .cell(*c)
                .map(|cell| !cell.is_resolved())
                .unwrap_or(false)
        })
    };
    let total = untried().count();
    if total == 0 {
        return Err(BoardError::NoTargetsLeft);
    }
    let pick = rng.random_range(0..total);
    untried().nth(pick).ok_or(BoardError::NoTargetsLeft)
}
