//! Fixed game dimensions and fleet.

pub const BOARD_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 6;

/// Ship lengths in placement order. The Nth placement always places `FLEET[N]`.
pub const FLEET: [usize; NUM_SHIPS] = [1, 1, 2, 2, 4, 6];

/// Total number of ship segments on a fully placed board.
pub const TOTAL_SHIP_CELLS: usize = 1 + 1 + 2 + 2 + 4 + 6;

/// Length of the ship placed by the given placement step, if any remain.
pub fn ship_length(placement: usize) -> Option<usize> {
    FLEET.get(placement).copied()
}
