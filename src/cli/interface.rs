#![cfg(feature = "std")]

//! Board rendering and coordinate parsing for the terminal.

use crate::core::{Board, CellState, Coord, GameSession, BOARD_SIZE};
use crate::storage::StatsRepository;

/// Parse `A5`-style input into a coordinate (column letter, 1-based row).
pub fn parse_coord(input: &str) -> Result<Coord, String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-J", col_ch));
    }
    let col = (col_ch as u8 - b'A') as usize;
    if col >= BOARD_SIZE {
        return Err(format!("Column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 || row > BOARD_SIZE {
        return Err(format!("Row {} out of bounds - must be 1-10", row));
    }
    Ok(Coord::new(row - 1, col))
}

/// Character shown for a cell. Unhit ships are drawn only when `reveal` is set.
pub fn cell_char(cell: CellState, reveal: bool) -> char {
    match cell {
        CellState::Hit => 'X',
        CellState::Miss => 'o',
        CellState::Ship if reveal => 'S',
        _ => '.',
    }
}

/// Render a board as text lines.
pub fn render_board(board: &Board, reveal: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(BOARD_SIZE + 1);
    let header: String = (0..BOARD_SIZE)
        .map(|c| format!(" {}", (b'A' + c as u8) as char))
        .collect();
    lines.push(format!("   {}", header));
    for (r, row) in board.cells().iter().enumerate() {
        let cells: String = row.iter().map(|&c| format!(" {}", cell_char(c, reveal))).collect();
        lines.push(format!("{:2} {}", r + 1, cells));
    }
    lines
}

/// Display the opponent board (ships hidden) next to the player's board.
pub fn print_session(session: &GameSession) {
    let enemy = render_board(session.opponent_board(), false);
    let own = render_board(session.player_board(), true);
    println!("{:<26}   {}", "Enemy waters", "Your fleet");
    for (left, right) in enemy.iter().zip(own.iter()) {
        println!("{:<26}   {}", left, right);
    }
    println!(
        "Enemy squares left: {:<8}   Your squares left: {}",
        session.opponent_remaining(),
        session.player_remaining()
    );
    if !session.player_name().is_empty() {
        println!("Player: {}", session.player_name());
    }
}

/// Print the stats table.
pub fn print_stats(stats: &StatsRepository) {
    if stats.records().is_empty() {
        println!("No recorded matches.");
        return;
    }
    println!("{:<20} {:>5} {:>7} {:>8} {:>5}", "Name", "Wins", "Losses", "Average", "Best");
    for r in stats.records() {
        println!(
            "{:<20} {:>5} {:>7} {:>8} {:>5}",
            r.name, r.wins, r.losses, r.average_score, r.best_score
        );
    }
}
