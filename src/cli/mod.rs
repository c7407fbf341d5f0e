//! Terminal driver for the engine
//!
//! This module provides:
//! - Board and stats display functions
//! - The command parser and interactive loop used by `broadside play`

#![cfg(feature = "std")]

pub mod interface;

pub use interface::*;

use std::io::{self, BufRead, Write};

use log::debug;

use crate::core::{Coord, Mode};
use crate::engine::Engine;

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place a ship or fire, depending on the game mode.
    Target(Coord),
    Rotate,
    Save,
    Load,
    NewGame(String),
    Stats,
    Help,
    Quit,
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "" => Err("Enter a coordinate like A5, or 'help'".to_string()),
        "r" | "rotate" => Ok(Command::Rotate),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        "new" => Ok(Command::NewGame(rest.to_string())),
        "stats" => Ok(Command::Stats),
        "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => parse_coord(word).map(Command::Target),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  A5          place the current ship (placement) or fire (battle)");
    println!("  r, rotate   toggle horizontal/vertical placement");
    println!("  save        save the game (battle only)");
    println!("  load        resume the saved game");
    println!("  new [NAME]  start over; leave NAME empty to play anonymously");
    println!("  stats       show player statistics");
    println!("  quit        leave");
}

/// Read commands from stdin until `quit` or end of input.
pub fn run_interactive(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!();
        if engine.session().mode() != Mode::PreGame {
            print_session(engine.session());
        }
        println!("{}", engine.status());
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };
        debug!("command: {:?}", command);

        // engine errors are already reflected in the status line
        match command {
            Command::Target(coord) => match engine.session().mode() {
                Mode::PlacingHorizontal | Mode::PlacingVertical => {
                    let _ = engine.place_ship(coord);
                }
                _ => {
                    let _ = engine.fire_at(coord);
                }
            },
            Command::Rotate => {
                let _ = engine.toggle_orientation();
            }
            Command::Save => {
                let _ = engine.save_session();
            }
            Command::Load => {
                let _ = engine.load_session();
            }
            Command::NewGame(name) => engine.new_game(&name),
            Command::Stats => print_stats(engine.stats()),
            Command::Help => print_help(),
            Command::Quit => return Ok(()),
        }
    }
}
