#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::PathBuf;

#[cfg(feature = "std")]
use broadside::{init_logging, print_stats, run_interactive, Engine, StatsRepository, StorageConfig};
#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// Directory holding the save slot and the stats file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play against the computer in the terminal.
    Play {
        /// Name to record stats under; omit to play anonymously.
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Resume the saved game instead of starting a new one.
        #[arg(long)]
        resume: bool,
    },
    /// Show or manage player statistics.
    Stats {
        #[command(subcommand)]
        action: Option<StatsAction>,
    },
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum StatsAction {
    /// Print every player record.
    Show,
    /// Delete one player's record.
    ClearPlayer { name: String },
    /// Delete every record.
    ClearAll,
    /// Reset one player's best score to zero.
    ResetBest { name: String },
}

#[cfg(feature = "std")]
fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = StorageConfig::resolve(cli.data_dir)?;

    match cli.command {
        Commands::Play { name, seed, resume } => {
            let rng = if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
                SmallRng::seed_from_u64(s)
            } else {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            };
            let mut engine = Engine::open(&config, rng);
            if resume {
                engine.resume_or_new_game(&name);
            } else {
                engine.new_game(&name);
            }
            run_interactive(&mut engine)?;
        }
        Commands::Stats { action } => {
            let mut stats = StatsRepository::open(config.stats_path())?;
            match action.unwrap_or(StatsAction::Show) {
                StatsAction::Show => print_stats(&stats),
                StatsAction::ClearPlayer { name } => {
                    if !stats.clear_player(&name)? {
                        println!("No record for {}", name);
                    }
                }
                StatsAction::ClearAll => stats.clear_all()?,
                StatsAction::ResetBest { name } => {
                    if !stats.reset_best_score(&name)? {
                        println!("No record for {}", name);
                    }
                }
            }
        }
    }
    Ok(())
}
