#![cfg(feature = "std")]

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BROADSIDE_DATA_DIR";
pub const SESSION_FILE: &str = "gamestate.bin";
pub const STATS_FILE: &str = "records.json";

/// Where the save slot and the stats file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Pick the data directory: explicit override, then `BROADSIDE_DATA_DIR`,
    /// then the platform data directory, then the current directory.
    pub fn resolve(explicit: Option<PathBuf>) -> io::Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        if let Some(dirs) = ProjectDirs::from("io.github", "broadside", "Broadside") {
            return Ok(Self::new(dirs.data_dir()));
        }
        Ok(Self::new(env::current_dir()?))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(STATS_FILE)
    }
}
