use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::PersistenceError;
use crate::core::{SessionSnapshot, NUM_SHIPS, SNAPSHOT_VERSION, TOTAL_SHIP_CELLS};

/// The single save slot. Each save overwrites the previous snapshot.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write `snapshot` to the slot, replacing whatever was there.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        let bytes = bincode::serialize(snapshot)?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, bytes)?;
        info!("saved game for {:?} to {}", snapshot.player_name, self.path.display());
        Ok(())
    }

    /// Read the slot. `Ok(None)` means nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no saved game at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot: SessionSnapshot = bincode::deserialize(&bytes)?;
        validate(&snapshot)?;
        info!("loaded game for {:?} from {}", snapshot.player_name, self.path.display());
        Ok(Some(snapshot))
    }
}

fn validate(snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::Corrupt(format!(
            "snapshot version {} is not supported (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    if snapshot.placements > NUM_SHIPS {
        return Err(PersistenceError::Corrupt(format!(
            "placement count {} exceeds fleet size {}",
            snapshot.placements, NUM_SHIPS
        )));
    }
    if !snapshot.hunt.is_consistent() {
        return Err(PersistenceError::Corrupt(format!(
            "opponent targeting state is inconsistent: {:?}",
            snapshot.hunt
        )));
    }
    for (side, board) in [
        ("player", &snapshot.player_board),
        ("opponent", &snapshot.opponent_board),
    ] {
        if board.ship_segments() > TOTAL_SHIP_CELLS {
            return Err(PersistenceError::Corrupt(format!(
                "{} board holds {} ship cells",
                side,
                board.ship_segments()
            )));
        }
    }
    Ok(())
}
