use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::PersistenceError;

/// Win/loss history of one named player.
///
/// Scores are the remaining-cell margin of a match: positive for a win,
/// zero or negative for a loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub best_score: i32,
    pub average_score: i32,
}

impl PlayerRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            losses: 0,
            best_score: 0,
            average_score: 0,
        }
    }

    pub fn matches(&self) -> u32 {
        self.wins + self.losses
    }

    /// Fold one match into the record. The running mean uses truncating
    /// integer division so existing stats files keep their meaning.
    pub fn add_match(&mut self, score: i32) {
        if score > 0 {
            self.wins += 1;
            self.best_score = self.best_score.max(score);
        } else {
            self.losses += 1;
        }
        let n = self.matches() as i32;
        self.average_score = (self.average_score * (n - 1) + score) / n;
    }
}

/// All player records, rewritten wholesale to a JSON file after every change.
#[derive(Debug)]
pub struct StatsRepository {
    path: PathBuf,
    records: Vec<PlayerRecord>,
}

impl StatsRepository {
    /// Load the repository at `path`. A missing file starts an empty
    /// repository and writes it out straight away.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if path.is_file() {
            let data = fs::read_to_string(&path)?;
            let records: Vec<PlayerRecord> = serde_json::from_str(&data)?;
            debug!("loaded {} player records from {}", records.len(), path.display());
            return Ok(Self { path, records });
        }
        let repo = Self::empty(path);
        repo.persist()?;
        info!("created empty stats file at {}", repo.path.display());
        Ok(repo)
    }

    /// Empty repository bound to `path`. Nothing is written until the first
    /// change.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in the order players were first recorded.
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Add a finished match to `name`'s record. Anonymous matches are ignored.
    pub fn record_match(&mut self, name: &str, score: i32) -> Result<(), PersistenceError> {
        if name.is_empty() {
            return Ok(());
        }
        match self.records.iter_mut().find(|r| r.name == name) {
            Some(record) => record.add_match(score),
            None => {
                let mut record = PlayerRecord::new(name);
                record.add_match(score);
                self.records.push(record);
            }
        }
        info!("recorded match for {} with score {}", name, score);
        self.persist()
    }

    /// Delete `name`'s record. Returns whether one existed.
    pub fn clear_player(&mut self, name: &str) -> Result<bool, PersistenceError> {
        let before = self.records.len();
        self.records.retain(|r| r.name != name);
        let removed = self.records.len() != before;
        self.persist()?;
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> Result<(), PersistenceError> {
        self.records.clear();
        self.persist()
    }

    /// Zero `name`'s best score. Returns whether the player exists.
    pub fn reset_best_score(&mut self, name: &str) -> Result<bool, PersistenceError> {
        let found = match self.records.iter_mut().find(|r| r.name == name) {
            Some(record) => {
                record.best_score = 0;
                true
            }
            None => false,
        };
        self.persist()?;
        Ok(found)
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let data = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
