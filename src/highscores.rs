//! Best score tracking for the snake game
//!
//! Storage belongs to the host. The core only asks a `ScoreStore` for the
//! current best and tells it about a new one.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Persistence collaborator for a single best-score integer
pub trait ScoreStore {
    fn load_best(&mut self) -> Result<u32, SettingsError>;
    fn save_best(&mut self, score: u32) -> Result<(), SettingsError>;
}

/// Keeps the best score in memory only
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub best: u32,
}

impl ScoreStore for MemoryStore {
    fn load_best(&mut self) -> Result<u32, SettingsError> {
        Ok(self.best)
    }

    fn save_best(&mut self, score: u32) -> Result<(), SettingsError> {
        self.best = score;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreFile {
    best: u32,
}

/// Stores the best score as a small JSON document
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileStore {
    fn load_best(&mut self) -> Result<u32, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str::<BestScoreFile>(&json)?.best),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save_best(&mut self, score: u32) -> Result<(), SettingsError> {
        let json = serde_json::to_string(&BestScoreFile { best: score })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory view of the best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    best: u32,
}

impl BestScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Read the best score from a store (a broken store counts as no best yet)
    pub fn load(store: &mut dyn ScoreStore) -> Self {
        match store.load_best() {
            Ok(best) => Self { best },
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                Self::default()
            }
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished game. Returns true if it set a new best.
    pub fn submit(&mut self, score: u32, store: &mut dyn ScoreStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = store.save_best(score) {
            log::warn!("Could not save best score: {}", e);
        }
        log::info!("New best score: {}", score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strictly_higher_scores_qualify() {
        let best = BestScore::new(50);
        assert!(!best.qualifies(0));
        assert!(!best.qualifies(50));
        assert!(best.qualifies(60));
    }

    #[test]
    fn test_submit_updates_store() {
        let mut store = MemoryStore::default();
        let mut best = BestScore::load(&mut store);
        assert_eq!(best.best(), 0);

        assert!(best.submit(30, &mut store));
        assert_eq!(store.best, 30);
        assert!(!best.submit(20, &mut store));
        assert_eq!(store.best, 30);
        assert_eq!(best.best(), 30);
    }

    #[test]
    fn test_zero_is_never_a_new_best() {
        let mut store = MemoryStore::default();
        let mut best = BestScore::default();
        assert!(!best.submit(0, &mut store));
    }

    #[test]
    fn test_json_file_store() {
        let path = std::env::temp_dir().join(format!("neon_best_{}.json", std::process::id()));
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load_best().unwrap(), 0);
        store.save_best(120).unwrap();
        assert_eq!(store.load_best().unwrap(), 120);
        let _ = std::fs::remove_file(&path);
    }
}
