//! Per-difficulty high scores
//!
//! One best survival time (whole seconds) per difficulty. The simulation
//! writes through a [`HighScoreStore`]; back ends are in-memory, a JSON file
//! (native) and LocalStorage (wasm32).

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Persistent key-value store for best scores. Missing entries read as 0.
pub trait HighScoreStore {
    fn get_high_score(&self, difficulty: Difficulty) -> u32;
    fn set_high_score(&mut self, difficulty: Difficulty, score: u32);
}

/// Best score for each difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub hard: u32,
    #[serde(default)]
    pub god: u32,
}

impl HighScores {
    /// Read all three bests from a store
    pub fn load_from(store: &dyn HighScoreStore) -> Self {
        Self {
            medium: store.get_high_score(Difficulty::Medium),
            hard: store.get_high_score(Difficulty::Hard),
            god: store.get_high_score(Difficulty::God),
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::God => self.god,
        }
    }

    fn get_mut(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
            Difficulty::God => &mut self.god,
        }
    }

    /// Raise the best for `difficulty` if `score` beats it.
    /// Returns true if it did.
    pub fn record(&mut self, difficulty: Difficulty, score: u32) -> bool {
        let best = self.get_mut(difficulty);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }
}

/// Store kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub scores: HighScores,
    /// Number of writes received
    pub writes: usize,
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self, difficulty: Difficulty) -> u32 {
        self.scores.get(difficulty)
    }

    fn set_high_score(&mut self, difficulty: Difficulty, score: u32) {
        *self.scores.get_mut(difficulty) = score;
        self.writes += 1;
    }
}

/// Store backed by a JSON file, rewritten on every update
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    scores: HighScores,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open the store, starting fresh if the file is missing or unreadable
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let scores = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded high scores from {}", path.display());
                    scores
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high score file {}: {}", path.display(), e);
                    HighScores::default()
                }
            },
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                HighScores::default()
            }
        };
        Self { path, scores }
    }

    fn save(&self) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)?;
        log::debug!("Saved high scores to {}", self.path.display());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for JsonFileStore {
    fn get_high_score(&self, difficulty: Difficulty) -> u32 {
        self.scores.get(difficulty)
    }

    fn set_high_score(&mut self, difficulty: Difficulty, score: u32) {
        *self.scores.get_mut(difficulty) = score;
        if let Err(e) = self.save() {
            log::warn!("Failed to save high scores to {}: {}", self.path.display(), e);
        }
    }
}

/// Store backed by browser LocalStorage, one key per difficulty
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage_key(difficulty: Difficulty) -> String {
        format!("highScore_{}", difficulty.key())
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn get_high_score(&self, difficulty: Difficulty) -> u32 {
        Self::storage()
            .and_then(|s| s.get_item(&Self::storage_key(difficulty)).ok().flatten())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn set_high_score(&mut self, difficulty: Difficulty, score: u32) {
        match Self::storage() {
            Some(storage) => {
                if storage
                    .set_item(&Self::storage_key(difficulty), &score.to_string())
                    .is_err()
                {
                    log::warn!("LocalStorage rejected high score write");
                }
            }
            None => log::warn!("LocalStorage unavailable, high score not saved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_raises() {
        let mut scores = HighScores::default();
        assert!(scores.record(Difficulty::Hard, 12));
        assert!(!scores.record(Difficulty::Hard, 12));
        assert!(!scores.record(Difficulty::Hard, 5));
        assert_eq!(scores.get(Difficulty::Hard), 12);
        assert_eq!(scores.get(Difficulty::Medium), 0);
    }

    #[test]
    fn test_difficulties_are_independent() {
        let mut store = MemoryStore::default();
        store.set_high_score(Difficulty::God, 99);
        let scores = HighScores::load_from(&store);
        assert_eq!(scores.god, 99);
        assert_eq!(scores.medium, 0);
        assert_eq!(scores.hard, 0);
    }

    #[test]
    fn test_missing_json_fields_default_to_zero() {
        let scores: HighScores = serde_json::from_str(r#"{ "hard": 7 }"#).unwrap();
        assert_eq!(scores, HighScores { medium: 0, hard: 7, god: 0 });
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_persists() {
        let path = std::env::temp_dir().join(format!(
            "ball_dodge_scores_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get_high_score(Difficulty::Medium), 0);
        store.set_high_score(Difficulty::Medium, 42);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get_high_score(Difficulty::Medium), 42);

        let _ = std::fs::remove_file(&path);
    }
}
