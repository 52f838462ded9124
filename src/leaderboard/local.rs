//! Local leaderboard
//!
//! Persisted to a key-value store (LocalStorage on web), keeps the top 50 scores
//! and shows the top 10. Used directly when offline and as the fallback when the
//! remote leaderboard fails.

use serde::{Deserialize, Serialize};

use super::{LeaderboardEntry, LeaderboardError, ScoreBoard, SubmitOutcome, validate_username};
use crate::platform::KeyValueStore;

/// Maximum number of scores to keep
pub const MAX_STORED: usize = 50;
/// Number of scores shown on the leaderboard
pub const MAX_DISPLAYED: usize = 10;

/// Storage key (shared with earlier releases)
pub const STORAGE_KEY: &str = "kwmejump_leaderboard";

/// Scores sorted highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking {
    pub entries: Vec<LeaderboardEntry>,
}

impl Ranking {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse stored JSON; anything unreadable is treated as an empty ranking
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Ranking>(json) {
            Ok(mut ranking) => {
                ranking.entries.sort_by(|a, b| b.score.cmp(&a.score));
                ranking.entries.truncate(MAX_STORED);
                ranking
            }
            Err(e) => {
                log::error!("Error reading local leaderboard: {}", e);
                Self::new()
            }
        }
    }

    /// Get the rank a score would achieve (1-indexed, None if it wouldn't be kept)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let rank = self.entries.iter().position(|e| score > e.score);
        match rank {
            Some(i) => Some(i + 1),
            None if self.entries.len() < MAX_STORED => Some(self.entries.len() + 1),
            None => None,
        }
    }

    /// Add a score, keeping the list sorted and bounded
    /// Returns the rank achieved (1-indexed) or None if it fell off the end
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_STORED);
        Some(rank)
    }

    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Leaderboard backed only by local storage
#[derive(Debug, Clone)]
pub struct LocalScoreBoard<S> {
    store: S,
}

impl<S: KeyValueStore> LocalScoreBoard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Ranking {
        match self.store.get(STORAGE_KEY) {
            Some(json) => Ranking::from_json(&json),
            None => Ranking::new(),
        }
    }

    /// Store a score; returns its rank if it made the cut
    pub fn record(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, LeaderboardError> {
        let mut ranking = self.load();
        let rank = ranking.insert(entry);
        let json = serde_json::to_string(&ranking)
            .map_err(|e| LeaderboardError::Malformed(e.to_string()))?;
        self.store.set(STORAGE_KEY, &json)?;
        log::info!("Local leaderboard saved ({} entries)", ranking.entries.len());
        Ok(rank)
    }
}

impl<S: KeyValueStore> ScoreBoard for LocalScoreBoard<S> {
    fn is_online(&self) -> bool {
        false
    }

    async fn fetch_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.load().top(n.min(MAX_DISPLAYED))
    }

    async fn submit(&mut self, username: &str, score: u64) -> SubmitOutcome {
        let username = match validate_username(username) {
            Ok(name) => name,
            Err(e) => return SubmitOutcome::failed(e.to_string()),
        };

        let entry = LeaderboardEntry {
            username: username.to_string(),
            score,
        };
        match self.record(entry) {
            Ok(_) => {
                log::info!("Score saved locally: {} - {}", username, score);
                SubmitOutcome::ok("Score saved locally.")
            }
            Err(e) => {
                log::error!("Error saving local score: {}", e);
                SubmitOutcome::failed("Failed to save score locally.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::test_support::block_on;
    use crate::platform::{MemoryStore, StorageError};

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            username: name.to_string(),
            score,
        }
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut ranking = Ranking::new();
        assert_eq!(ranking.insert(entry("a", 100)), Some(1));
        assert_eq!(ranking.insert(entry("b", 300)), Some(1));
        assert_eq!(ranking.insert(entry("c", 200)), Some(2));
        // Ties rank after existing scores
        assert_eq!(ranking.insert(entry("d", 200)), Some(3));

        let scores: Vec<u64> = ranking.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200, 200, 100]);
        assert_eq!(ranking.entries[1].username, "c");
        assert_eq!(ranking.top_score(), Some(300));
    }

    #[test]
    fn test_bounded_to_max_stored() {
        let mut ranking = Ranking::new();
        for score in 1..=60 {
            ranking.insert(entry("p", score));
        }
        assert_eq!(ranking.entries.len(), MAX_STORED);
        assert_eq!(ranking.entries.last().unwrap().score, 11);
        assert_eq!(ranking.insert(entry("late", 5)), None);
        assert_eq!(ranking.insert(entry("late", 1000)), Some(1));
        assert_eq!(ranking.entries.len(), MAX_STORED);
    }

    #[test]
    fn test_from_json_tolerates_garbage() {
        assert!(Ranking::from_json("not json").is_empty());
        assert!(Ranking::from_json(r#"{"username":"x","score":1}"#).is_empty());

        let ranking = Ranking::from_json(r#"[{"username":"a","score":5},{"username":"b","score":50}]"#);
        assert_eq!(ranking.top_score(), Some(50));
    }

    #[test]
    fn test_submit_and_fetch() {
        let mut board = LocalScoreBoard::new(MemoryStore::new());
        assert!(block_on(board.fetch_top(10)).is_empty());

        for i in 0..15u64 {
            let outcome = block_on(board.submit("kim", i * 10));
            assert!(outcome.success);
            assert_eq!(outcome.message, "Score saved locally.");
        }

        let top = block_on(board.fetch_top(10));
        assert_eq!(top.len(), MAX_DISPLAYED);
        assert_eq!(top[0].score, 140);
        // Display is capped even if more is asked for
        assert_eq!(block_on(board.fetch_top(40)).len(), MAX_DISPLAYED);
        // But everything is kept
        assert_eq!(board.load().entries.len(), 15);
    }

    #[test]
    fn test_submit_rejects_empty_username() {
        let mut board = LocalScoreBoard::new(MemoryStore::new());
        let outcome = block_on(board.submit("   ", 10));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Please enter a name");
        assert!(board.load().is_empty());
    }

    #[test]
    fn test_submit_reports_storage_failure() {
        struct FullStore;
        impl KeyValueStore for FullStore {
            fn get(&self, _key: &str) -> Option<String> {
                None
            }
            fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError("quota exceeded".into()))
            }
        }

        let mut board = LocalScoreBoard::new(FullStore);
        let outcome = block_on(board.submit("kim", 10));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to save score locally.");
    }
}
