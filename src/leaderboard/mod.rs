//! Leaderboard
//!
//! One interface, two implementations picked once at construction:
//! - [`RemoteScoreBoard`]: Supabase REST table, falls back to local on any failure
//! - [`LocalScoreBoard`]: key-value storage only (offline mode)
//!
//! Nothing here can fail loudly: every error ends up as a user-facing message
//! and the game never waits on it.

pub mod local;
pub mod remote;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use local::{LocalScoreBoard, MAX_DISPLAYED, MAX_STORED, Ranking};
pub use remote::{RemoteScoreBoard, SupabaseApi};

use crate::platform::{KeyValueStore, StorageError, Transport, TransportError};

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
}

/// Result of a score submission, shown to the player as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmitOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Leaderboard failure modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// URL or API key missing
    NotConfigured,
    EmptyUsername,
    /// No response from the backend
    Unreachable(String),
    /// Response didn't parse
    Malformed(String),
    /// Backend column can't hold the score
    ScoreOutOfRange { score: u64 },
    /// Backend answered with an error status
    Rejected { status: u16, message: String },
    Storage(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "leaderboard url or key missing"),
            Self::EmptyUsername => write!(f, "Please enter a name"),
            Self::Unreachable(msg) => write!(f, "leaderboard unreachable: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed leaderboard response: {msg}"),
            Self::ScoreOutOfRange { score } => {
                write!(f, "score {score} is out of range for the leaderboard")
            }
            Self::Rejected { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Storage(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

impl From<StorageError> for LeaderboardError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<TransportError> for LeaderboardError {
    fn from(e: TransportError) -> Self {
        Self::Unreachable(e.0)
    }
}

/// Trimmed, non-empty username
pub(crate) fn validate_username(username: &str) -> Result<&str, LeaderboardError> {
    let name = username.trim();
    if name.is_empty() {
        return Err(LeaderboardError::EmptyUsername);
    }
    Ok(name)
}

/// Remote leaderboard credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl LeaderboardConfig {
    /// Read `SUPABASE_URL` / `SUPABASE_ANON_KEY` (baked in at build time on web)
    pub fn from_env() -> Self {
        #[cfg(target_arch = "wasm32")]
        let (url, anon_key) = (
            option_env!("SUPABASE_URL").map(str::to_string),
            option_env!("SUPABASE_ANON_KEY").map(str::to_string),
        );
        #[cfg(not(target_arch = "wasm32"))]
        let (url, anon_key) = (
            std::env::var("SUPABASE_URL").ok(),
            std::env::var("SUPABASE_ANON_KEY").ok(),
        );
        Self { url, anon_key }
    }

    /// Both values, if present and non-blank
    pub fn credentials(&self) -> Result<(&str, &str), LeaderboardError> {
        let url = self.url.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let key = self.anon_key.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (url, key) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => Err(LeaderboardError::NotConfigured),
        }
    }
}

/// Score submission and retrieval
// Single-threaded (wasm) callers only, so no Send bound on the futures
#[allow(async_fn_in_trait)]
pub trait ScoreBoard {
    /// Whether scores go to the shared remote board
    fn is_online(&self) -> bool;

    /// Best scores, highest first
    async fn fetch_top(&self, n: usize) -> Vec<LeaderboardEntry>;

    async fn submit(&mut self, username: &str, score: u64) -> SubmitOutcome;
}

/// Leaderboard selected at startup: remote when configured, local otherwise
#[derive(Debug, Clone)]
pub enum Leaderboard<T, S> {
    Remote(RemoteScoreBoard<T, S>),
    Local {
        board: LocalScoreBoard<S>,
        /// Why the remote board isn't used
        reason: String,
    },
}

impl<T: Transport, S: KeyValueStore> Leaderboard<T, S> {
    /// Pick the implementation; `transport` is None where no HTTP client exists
    pub fn connect(config: &LeaderboardConfig, transport: Option<T>, store: S) -> Self {
        let reason = match (config.credentials(), transport) {
            (Ok((url, key)), Some(transport)) => {
                log::info!("Leaderboard online: {}", url);
                let api = SupabaseApi::new(url, key);
                return Leaderboard::Remote(RemoteScoreBoard::new(api, transport, store));
            }
            (Err(e), _) => e.to_string(),
            (Ok(_), None) => "no HTTP transport on this platform".to_string(),
        };
        log::warn!("Switching to offline leaderboard: {}", reason);
        Leaderboard::Local {
            board: LocalScoreBoard::new(store),
            reason,
        }
    }

    pub fn offline_reason(&self) -> Option<&str> {
        match self {
            Leaderboard::Remote(_) => None,
            Leaderboard::Local { reason, .. } => Some(reason),
        }
    }
}

impl<T: Transport, S: KeyValueStore> ScoreBoard for Leaderboard<T, S> {
    fn is_online(&self) -> bool {
        matches!(self, Leaderboard::Remote(_))
    }

    async fn fetch_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        match self {
            Leaderboard::Remote(board) => board.fetch_top(n).await,
            Leaderboard::Local { board, .. } => board.fetch_top(n).await,
        }
    }

    async fn submit(&mut self, username: &str, score: u64) -> SubmitOutcome {
        match self {
            Leaderboard::Remote(board) => board.submit(username, score).await,
            Leaderboard::Local { board, .. } => board.submit(username, score).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{ScriptedTransport, block_on};
    use super::*;
    use crate::platform::MemoryStore;

    fn configured() -> LeaderboardConfig {
        LeaderboardConfig {
            url: Some("https://example.supabase.co".into()),
            anon_key: Some("anon".into()),
        }
    }

    #[test]
    fn test_missing_config_goes_offline() {
        let config = LeaderboardConfig {
            url: Some("https://example.supabase.co".into()),
            anon_key: Some("  ".into()),
        };
        let board: Leaderboard<ScriptedTransport, _> =
            Leaderboard::connect(&config, Some(ScriptedTransport::default()), MemoryStore::new());
        assert!(!board.is_online());
        assert_eq!(board.offline_reason(), Some("leaderboard url or key missing"));
    }

    #[test]
    fn test_missing_transport_goes_offline() {
        let board: Leaderboard<ScriptedTransport, _> =
            Leaderboard::connect(&configured(), None, MemoryStore::new());
        assert!(!board.is_online());
    }

    #[test]
    fn test_offline_uses_local_store() {
        let mut board: Leaderboard<ScriptedTransport, _> =
            Leaderboard::connect(&LeaderboardConfig::default(), None, MemoryStore::new());
        let outcome = block_on(board.submit("ada", 420));
        assert_eq!(outcome, SubmitOutcome::ok("Score saved locally."));
        let top = block_on(board.fetch_top(10));
        assert_eq!(top, vec![LeaderboardEntry { username: "ada".into(), score: 420 }]);
    }

    #[test]
    fn test_configured_goes_online() {
        let transport = ScriptedTransport::with(vec![ScriptedTransport::reply(
            200,
            r#"[{"username":"ada","score":900}]"#,
        )]);
        let board = Leaderboard::connect(&configured(), Some(transport), MemoryStore::new());
        assert!(board.is_online());
        assert_eq!(board.offline_reason(), None);
        let top = block_on(board.fetch_top(10));
        assert_eq!(top[0].score, 900);
    }
}
