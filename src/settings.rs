//! Player settings
//!
//! Persisted separately from the leaderboard under its own storage key.

use serde::{Deserialize, Serialize};

use crate::leaderboard::LeaderboardConfig;
use crate::platform::KeyValueStore;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last name entered on the game over screen
    pub username: String,
    /// Physics and generation constants
    pub tuning: Tuning,
    /// Leaderboard credentials; blank fields fall back to the environment
    pub leaderboard: LeaderboardConfig,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "kwmejump_settings";

    /// Load settings, falling back to defaults for anything missing or invalid
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };

        let mut settings: Settings = match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                return Self::default();
            }
        };

        settings.tuning = settings.tuning.or_default();
        log::info!("Loaded settings");
        settings
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::error!("Failed to save settings: {}", e),
            },
            Err(e) => log::error!("Failed to serialize settings: {}", e),
        }
    }

    /// Stored leaderboard credentials, with the environment filling the gaps
    pub fn leaderboard_config(&self) -> LeaderboardConfig {
        let env = LeaderboardConfig::from_env();
        let pick = |stored: &Option<String>, env: Option<String>| {
            stored
                .clone()
                .filter(|s| !s.trim().is_empty())
                .or(env)
        };
        LeaderboardConfig {
            url: pick(&self.leaderboard.url, env.url),
            anon_key: pick(&self.leaderboard.anon_key, env.anon_key),
        }
    }
}
