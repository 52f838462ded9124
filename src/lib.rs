//! KWME Jump - An infinite jumper arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, world generation, camera scroll)
//! - `game`: START / PLAYING / GAMEOVER state machine driven by the host loop
//! - `input`: Keyboard to intent mapping
//! - `leaderboard`: Remote leaderboard with local fallback
//! - `platform`: Browser/native platform abstraction (storage, HTTP)
//! - `renderer`: Render sink contract (Canvas2D on web)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod input;
pub mod leaderboard;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, GamePhase};
pub use leaderboard::{Leaderboard, LeaderboardEntry, ScoreBoard, SubmitOutcome};
pub use settings::Settings;
pub use tuning::{TimeStep, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep for `TimeStep::Fixed` (one frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Logical playfield size (mobile-friendly portrait)
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player bounding box
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Spawn height above the bottom of the screen (top edge)
    pub const PLAYER_SPAWN_OFFSET: f32 = 150.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 80.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    /// Ground platform sits this far above the bottom of the screen
    pub const GROUND_OFFSET: f32 = 50.0;
    pub const GROUND_HEIGHT: f32 = 20.0;

    /// Items float above their platform
    pub const ITEM_SIZE: f32 = 30.0;
    pub const ITEM_HEIGHT: f32 = ITEM_SIZE * 1.33;
    pub const ITEM_HOVER_GAP: f32 = 10.0;

    /// Entities below `SCREEN_HEIGHT + CULL_MARGIN` are dropped
    pub const CULL_MARGIN: f32 = 50.0;
    /// Extend the world while the frontier platform is below this y
    pub const FRONTIER_THRESHOLD: f32 = -50.0;
    /// Initial build keeps generating until the frontier reaches this y
    pub const INITIAL_CEILING: f32 = -1000.0;
    /// Number of easy-mode platforms at the start of a session
    pub const EASY_PLATFORM_COUNT: usize = 5;

    /// Background clouds
    pub const CLOUD_COUNT: usize = 10;
    pub const CLOUD_PARALLAX: f32 = 0.5;
    /// Wrapped clouds reappear at this y
    pub const CLOUD_RESPAWN_Y: f32 = -50.0;
}

/// Wrap an x coordinate once across the playfield width
#[inline]
pub fn wrap_once(x: f32, width: f32) -> f32 {
    if x < 0.0 {
        x + width
    } else if x > width {
        x - width
    } else {
        x
    }
}
