//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Seeded RNG only (same seed, same world)
//! - Time step supplied by the caller
//! - Errors are returned, never panicked

pub mod camera;
pub mod collision;
pub mod generate;
pub mod state;
pub mod tick;

pub use camera::scroll;
pub use collision::{aabb_overlap, find_landing, lands_on};
pub use generate::{build_initial, extend_frontier, next_platform, prune};
pub use state::{
    Cloud, GameEvent, GameWorld, Item, ItemKind, Platform, Player, Rect, SimError,
};
pub use tick::{TickInput, TickOutcome, autopilot_steer, tick};
