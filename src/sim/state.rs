//! World state and core simulation types
//!
//! Everything the tick mutates lives in [`GameWorld`]; the renderer only reads it.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// The jumping character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing_right: bool,
    /// Current bounce velocity (negative = up)
    pub jump_force: f32,
    /// Bounce velocity at session start, reference for the boost cap
    pub base_jump_force: f32,
    /// One-shot mid-air jump granted by a balloon
    pub has_double_jump: bool,
}

impl Player {
    /// Player at the canonical spawn point, already mid-jump
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: Self::spawn_point(),
            vel: Vec2::new(0.0, tuning.jump_force),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            facing_right: true,
            jump_force: tuning.jump_force,
            base_jump_force: tuning.jump_force,
            has_double_jump: false,
        }
    }

    /// Bottom-centre of the screen, top-left corner of the box
    pub fn spawn_point() -> Vec2 {
        Vec2::new(
            SCREEN_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
            SCREEN_HEIGHT - PLAYER_SPAWN_OFFSET,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Spend the double jump, if held
    pub fn try_double_jump(&mut self) -> bool {
        if !self.has_double_jump {
            return false;
        }
        self.has_double_jump = false;
        self.vel.y = self.jump_force;
        true
    }

    /// Apply a collected balloon's effect
    pub fn apply_item(&mut self, kind: ItemKind, tuning: &Tuning) {
        match kind {
            ItemKind::DoubleJump => self.has_double_jump = true,
            ItemKind::JumpBoost => {
                // jump_force is negative: max() keeps the magnitude under the cap
                let cap = self.base_jump_force * tuning.boost_cap;
                self.jump_force = (self.jump_force * tuning.boost_factor).max(cap);
            }
        }
    }
}

/// A bounce platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, PLATFORM_WIDTH, PLATFORM_HEIGHT),
        }
    }

    /// Full-width floor under the spawn point
    pub fn ground() -> Self {
        Self {
            rect: Rect::new(0.0, SCREEN_HEIGHT - GROUND_OFFSET, SCREEN_WIDTH, GROUND_HEIGHT),
        }
    }
}

/// Balloon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Blue balloon: one extra mid-air jump
    DoubleJump,
    /// Red balloon: stronger bounces
    JumpBoost,
}

/// A floating balloon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub rect: Rect,
}

impl Item {
    /// Balloon centred over a platform whose top-left is `(platform_x, platform_y)`
    ///
    /// The top sits `ITEM_SIZE + ITEM_HOVER_GAP` above the platform, so the
    /// taller sprite box ends just short of the platform surface.
    pub fn above_platform(kind: ItemKind, platform_x: f32, platform_y: f32) -> Self {
        let x = platform_x + (PLATFORM_WIDTH - ITEM_SIZE) / 2.0;
        let y = platform_y - ITEM_SIZE - ITEM_HOVER_GAP;
        Self {
            kind,
            rect: Rect::new(x, y, ITEM_SIZE, ITEM_HEIGHT),
        }
    }
}

/// Background decoration (never collides)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub size: f32,
    /// Fraction of the camera scroll applied to this cloud
    pub parallax: f32,
}

/// Things that happened during a tick (for UI/host reactions)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player bounced off a platform
    Bounced,
    /// Player picked up a balloon
    ItemCollected(ItemKind),
    /// Player spent the double jump
    DoubleJumped,
    /// Player fell off the bottom of the screen
    GameOver { score: u64 },
}

/// Simulation contract violations
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Frontier lookup on an empty platform set
    NoPlatforms,
    /// Negative or non-finite time step
    InvalidDelta(f32),
    /// Player position or velocity became NaN/infinite
    NonFinitePlayer { pos: Vec2, vel: Vec2 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPlatforms => write!(f, "platform set is empty"),
            Self::InvalidDelta(dt) => write!(f, "invalid time step: {dt}"),
            Self::NonFinitePlayer { pos, vel } => {
                write!(f, "player state is not finite: pos={pos}, vel={vel}")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameWorld {
    /// Session seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub items: Vec<Item>,
    pub clouds: Vec<Cloud>,
    /// Pixels of net upward progress
    pub score: u64,
    /// Cumulative camera displacement
    pub camera_y: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameWorld {
    /// Fresh session: player at spawn, initial platforms and clouds laid out
    /// Generate a world; a tuning that fails validation is replaced by the defaults
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut world = Self::empty(seed, tuning.or_default());
        world.spawn_clouds();
        super::generate::build_initial(&mut world);
        log::info!(
            "World built (seed {}): {} platforms, {} items",
            seed,
            world.platforms.len(),
            world.items.len()
        );
        world
    }

    /// Player and RNG only, no platforms (for tests and custom layouts)
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            player: Player::spawn(&tuning),
            tuning,
            platforms: Vec::new(),
            items: Vec::new(),
            clouds: Vec::new(),
            score: 0,
            camera_y: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Topmost (minimum-y) platform, the generation anchor
    pub fn frontier(&self) -> Result<&Platform, SimError> {
        self.platforms
            .iter()
            .min_by(|a, b| a.rect.pos.y.total_cmp(&b.rect.pos.y))
            .ok_or(SimError::NoPlatforms)
    }

    fn spawn_clouds(&mut self) {
        self.clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud {
                pos: Vec2::new(
                    self.rng.random_range(0.0..SCREEN_WIDTH),
                    self.rng.random_range(0.0..SCREEN_HEIGHT),
                ),
                size: self.rng.random_range(20.0..50.0),
                parallax: CLOUD_PARALLAX,
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_tuning_builds_default_world() {
        for tuning in [
            Tuning {
                item_chance: 1.5,
                ..Default::default()
            },
            Tuning {
                min_gap: 100.0,
                max_gap: 60.0,
                ..Default::default()
            },
        ] {
            let world = GameWorld::new(5, tuning);
            assert_eq!(world.tuning, Tuning::default());
            assert!(world.platforms.len() > EASY_PLATFORM_COUNT);
        }
    }

    #[test]
    fn test_spawn_point() {
        let player = Player::spawn(&Tuning::default());
        assert_eq!(player.pos, Vec2::new(215.0, 650.0));
        assert_eq!(player.vel.y, -550.0);
        assert!(!player.has_double_jump);
    }

    #[test]
    fn test_jump_boost_is_capped() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(&tuning);

        player.apply_item(ItemKind::JumpBoost, &tuning);
        assert!((player.jump_force - -577.5).abs() < 0.01);

        for _ in 0..10 {
            player.apply_item(ItemKind::JumpBoost, &tuning);
        }
        assert!((player.jump_force - -605.0).abs() < 0.01);
    }

    #[test]
    fn test_double_jump_is_one_shot() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(&tuning);
        player.vel.y = 200.0;

        assert!(!player.try_double_jump());
        assert_eq!(player.vel.y, 200.0);

        player.apply_item(ItemKind::DoubleJump, &tuning);
        assert!(player.try_double_jump());
        assert_eq!(player.vel.y, tuning.jump_force);

        player.vel.y = 200.0;
        assert!(!player.try_double_jump());
        assert_eq!(player.vel.y, 200.0);
    }

    #[test]
    fn test_frontier() {
        let mut world = GameWorld::empty(1, Tuning::default());
        assert_eq!(world.frontier(), Err(SimError::NoPlatforms));

        world.platforms.push(Platform::new(10.0, 300.0));
        world.platforms.push(Platform::new(20.0, -40.0));
        world.platforms.push(Platform::new(30.0, 100.0));
        assert_eq!(world.frontier().unwrap().rect.pos.y, -40.0);
    }

    #[test]
    fn test_item_above_platform() {
        let item = Item::above_platform(ItemKind::DoubleJump, 100.0, 500.0);
        assert_eq!(item.rect.left(), 125.0);
        assert_eq!(item.rect.top(), 460.0);
        // Bottom hovers a fraction of a pixel over the platform
        assert!(item.rect.bottom() < 500.0);
        assert!(item.rect.bottom() > 499.5);
    }
}
