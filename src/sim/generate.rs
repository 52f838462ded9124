//! Procedural platform and balloon generation
//!
//! Platforms are chained: each new one is placed a random gap above the previous
//! frontier, so the world only needs to keep pace with the camera.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameWorld, Item, ItemKind, Platform, SimError};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::wrap_once;

/// Coordinates of the platform following `(prev_x, prev_y)`
pub fn next_platform(
    rng: &mut Pcg32,
    tuning: &Tuning,
    prev_x: f32,
    prev_y: f32,
    easy: bool,
) -> (f32, f32) {
    let (max_gap, max_x_dist) = if easy {
        (tuning.easy_max_gap, tuning.easy_max_x_dist)
    } else {
        (tuning.max_gap, tuning.max_x_dist)
    };

    let y_gap = rng.random_range(tuning.min_gap..=max_gap);
    let x_dist = rng.random_range(-max_x_dist..=max_x_dist);

    let x = wrap_once(prev_x + x_dist, SCREEN_WIDTH).clamp(0.0, SCREEN_WIDTH - PLATFORM_WIDTH);
    (x, prev_y - y_gap)
}

/// Roll for a balloon over a freshly placed platform
pub fn roll_item(rng: &mut Pcg32, tuning: &Tuning, platform_x: f32, platform_y: f32) -> Option<Item> {
    if !rng.random_bool(tuning.item_chance) {
        return None;
    }
    let kind = if rng.random_bool(0.5) {
        ItemKind::DoubleJump
    } else {
        ItemKind::JumpBoost
    };
    let item = Item::above_platform(kind, platform_x, platform_y);
    log::debug!("Spawned {:?} balloon at {}", kind, item.rect.pos);
    Some(item)
}

/// Place one platform after `(prev_x, prev_y)`, maybe with a balloon
fn push_platform(world: &mut GameWorld, prev_x: f32, prev_y: f32, easy: bool) -> (f32, f32) {
    let (x, y) = next_platform(&mut world.rng, &world.tuning, prev_x, prev_y, easy);
    world.platforms.push(Platform::new(x, y));
    if let Some(item) = roll_item(&mut world.rng, &world.tuning, x, y) {
        world.items.push(item);
    }
    (x, y)
}

/// Lay down the ground, the easy opening and enough platforms to fill the first screens
pub fn build_initial(world: &mut GameWorld) {
    world.platforms.clear();
    world.items.clear();

    let ground = Platform::ground();
    let mut prev = (SCREEN_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0, ground.rect.top());
    world.platforms.push(ground);

    for _ in 0..EASY_PLATFORM_COUNT {
        prev = push_platform(world, prev.0, prev.1, true);
    }

    while prev.1 > INITIAL_CEILING {
        prev = push_platform(world, prev.0, prev.1, false);
    }
}

/// Add one platform above the frontier if the frontier has scrolled too close to the top
///
/// Returns whether a platform was added.
pub fn extend_frontier(world: &mut GameWorld) -> Result<bool, SimError> {
    let frontier = world.frontier()?.rect.pos;
    if frontier.y <= FRONTIER_THRESHOLD {
        return Ok(false);
    }
    push_platform(world, frontier.x, frontier.y, false);
    Ok(true)
}

/// Drop platforms and balloons that fell below the screen
pub fn prune(world: &mut GameWorld) {
    let limit = SCREEN_HEIGHT + CULL_MARGIN;
    world.platforms.retain(|p| p.rect.top() < limit);
    world.items.retain(|i| i.rect.top() < limit);
}
