//! Simulation tick
//!
//! Core game loop step: input, integration, camera scroll, collisions, game-over.

use super::camera;
use super::collision::{find_landing, touched_items};
use super::state::{GameEvent, GameWorld, SimError};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal steering: -1 left, 0 none, 1 right
    pub steer: f32,
    /// Spend the double jump (ignored if the player doesn't have one)
    pub jump: bool,
    /// Demo mode - steering is chosen by the autopilot
    pub autopilot: bool,
}

/// What a tick did to the world
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// Camera displacement applied (>= 0)
    pub camera_diff: f32,
    /// Points added this tick
    pub score_delta: u64,
    pub events: Vec<GameEvent>,
    pub game_over: bool,
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut GameWorld, input: &TickInput, dt: f32) -> Result<TickOutcome, SimError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(SimError::InvalidDelta(dt));
    }

    let mut outcome = TickOutcome::default();
    world.time_ticks += 1;

    // Steering
    let steer = if input.autopilot {
        autopilot_steer(world)
    } else {
        input.steer.clamp(-1.0, 1.0)
    };
    let player = &mut world.player;
    player.vel.x = steer * world.tuning.move_speed;
    if steer > 0.0 {
        player.facing_right = true;
    } else if steer < 0.0 {
        player.facing_right = false;
    }

    if input.jump && player.try_double_jump() {
        outcome.events.push(GameEvent::DoubleJumped);
    }

    // Semi-implicit Euler: position from the old velocity, then gravity
    player.pos += player.vel * dt;
    player.vel.y += world.tuning.gravity * dt;

    // Cylindrical playfield
    if player.pos.x + player.size.x < 0.0 {
        player.pos.x = SCREEN_WIDTH;
    } else if player.pos.x > SCREEN_WIDTH {
        player.pos.x = -player.size.x;
    }

    if !player.pos.is_finite() || !player.vel.is_finite() {
        return Err(SimError::NonFinitePlayer {
            pos: player.pos,
            vel: player.vel,
        });
    }

    let score_before = world.score;
    outcome.camera_diff = camera::scroll(world)?;
    outcome.score_delta = world.score - score_before;

    // Platforms bounce, they don't stop
    if let Some(top) = find_landing(
        &world.player,
        &world.platforms,
        dt,
        world.tuning.collision_tolerance,
    ) {
        let player = &mut world.player;
        player.pos.y = top - player.size.y;
        player.vel.y = player.jump_force;
        outcome.events.push(GameEvent::Bounced);
    }

    // Balloons (removed back-to-front so indices stay valid)
    for index in touched_items(&world.player, &world.items).into_iter().rev() {
        let item = world.items.remove(index);
        world.player.apply_item(item.kind, &world.tuning);
        log::debug!("Collected {:?}", item.kind);
        outcome.events.push(GameEvent::ItemCollected(item.kind));
    }

    if world.player.pos.y > SCREEN_HEIGHT {
        outcome.game_over = true;
        outcome.events.push(GameEvent::GameOver { score: world.score });
    }

    Ok(outcome)
}

/// Demo steering: head for the centre of the lowest platform the player can still land on
pub fn autopilot_steer(world: &GameWorld) -> f32 {
    let player = &world.player;
    let centre = player.pos.x + player.size.x / 2.0;
    let bottom = player.bottom();

    // While rising, aim for the highest reachable platform; while falling, the nearest one below
    let apex = if player.vel.y < 0.0 {
        bottom - player.vel.y * player.vel.y / (2.0 * world.tuning.gravity)
    } else {
        bottom
    };

    let target = world
        .platforms
        .iter()
        .filter(|p| p.rect.top() >= apex && p.rect.top() < SCREEN_HEIGHT)
        .min_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))
        .map(|p| p.rect.left() + p.rect.size.x / 2.0);

    match target {
        Some(x) if (x - centre).abs() > 4.0 => (x - centre).signum(),
        _ => 0.0,
    }
}
