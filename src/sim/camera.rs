//! Upward-only scrolling camera
//!
//! The camera never moves; the world does. When the player climbs above the
//! screen midpoint everything shifts down to re-pin them there, and the shift
//! is the score.

use rand::Rng;

use super::generate;
use super::state::{GameWorld, SimError};
use crate::consts::*;

/// Re-pin the player at the midpoint if they climbed above it
///
/// Returns the displacement applied this frame (0 if the camera didn't move).
pub fn scroll(world: &mut GameWorld) -> Result<f32, SimError> {
    let midpoint = SCREEN_HEIGHT / 2.0;
    if world.player.pos.y >= midpoint {
        return Ok(0.0);
    }

    let diff = midpoint - world.player.pos.y;
    world.player.pos.y += diff;
    world.camera_y += diff;
    world.score += diff.floor() as u64;

    for platform in &mut world.platforms {
        platform.rect.pos.y += diff;
    }
    for item in &mut world.items {
        item.rect.pos.y += diff;
    }
    for cloud in &mut world.clouds {
        cloud.pos.y += diff * cloud.parallax;
        if cloud.pos.y > SCREEN_HEIGHT {
            cloud.pos.y = CLOUD_RESPAWN_Y;
            cloud.pos.x = world.rng.random_range(0.0..SCREEN_WIDTH);
        }
    }

    generate::prune(world);
    generate::extend_frontier(world)?;
    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Cloud, Platform};
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_no_scroll_below_midpoint() {
        let mut world = GameWorld::new(3, Tuning::default());
        let before = world.platforms.clone();
        world.player.pos.y = 500.0;
        assert_eq!(scroll(&mut world).unwrap(), 0.0);
        assert_eq!(world.platforms, before);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_scroll_shifts_world() {
        let mut world = GameWorld::empty(3, Tuning::default());
        world.platforms.push(Platform::new(100.0, -300.0));
        world.clouds.push(Cloud {
            pos: Vec2::new(50.0, 100.0),
            size: 30.0,
            parallax: CLOUD_PARALLAX,
        });
        world.player.pos.y = 387.6;

        let diff = scroll(&mut world).unwrap();
        assert!((diff - 12.4).abs() < 0.001);
        assert_eq!(world.player.pos.y, 400.0);
        assert_eq!(world.score, 12);
        assert!((world.camera_y - 12.4).abs() < 0.001);
        assert!((world.platforms[0].rect.top() - -287.6).abs() < 0.001);
        assert!((world.clouds[0].pos.y - 106.2).abs() < 0.001);
    }

    #[test]
    fn test_cloud_wraps_to_top() {
        let mut world = GameWorld::empty(3, Tuning::default());
        world.platforms.push(Platform::new(100.0, -300.0));
        world.clouds.push(Cloud {
            pos: Vec2::new(50.0, SCREEN_HEIGHT - 1.0),
            size: 30.0,
            parallax: CLOUD_PARALLAX,
        });
        world.player.pos.y = 380.0;
        scroll(&mut world).unwrap();
        assert_eq!(world.clouds[0].pos.y, CLOUD_RESPAWN_Y);
        assert!((0.0..SCREEN_WIDTH).contains(&world.clouds[0].pos.x));
    }

    #[test]
    fn test_scroll_extends_frontier() {
        let mut world = GameWorld::empty(3, Tuning::default());
        world.platforms.push(Platform::new(100.0, -60.0));
        world.player.pos.y = 380.0;
        scroll(&mut world).unwrap();
        // Frontier moved to -40, below the threshold, so one platform is added
        assert_eq!(world.platforms.len(), 2);
    }

    #[test]
    fn test_scroll_prunes_fallen_platforms() {
        let mut world = GameWorld::empty(3, Tuning::default());
        world.platforms.push(Platform::new(100.0, -500.0));
        world.platforms.push(Platform::new(100.0, SCREEN_HEIGHT + CULL_MARGIN - 5.0));
        world.player.pos.y = 390.0;
        scroll(&mut world).unwrap();
        assert_eq!(world.platforms.len(), 1);
    }
}
