//! Collision detection for axis-aligned boxes
//!
//! Platforms are one-way trampolines: they only catch a falling player whose
//! bottom edge crossed the platform top during this frame.

use super::state::{Item, Platform, Player, Rect};

/// Strict AABB overlap (touching edges don't count)
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Strict overlap of the horizontal extents only
#[inline]
pub fn horizontal_overlap(a: &Rect, b: &Rect) -> bool {
    a.right() > b.left() && a.left() < b.right()
}

/// Whether a falling player lands on `platform` this frame
///
/// The bottom edge must be within the landing band: from the platform top down to
/// the distance fallen this frame plus `tolerance`, so fast falls don't tunnel
/// through thin platforms.
pub fn lands_on(player: &Player, platform: &Platform, dt: f32, tolerance: f32) -> bool {
    if player.vel.y <= 0.0 {
        return false;
    }
    let top = platform.rect.top();
    let bottom = player.bottom();
    let band = player.vel.y * dt + tolerance;

    horizontal_overlap(&player.rect(), &platform.rect) && bottom >= top && bottom <= top + band
}

/// Top edge of the highest platform the player lands on this frame, if any
pub fn find_landing(player: &Player, platforms: &[Platform], dt: f32, tolerance: f32) -> Option<f32> {
    platforms
        .iter()
        .filter(|p| lands_on(player, p, dt, tolerance))
        .map(|p| p.rect.top())
        .min_by(f32::total_cmp)
}

/// Indices of balloons the player is touching
pub fn touched_items(player: &Player, items: &[Item]) -> Vec<usize> {
    let rect = player.rect();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| aabb_overlap(&rect, &item.rect))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ItemKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn falling_player(x: f32, bottom: f32, vy: f32) -> Player {
        let mut player = Player::spawn(&Tuning::default());
        player.pos = Vec2::new(x, bottom - player.size.y);
        player.vel = Vec2::new(0.0, vy);
        player
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(aabb_overlap(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges
        assert!(!aabb_overlap(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!aabb_overlap(&a, &Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_lands_within_band() {
        let platform = Platform::new(200.0, 500.0);
        // Crossed the top by 3px falling at 300px/s
        let player = falling_player(215.0, 503.0, 300.0);
        assert!(lands_on(&player, &platform, 0.016, 5.0));
    }

    #[test]
    fn test_no_landing_while_rising() {
        let platform = Platform::new(200.0, 500.0);
        let player = falling_player(215.0, 503.0, -300.0);
        assert!(!lands_on(&player, &platform, 0.016, 5.0));
    }

    #[test]
    fn test_no_landing_below_band() {
        let platform = Platform::new(200.0, 500.0);
        // 300 * 0.016 + 5 = 9.8px band
        let player = falling_player(215.0, 512.0, 300.0);
        assert!(!lands_on(&player, &platform, 0.016, 5.0));
    }

    #[test]
    fn test_fast_fall_still_lands() {
        let platform = Platform::new(200.0, 500.0);
        // 2000px/s over a clamped 0.1s frame moves 200px past a 20px platform
        let player = falling_player(215.0, 690.0, 2000.0);
        assert!(lands_on(&player, &platform, 0.1, 5.0));
    }

    #[test]
    fn test_no_landing_without_horizontal_overlap() {
        let platform = Platform::new(300.0, 500.0);
        let player = falling_player(200.0, 503.0, 300.0);
        assert!(!lands_on(&player, &platform, 0.016, 5.0));
    }

    #[test]
    fn test_find_landing_prefers_highest() {
        let platforms = [Platform::new(200.0, 505.0), Platform::new(200.0, 500.0)];
        let player = falling_player(215.0, 507.0, 300.0);
        assert_eq!(find_landing(&player, &platforms, 0.016, 5.0), Some(500.0));
    }

    #[test]
    fn test_touched_items() {
        let player = falling_player(215.0, 400.0, 0.0);
        let items = [
            Item::above_platform(ItemKind::DoubleJump, 200.0, 420.0),
            Item::above_platform(ItemKind::JumpBoost, 0.0, 100.0),
        ];
        assert_eq!(touched_items(&player, &items), vec![0]);
    }
}
