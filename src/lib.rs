//! Pumpkin Patch - a to-do list with a little world to walk around in
//!
//! Core modules:
//! - `sim`: Movement, collision, camera and spawn placement (pure, seeded)
//! - `tuning`: Data-driven world balance
//! - `ledger`: Currency ledger boundary (pickup rewards, spawn multiplier)
//! - `costume`: Cosmetic outfit lookup

pub mod costume;
pub mod error;
pub mod ledger;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use ledger::{CurrencyLedger, Wallet};
pub use tuning::{HitboxProfile, HitboxTable, Tuning};

use glam::Vec2;

/// World configuration constants
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 1500.0;
    /// Everything above this fraction of the world height is sky (not walkable)
    pub const FLOOR_BOUNDARY_FRACTION: f32 = 0.29;

    /// Footprint side lengths
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const COLLECTIBLE_SIZE: f32 = 40.0;

    /// Continuous movement speed (world units per second)
    pub const MOVE_SPEED: f32 = 240.0;
    /// Single tap nudge distance
    pub const NUDGE_STEP: f32 = 20.0;
    /// Largest elapsed time a single tick may consume (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Obstacle sprite base size before scaling
    pub const OBSTACLE_BASE_SIZE: f32 = 96.0;
    pub const OBSTACLE_MIN_SCALE: f32 = 0.9;
    pub const OBSTACLE_MAX_SCALE: f32 = 1.6;

    /// Tree trunk hit-box, as a fraction of the footprint
    pub const TREE_HITBOX_WIDTH: f32 = 0.12;
    pub const TREE_HITBOX_HEIGHT: f32 = 0.30;
    /// Rocks are squat, so most of the sprite is solid
    pub const ROCK_HITBOX_WIDTH: f32 = 0.45;
    pub const ROCK_HITBOX_HEIGHT: f32 = 0.35;

    /// Spawn search retry budget
    pub const SPAWN_MAX_ATTEMPTS: u32 = 40;
    /// Collectibles land in this ring around the reference point
    pub const COLLECTIBLE_MIN_RADIUS: f32 = 80.0;
    pub const COLLECTIBLE_MAX_RADIUS: f32 = 320.0;
    /// Deterministic fallback step for collectibles
    pub const COLLECTIBLE_FALLBACK_STEP: f32 = 48.0;

    /// Pickup reward range (inclusive)
    pub const REWARD_MIN: u32 = 1;
    pub const REWARD_MAX: u32 = 50;

    /// Viewport used until the host reports its real size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 390.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 844.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, 0.0);
        assert!((p.x - 10.0).abs() < 1e-5 && p.y.abs() < 1e-5);

        let p = polar_to_cartesian(10.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-5 && (p.y - 10.0).abs() < 1e-5);
    }
}
