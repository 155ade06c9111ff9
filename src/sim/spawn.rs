//! Spawn placement
//!
//! Bounded random search for a collision-free spot, with a deterministic
//! fallback when the budget runs out. Running out is never an error, but it
//! means the obstacle density is off, so debug builds log it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::WorldBounds;
use super::collision::collides_obstacle;
use super::obstacle::ObstacleField;
use super::rect::Rect;
use crate::polar_to_cartesian;

/// Offsets from world center tried in order when the player search fails
const PLAYER_FALLBACK_OFFSETS: [(f32, f32); 9] = [
    (0.0, 0.0),
    (120.0, 0.0),
    (-120.0, 0.0),
    (0.0, 120.0),
    (0.0, -120.0),
    (240.0, 120.0),
    (-240.0, 120.0),
    (240.0, -120.0),
    (-240.0, -120.0),
];

/// Where a spawn ended up and how
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnOutcome {
    pub position: Vec2,
    /// True if the random search ran out and the fallback was used
    pub fallback: bool,
}

/// Ring around a reference point where collectibles may land
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Annulus {
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Annulus {
    pub fn new(min_radius: f32, max_radius: f32) -> Self {
        Self {
            min_radius,
            max_radius,
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Vec2 {
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        let r = sample_between(rng, self.min_radius, self.max_radius);
        polar_to_cartesian(r, theta)
    }
}

fn sample_between<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// A placement query against one session's obstacles
#[derive(Debug, Clone, Copy)]
pub struct SpawnSearch<'a> {
    pub field: &'a ObstacleField,
    pub bounds: &'a WorldBounds,
    /// Footprint size of the entity being placed
    pub size: f32,
    /// Random attempts before falling back
    pub attempts: u32,
}

impl<'a> SpawnSearch<'a> {
    pub fn new(
        field: &'a ObstacleField,
        bounds: &'a WorldBounds,
        size: f32,
        attempts: u32,
    ) -> Self {
        Self {
            field,
            bounds,
            size,
            attempts,
        }
    }

    /// Inside the walkable region and clear of every obstacle hit-box
    pub fn is_safe(&self, pos: Vec2) -> bool {
        let rect = Rect::square(pos, self.size);
        self.bounds.contains(&rect) && !collides_obstacle(&rect, self.field)
    }

    /// Uniformly random spot in the walkable region; world center (then a
    /// fixed ring of offsets around it) if nothing turns up.
    pub fn find_safe_position<R: Rng>(&self, rng: &mut R) -> SpawnOutcome {
        let walk = self.bounds.walkable();
        for _ in 0..self.attempts {
            let candidate = Vec2::new(
                sample_between(rng, walk.left(), walk.right() - self.size),
                sample_between(rng, walk.top(), walk.bottom() - self.size),
            );
            if self.is_safe(candidate) {
                return SpawnOutcome {
                    position: candidate,
                    fallback: false,
                };
            }
        }

        if cfg!(debug_assertions) {
            log::warn!(
                "Spawn search exhausted {} attempts, falling back to world center",
                self.attempts
            );
        }

        let center = self.bounds.center_for(self.size);
        let position = PLAYER_FALLBACK_OFFSETS
            .iter()
            .map(|&(dx, dy)| self.bounds.clamp(center + Vec2::new(dx, dy), self.size))
            .find(|&p| self.is_safe(p))
            .unwrap_or(center);

        SpawnOutcome {
            position,
            fallback: true,
        }
    }

    /// Random spot in `annulus` around `reference`.
    ///
    /// The fallback steps diagonally away from `reference` by
    /// `step * (fallback_index + 1)` and clamps into the walkable region. It
    /// is not collision-checked: a best-effort placement, not a guarantee.
    pub fn find_near<R: Rng>(
        &self,
        reference: Vec2,
        annulus: Annulus,
        step: f32,
        fallback_index: u32,
        rng: &mut R,
    ) -> SpawnOutcome {
        for _ in 0..self.attempts {
            let candidate = reference + annulus.sample(rng);
            if self.is_safe(candidate) {
                return SpawnOutcome {
                    position: candidate,
                    fallback: false,
                };
            }
        }

        let distance = step * (fallback_index as f32 + 1.0);
        let position = self.bounds.clamp(reference + Vec2::splat(distance), self.size);
        if cfg!(debug_assertions) {
            log::warn!(
                "Collectible spawn near ({:.0}, {:.0}) exhausted {} attempts, using ({:.0}, {:.0})",
                reference.x,
                reference.y,
                self.attempts,
                position.x,
                position.y
            );
        }

        SpawnOutcome {
            position,
            fallback: true,
        }
    }
}
