//! Obstacle field generation
//!
//! A session gets one fixed set of decorative obstacles (trees and rocks).
//! Placement comes from a hand-tuned layout; scale and mirroring are rolled
//! from the session RNG so every session looks a little different.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::WorldBounds;
use super::rect::Rect;
use crate::tuning::{HitboxProfile, HitboxTable, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

/// Layout as fractions of the world size, spread over the floor band
const LAYOUT: [(f32, f32, ObstacleKind); 12] = [
    (0.06, 0.34, ObstacleKind::Tree),
    (0.27, 0.38, ObstacleKind::Tree),
    (0.52, 0.33, ObstacleKind::Tree),
    (0.78, 0.36, ObstacleKind::Tree),
    (0.14, 0.55, ObstacleKind::Rock),
    (0.40, 0.52, ObstacleKind::Tree),
    (0.66, 0.58, ObstacleKind::Tree),
    (0.89, 0.50, ObstacleKind::Tree),
    (0.05, 0.78, ObstacleKind::Tree),
    (0.33, 0.80, ObstacleKind::Tree),
    (0.58, 0.76, ObstacleKind::Rock),
    (0.84, 0.82, ObstacleKind::Tree),
];

/// A placed obstacle. Immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Sprite drawn flipped horizontally (cosmetic)
    pub mirrored: bool,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, scale: f32, kind: ObstacleKind) -> Self {
        Self {
            x,
            y,
            scale,
            mirrored: false,
            kind,
        }
    }

    /// Side length of the square sprite footprint
    #[inline]
    pub fn size(&self, base_size: f32) -> f32 {
        base_size * self.scale
    }

    pub fn footprint(&self, base_size: f32) -> Rect {
        let size = self.size(base_size);
        Rect::new(self.x, self.y, size, size)
    }

    /// Solid part of the sprite: horizontally centered, anchored to the bottom
    /// edge of the footprint. Computed on demand so it always follows `scale`.
    pub fn hitbox(&self, base_size: f32, profile: HitboxProfile) -> Rect {
        let size = self.size(base_size);
        let w = size * profile.width_ratio;
        let h = size * profile.height_ratio;
        Rect::new(self.x + (size - w) / 2.0, self.y + size - h, w, h)
    }
}

/// The session's obstacles plus the tuning needed to derive their hit-boxes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    base_size: f32,
    hitboxes: HitboxTable,
}

impl ObstacleField {
    /// Build a field from explicit placements (tests, saved layouts)
    pub fn new(obstacles: Vec<Obstacle>, base_size: f32, hitboxes: HitboxTable) -> Self {
        Self {
            obstacles,
            base_size,
            hitboxes,
        }
    }

    /// A field with nothing in it
    pub fn empty(tuning: &Tuning) -> Self {
        Self::new(Vec::new(), tuning.obstacle_base_size, tuning.hitboxes.clone())
    }

    /// Roll the session layout. Called once per session.
    pub fn generate<R: Rng>(bounds: &WorldBounds, tuning: &Tuning, rng: &mut R) -> Self {
        let obstacles: Vec<Obstacle> = LAYOUT
            .iter()
            .map(|&(fx, fy, kind)| {
                let scale = if tuning.obstacle_max_scale > tuning.obstacle_min_scale {
                    rng.random_range(tuning.obstacle_min_scale..=tuning.obstacle_max_scale)
                } else {
                    tuning.obstacle_min_scale
                };
                let size = tuning.obstacle_base_size * scale;
                // Keep the whole sprite on the map even for big rolls
                let x = (fx * bounds.width).min((bounds.width - size).max(0.0));
                let y = (fy * bounds.height).min((bounds.height - size).max(0.0));
                Obstacle {
                    x,
                    y,
                    scale,
                    mirrored: rng.random_bool(0.5),
                    kind,
                }
            })
            .collect();

        log::debug!("Generated {} obstacles", obstacles.len());
        Self::new(obstacles, tuning.obstacle_base_size, tuning.hitboxes.clone())
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    pub fn footprint(&self, obstacle: &Obstacle) -> Rect {
        obstacle.footprint(self.base_size)
    }

    pub fn hitbox(&self, obstacle: &Obstacle) -> Rect {
        obstacle.hitbox(self.base_size, self.hitboxes.for_kind(obstacle.kind))
    }

    /// All hit-boxes, derived fresh
    pub fn hitboxes(&self) -> impl Iterator<Item = Rect> + '_ {
        self.obstacles.iter().map(|o| self.hitbox(o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hitbox_is_bottom_centered() {
        let tree = Obstacle::new(200.0, 150.0, 1.5, ObstacleKind::Tree);
        let hb = tree.hitbox(96.0, HitboxProfile::new(0.12, 0.30));
        let size = 144.0;

        assert!((hb.w - size * 0.12).abs() < 1e-3);
        assert!((hb.h - size * 0.30).abs() < 1e-3);
        assert!((hb.bottom() - (150.0 + size)).abs() < 1e-3);
        assert!((hb.center().x - (200.0 + size / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_hitbox_follows_scale() {
        let profile = HitboxProfile::new(0.12, 0.30);
        let small = Obstacle::new(0.0, 0.0, 1.0, ObstacleKind::Tree).hitbox(96.0, profile);
        let big = Obstacle::new(0.0, 0.0, 2.0, ObstacleKind::Tree).hitbox(96.0, profile);
        assert!((big.w - 2.0 * small.w).abs() < 1e-3);
        assert!((big.h - 2.0 * small.h).abs() < 1e-3);
    }

    #[test]
    fn test_generate_respects_ranges() {
        let tuning = Tuning::default();
        let bounds = WorldBounds::from_tuning(&tuning);
        let mut rng = Pcg32::seed_from_u64(7);
        let field = ObstacleField::generate(&bounds, &tuning, &mut rng);

        assert_eq!(field.len(), LAYOUT.len());
        for o in field.obstacles() {
            assert!(o.scale >= tuning.obstacle_min_scale && o.scale <= tuning.obstacle_max_scale);
            assert!(bounds.contains_in_world(&field.footprint(o)));
        }
    }

    #[test]
    fn test_generate_is_seeded() {
        let tuning = Tuning::default();
        let bounds = WorldBounds::from_tuning(&tuning);
        let a = ObstacleField::generate(&bounds, &tuning, &mut Pcg32::seed_from_u64(42));
        let b = ObstacleField::generate(&bounds, &tuning, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.obstacles(), b.obstacles());
    }

    #[test]
    fn test_rock_uses_its_own_profile() {
        let tuning = Tuning::default();
        let field = ObstacleField::new(
            vec![Obstacle::new(0.0, 0.0, 1.0, ObstacleKind::Rock)],
            96.0,
            tuning.hitboxes.clone(),
        );
        let hb = field.hitbox(&field.obstacles()[0]);
        assert!((hb.w - 96.0 * tuning.hitboxes.rock.width_ratio).abs() < 1e-3);
    }
}
