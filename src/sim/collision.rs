//! Collision queries
//!
//! Everything here is a pure function of its arguments: the caller owns the
//! obstacle field and the collectible set.

use super::obstacle::ObstacleField;
use super::rect::Rect;
use super::state::{Collectible, CollectibleId};

/// True if `rect` overlaps any obstacle hit-box (not its full sprite)
pub fn collides_obstacle(rect: &Rect, field: &ObstacleField) -> bool {
    field.hitboxes().any(|hitbox| rect.intersects(&hitbox))
}

/// Ids of every collectible whose footprint overlaps `rect`
pub fn collides_any_collectible(
    rect: &Rect,
    collectibles: &[Collectible],
    collectible_size: f32,
) -> Vec<CollectibleId> {
    collectibles
        .iter()
        .filter(|c| rect.intersects(&c.rect(collectible_size)))
        .map(|c| c.id)
        .collect()
}
