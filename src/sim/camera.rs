//! Camera: world position -> viewport offset
//!
//! The offset is what gets added to world coordinates to draw them on screen.
//! It is always derived, never stored as truth.

use glam::Vec2;

use super::bounds::WorldBounds;
use super::rect::Rect;

/// Clamp the centering offset for one axis.
///
/// The offset must stay in `[-(world - viewport), 0]` so the viewport never
/// shows anything past the world edge. A viewport wider than the world can't
/// satisfy that, so the world is centered instead.
fn clamp_axis(desired: f32, world: f32, viewport: f32) -> f32 {
    let min = -(world - viewport);
    if min > 0.0 {
        return (viewport - world) / 2.0;
    }
    desired.clamp(min, 0.0)
}

/// Offset that centers a footprint of `size` at `player`, clamped to the world
pub fn camera_offset(player: Vec2, size: f32, viewport: Vec2, bounds: &WorldBounds) -> Vec2 {
    let focus = player + Vec2::splat(size / 2.0);
    let desired = viewport / 2.0 - focus;
    Vec2::new(
        clamp_axis(desired.x, bounds.width, viewport.x),
        clamp_axis(desired.y, bounds.height, viewport.y),
    )
}

/// World-space rectangle currently visible through the viewport
pub fn visible_world_rect(offset: Vec2, viewport: Vec2) -> Rect {
    Rect::new(-offset.x, -offset.y, viewport.x, viewport.y)
}
