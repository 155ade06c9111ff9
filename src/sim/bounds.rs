//! Spatial bounds: the world rectangle and its walkable floor
//!
//! The top band of the world (above `floor_fraction` of its height) is sky.
//! Entities may be drawn there but may never stand there.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
    /// Fraction of `height` above which movement is disallowed
    pub floor_fraction: Option<f32>,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32, floor_fraction: Option<f32>) -> Self {
        Self {
            width,
            height,
            floor_fraction,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.world_width, tuning.world_height, tuning.floor_fraction)
    }

    /// Whole world as a rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Smallest walkable y
    pub fn floor_top(&self) -> f32 {
        self.floor_fraction.map_or(0.0, |f| self.height * f)
    }

    /// Walkable region (the world minus the sky band)
    pub fn walkable(&self) -> Rect {
        let top = self.floor_top();
        Rect::new(0.0, top, self.width, self.height - top)
    }

    /// World containment only, ignores the floor split
    pub fn contains_in_world(&self, rect: &Rect) -> bool {
        self.rect().contains_rect(rect)
    }

    /// Fully inside the world and not reaching into the sky
    pub fn contains(&self, rect: &Rect) -> bool {
        self.walkable().contains_rect(rect)
    }

    /// Clamp one coordinate so a footprint of `size` stays inside `[lo, hi]`
    fn clamp_axis(value: f32, lo: f32, hi: f32, size: f32) -> f32 {
        let max = (hi - size).max(lo);
        value.clamp(lo, max)
    }

    pub fn clamp_x(&self, x: f32, size: f32) -> f32 {
        Self::clamp_axis(x, 0.0, self.width, size)
    }

    pub fn clamp_y(&self, y: f32, size: f32) -> f32 {
        Self::clamp_axis(y, self.floor_top(), self.height, size)
    }

    /// Clamp a footprint's top-left corner into the walkable region
    pub fn clamp(&self, pos: Vec2, size: f32) -> Vec2 {
        Vec2::new(self.clamp_x(pos.x, size), self.clamp_y(pos.y, size))
    }

    /// World center expressed as a footprint's top-left corner
    pub fn center_for(&self, size: f32) -> Vec2 {
        let walk = self.walkable();
        Vec2::new(
            (walk.x + walk.w / 2.0) - size / 2.0,
            (walk.y + walk.h / 2.0) - size / 2.0,
        )
    }
}
