//! Directional input
//!
//! Raw host events (keys, touch pads) are translated into `InputEvent`s
//! before they reach the movement controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a DOM `KeyboardEvent.key` value (WASD or arrows)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" | "ArrowUp" => Some(Direction::Up),
            "s" | "S" | "ArrowDown" => Some(Direction::Down),
            "a" | "A" | "ArrowLeft" => Some(Direction::Left),
            "d" | "D" | "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step in world space (y grows downward)
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// A discrete input edge from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Direction),
    KeyUp(Direction),
    TouchPress(Direction),
    TouchRelease(Direction),
    /// Single fixed-distance step (tap/click on a pad)
    Tap(Direction),
    /// Focus lost or touch cancelled: drop every held direction
    ReleaseAll,
}

/// Set of directions currently held on one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldDirections {
    held: [bool; 4],
}

impl HeldDirections {
    pub fn press(&mut self, dir: Direction) {
        self.held[dir.index()] = true;
    }

    pub fn release(&mut self, dir: Direction) {
        self.held[dir.index()] = false;
    }

    pub fn clear(&mut self) {
        self.held = [false; 4];
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held[dir.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.held.iter().any(|&h| h)
    }

    /// Summed intent; opposite directions cancel on their axis
    pub fn intent(&self) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.is_held(**d))
            .map(|d| d.unit())
            .sum()
    }
}
