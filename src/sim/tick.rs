//! Frame-driven movement
//!
//! Each input channel (keyboard, touch pad) runs its own Idle/Moving loop.
//! The host calls `frame` from its animation-frame callback and only asks
//! for another frame while some loop is moving, so an idle player costs
//! nothing. Loops run one after the other inside `frame`, each finishing its
//! two-axis move before the next starts.

use super::input::{Direction, HeldDirections, InputEvent};
use super::state::{MoveOutcome, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPhase {
    #[default]
    Idle,
    Moving,
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Schedule another animation frame
    Continue,
    /// Everything is idle; wait for the next input edge
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Keyboard,
    Touch,
}

/// Per-channel hold loop
#[derive(Debug, Clone, Default)]
pub struct ChannelLoop {
    held: HeldDirections,
    phase: LoopPhase,
    /// Timestamp of the previous tick in this run (ms)
    last_sample_ms: Option<f64>,
    /// A tick has applied movement time since the latest press
    advanced: bool,
}

impl ChannelLoop {
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn held(&self) -> &HeldDirections {
        &self.held
    }

    /// Returns true on the Idle -> Moving edge
    fn press(&mut self, dir: Direction) -> bool {
        self.held.press(dir);
        self.advanced = false;
        if self.phase == LoopPhase::Idle {
            self.phase = LoopPhase::Moving;
            self.last_sample_ms = None;
            return true;
        }
        false
    }

    /// Returns true if `dir` was let go before any tick moved it (a tap)
    fn release(&mut self, dir: Direction) -> bool {
        let tap = self.held.is_held(dir) && !self.advanced;
        self.held.release(dir);
        tap
    }

    fn release_all(&mut self) {
        self.held.clear();
    }

    fn stop(&mut self) {
        self.phase = LoopPhase::Idle;
        self.last_sample_ms = None;
    }

    /// Advance this loop to `now_ms`
    fn tick(&mut self, world: &mut World, now_ms: f64) -> MoveOutcome {
        if self.phase == LoopPhase::Idle {
            return MoveOutcome::default();
        }
        if self.held.is_empty() {
            self.stop();
            return MoveOutcome::default();
        }

        // First tick of a run only records the time
        let Some(last) = self.last_sample_ms.replace(now_ms) else {
            return MoveOutcome::default();
        };

        self.advanced = true;
        let tuning = world.tuning();
        let dt = (((now_ms - last) / 1000.0) as f32).clamp(0.0, tuning.max_frame_dt);
        let delta = self.held.intent() * tuning.move_speed * dt;
        world.try_move(delta)
    }
}

/// Turns input events and animation frames into world moves.
///
/// A touch press released before the loop has moved falls back to a single
/// nudge, so short taps on a pad still step the player.
#[derive(Debug, Clone, Default)]
pub struct MovementController {
    keyboard: ChannelLoop,
    touch: ChannelLoop,
}

impl MovementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self, channel: Channel) -> &ChannelLoop {
        match channel {
            Channel::Keyboard => &self.keyboard,
            Channel::Touch => &self.touch,
        }
    }

    /// Apply an input edge. Returns true if the host must schedule a frame
    /// (a loop just left Idle).
    pub fn handle(&mut self, event: InputEvent, world: &mut World) -> bool {
        match event {
            InputEvent::KeyDown(dir) => self.keyboard.press(dir),
            InputEvent::KeyUp(dir) => {
                self.keyboard.release(dir);
                false
            }
            InputEvent::TouchPress(dir) => self.touch.press(dir),
            InputEvent::TouchRelease(dir) => {
                // A press lifted before the first real tick never moved
                if self.touch.release(dir) {
                    world.nudge(dir);
                }
                false
            }
            InputEvent::Tap(dir) => {
                world.nudge(dir);
                false
            }
            InputEvent::ReleaseAll => {
                self.keyboard.release_all();
                self.touch.release_all();
                false
            }
        }
    }

    /// Run one animation frame at `now_ms` (host clock, milliseconds)
    pub fn frame(&mut self, world: &mut World, now_ms: f64) -> FrameRequest {
        self.keyboard.tick(world, now_ms);
        self.touch.tick(world, now_ms);

        if self.is_running() {
            FrameRequest::Continue
        } else {
            FrameRequest::Stop
        }
    }

    pub fn is_running(&self) -> bool {
        self.keyboard.phase == LoopPhase::Moving || self.touch.phase == LoopPhase::Moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Obstacle, ObstacleField, ObstacleKind};
    use crate::tuning::{HitboxTable, Tuning};
    use glam::Vec2;

    fn open_world(start: Vec2) -> World {
        let tuning = Tuning {
            floor_fraction: None,
            ..Default::default()
        };
        let field = ObstacleField::empty(&tuning);
        let mut world = World::with_field(tuning, field, 1);
        assert!(world.place_player(start));
        world
    }

    #[test]
    fn test_idle_to_moving_edge() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();

        assert!(!ctl.is_running());
        assert!(ctl.handle(InputEvent::KeyDown(Direction::Right), &mut world));
        // Already moving: a second key doesn't need another frame request
        assert!(!ctl.handle(InputEvent::KeyDown(Direction::Down), &mut world));
        assert_eq!(ctl.channel(Channel::Keyboard).phase(), LoopPhase::Moving);
    }

    #[test]
    fn test_first_tick_is_time_sample_only() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::KeyDown(Direction::Right), &mut world);

        assert_eq!(ctl.frame(&mut world, 1000.0), FrameRequest::Continue);
        assert_eq!(world.player_position(), Vec2::new(500.0, 500.0));

        // 50ms at 240 u/s = 12 units
        ctl.frame(&mut world, 1050.0);
        assert!((world.player_position().x - 512.0).abs() < 1e-3);
    }

    #[test]
    fn test_release_stops_loop() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::KeyDown(Direction::Left), &mut world);
        ctl.frame(&mut world, 0.0);
        ctl.frame(&mut world, 16.0);

        ctl.handle(InputEvent::KeyUp(Direction::Left), &mut world);
        let pos = world.player_position();
        assert_eq!(ctl.frame(&mut world, 32.0), FrameRequest::Stop);
        assert_eq!(world.player_position(), pos);
        assert_eq!(ctl.channel(Channel::Keyboard).phase(), LoopPhase::Idle);

        // Next press restarts with a fresh time sample
        assert!(ctl.handle(InputEvent::KeyDown(Direction::Left), &mut world));
        ctl.frame(&mut world, 5000.0);
        assert_eq!(world.player_position(), pos);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::TouchPress(Direction::Down), &mut world);
        ctl.frame(&mut world, 0.0);
        // Tab was in the background for 10 seconds
        ctl.frame(&mut world, 10_000.0);
        let max_step = world.tuning().move_speed * world.tuning().max_frame_dt;
        assert!((world.player_position().y - (500.0 + max_step)).abs() < 1e-3);
    }

    #[test]
    fn test_touch_hold_moves_sub_pixel() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::TouchPress(Direction::Right), &mut world);
        ctl.frame(&mut world, 0.0);
        ctl.frame(&mut world, 1.0);
        // 1ms at 240 u/s
        assert!((world.player_position().x - 500.24).abs() < 1e-3);
    }

    #[test]
    fn test_channels_share_one_position() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::KeyDown(Direction::Right), &mut world);
        ctl.handle(InputEvent::TouchPress(Direction::Down), &mut world);
        ctl.frame(&mut world, 0.0);
        ctl.frame(&mut world, 100.0);
        assert!((world.player_position() - Vec2::new(524.0, 524.0)).length() < 1e-3);

        ctl.handle(InputEvent::ReleaseAll, &mut world);
        assert_eq!(ctl.frame(&mut world, 116.0), FrameRequest::Stop);
    }

    #[test]
    fn test_quick_touch_tap_steps() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        assert!(ctl.handle(InputEvent::TouchPress(Direction::Right), &mut world));
        ctl.frame(&mut world, 0.0);
        ctl.handle(InputEvent::TouchRelease(Direction::Right), &mut world);
        assert_eq!(world.player_position(), Vec2::new(520.0, 500.0));
        assert_eq!(ctl.frame(&mut world, 16.0), FrameRequest::Stop);
        assert_eq!(world.player_position(), Vec2::new(520.0, 500.0));

        // Released before any frame at all
        ctl.handle(InputEvent::TouchPress(Direction::Down), &mut world);
        ctl.handle(InputEvent::TouchRelease(Direction::Down), &mut world);
        assert_eq!(world.player_position(), Vec2::new(520.0, 520.0));
    }

    #[test]
    fn test_touch_hold_release_does_not_nudge() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::TouchPress(Direction::Right), &mut world);
        ctl.frame(&mut world, 0.0);
        ctl.frame(&mut world, 50.0);
        ctl.handle(InputEvent::TouchRelease(Direction::Right), &mut world);
        assert!((world.player_position().x - 512.0).abs() < 1e-3);
    }

    #[test]
    fn test_quick_key_tap_does_not_nudge() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::KeyDown(Direction::Right), &mut world);
        ctl.handle(InputEvent::KeyUp(Direction::Right), &mut world);
        assert_eq!(world.player_position(), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_diagonal_hold_slides_along_trunk() {
        let field = ObstacleField::new(
            vec![Obstacle::new(500.0, 600.0, 1.0, ObstacleKind::Tree)],
            96.0,
            HitboxTable::default(),
        );
        let mut world = World::with_field(Tuning::default(), field, 2);
        let trunk = world.field().hitbox(&world.obstacles()[0]);
        let start = Vec2::new(trunk.x - 41.0, trunk.y - 5.0);
        assert!(world.place_player(start));

        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::KeyDown(Direction::Right), &mut world);
        ctl.handle(InputEvent::KeyDown(Direction::Down), &mut world);
        ctl.frame(&mut world, 0.0);
        // 50ms at 240 u/s: x runs into the trunk, y still advances 12
        ctl.frame(&mut world, 50.0);
        let pos = world.player_position();
        assert_eq!(pos.x, start.x);
        assert!((pos.y - (start.y + 12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_tap_nudges_without_scheduling() {
        let mut world = open_world(Vec2::new(500.0, 500.0));
        let mut ctl = MovementController::new();
        assert!(!ctl.handle(InputEvent::Tap(Direction::Up), &mut world));
        assert_eq!(world.player_position(), Vec2::new(500.0, 480.0));
        assert!(!ctl.is_running());
    }

    #[test]
    fn test_stops_at_world_edge() {
        let mut world = open_world(Vec2::new(5.0, 500.0));
        let mut ctl = MovementController::new();
        ctl.handle(InputEvent::KeyDown(Direction::Left), &mut world);
        ctl.frame(&mut world, 0.0);
        ctl.frame(&mut world, 100.0);
        assert_eq!(world.player_position().x, 0.0);
        // Still holding: the loop keeps running but the position is pinned
        assert_eq!(ctl.frame(&mut world, 200.0), FrameRequest::Continue);
        assert_eq!(world.player_position().x, 0.0);
    }
}
