//! World state
//!
//! `World` is the single owner of the authoritative player position. Every
//! write goes through its methods, so the keyboard loop, the touch loop and
//! tap nudges are serialized by construction. Outside readers use accessors
//! or drain the event queue; nothing holds a second copy of the position.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::WorldBounds;
use super::camera::camera_offset;
use super::collision::collides_any_collectible;
use super::input::Direction;
use super::obstacle::{Obstacle, ObstacleField};
use super::rect::Rect;
use super::spawn::{Annulus, SpawnSearch};
use crate::tuning::Tuning;

pub type CollectibleId = u64;

/// A pumpkin waiting to be picked up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: CollectibleId,
    pub x: f32,
    pub y: f32,
}

impl Collectible {
    pub fn new(id: CollectibleId, pos: Vec2) -> Self {
        Self {
            id,
            x: pos.x,
            y: pos.y,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn rect(&self, size: f32) -> Rect {
        Rect::square(self.position(), size)
    }
}

/// Things the host needs to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player position accepted; camera recomputed in the same step
    PlayerMoved { position: Vec2, camera: Vec2 },
    CollectibleSpawned {
        id: CollectibleId,
        position: Vec2,
        fallback: bool,
    },
    /// Collectible removed; the ledger should credit `reward`
    Pickup { id: CollectibleId, reward: u32 },
}

/// Which axes of a move were applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved_x: bool,
    pub moved_y: bool,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        self.moved_x || self.moved_y
    }
}

/// Read-only view for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: Vec2,
    pub camera: Vec2,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
}

/// One play session
#[derive(Debug, Clone)]
pub struct World {
    /// Session seed for reproducibility
    pub seed: u64,
    tuning: Tuning,
    bounds: WorldBounds,
    field: ObstacleField,
    player: Vec2,
    viewport: Vec2,
    camera: Vec2,
    /// Live collectibles (sorted by id for determinism)
    collectibles: Vec<Collectible>,
    rng: Pcg32,
    next_id: CollectibleId,
    /// Collectible fallbacks used so far (drives the fallback step)
    fallback_spawns: u32,
    events: Vec<GameEvent>,
}

impl World {
    /// New session: roll obstacles, then place the player
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = WorldBounds::from_tuning(&tuning);
        let field = ObstacleField::generate(&bounds, &tuning, &mut rng);
        Self::assemble(tuning, field, rng, seed)
    }

    /// New session over a fixed obstacle field
    pub fn with_field(tuning: Tuning, field: ObstacleField, seed: u64) -> Self {
        Self::assemble(tuning, field, Pcg32::seed_from_u64(seed), seed)
    }

    fn assemble(tuning: Tuning, field: ObstacleField, mut rng: Pcg32, seed: u64) -> Self {
        let bounds = WorldBounds::from_tuning(&tuning);
        let spawn = SpawnSearch::new(&field, &bounds, tuning.player_size, tuning.spawn_attempts)
            .find_safe_position(&mut rng);
        let viewport = Vec2::new(tuning.viewport_width, tuning.viewport_height);
        let camera = camera_offset(spawn.position, tuning.player_size, viewport, &bounds);

        log::info!(
            "World seeded with {}: {} obstacles, player at ({:.0}, {:.0}){}",
            seed,
            field.len(),
            spawn.position.x,
            spawn.position.y,
            if spawn.fallback { " (fallback)" } else { "" }
        );

        Self {
            seed,
            tuning,
            bounds,
            field,
            player: spawn.position,
            viewport,
            camera,
            collectibles: Vec::new(),
            rng,
            next_id: 1,
            fallback_spawns: 0,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    pub fn player_position(&self) -> Vec2 {
        self.player
    }

    pub fn player_rect(&self) -> Rect {
        Rect::square(self.player, self.tuning.player_size)
    }

    pub fn camera_offset(&self) -> Vec2 {
        self.camera
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player,
            camera: self.camera,
            collectibles: self.collectibles.clone(),
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn player_search(&self) -> SpawnSearch<'_> {
        SpawnSearch::new(
            &self.field,
            &self.bounds,
            self.tuning.player_size,
            self.tuning.spawn_attempts,
        )
    }

    fn collectible_search(&self) -> SpawnSearch<'_> {
        SpawnSearch::new(
            &self.field,
            &self.bounds,
            self.tuning.collectible_size,
            self.tuning.spawn_attempts,
        )
    }

    /// Could the player stand with its top-left corner at `pos`?
    pub fn is_position_safe(&self, pos: Vec2) -> bool {
        self.player_search().is_safe(pos)
    }

    /// Could a collectible be dropped with its top-left corner at `pos`?
    pub fn is_collectible_position_safe(&self, pos: Vec2) -> bool {
        self.collectible_search().is_safe(pos)
    }

    /// Host viewport changed (resize / rotation). Camera only, no collision.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.refresh_camera();
    }

    fn refresh_camera(&mut self) {
        self.camera = camera_offset(
            self.player,
            self.tuning.player_size,
            self.viewport,
            &self.bounds,
        );
    }

    /// Move the player by `delta`, one axis at a time.
    ///
    /// Each axis is clamped into the walkable region and only applied if the
    /// resulting footprint is safe; a blocked axis keeps its old value, which
    /// lets the other axis slide along the obstacle.
    pub fn try_move(&mut self, delta: Vec2) -> MoveOutcome {
        let size = self.tuning.player_size;
        let mut pos = self.player;
        let mut outcome = MoveOutcome::default();

        if delta.x != 0.0 {
            let x = self.bounds.clamp_x(pos.x + delta.x, size);
            if x != pos.x && self.is_position_safe(Vec2::new(x, pos.y)) {
                pos.x = x;
                outcome.moved_x = true;
            }
        }

        if delta.y != 0.0 {
            let y = self.bounds.clamp_y(pos.y + delta.y, size);
            if y != pos.y && self.is_position_safe(Vec2::new(pos.x, y)) {
                pos.y = y;
                outcome.moved_y = true;
            }
        }

        if outcome.moved() {
            self.player = pos;
            self.on_player_moved();
        }
        outcome
    }

    /// Single fixed-distance step (tap input)
    pub fn nudge(&mut self, dir: Direction) -> MoveOutcome {
        self.try_move(dir.unit() * self.tuning.nudge_step)
    }

    /// Put the player somewhere directly. Unsafe spots are refused.
    pub fn place_player(&mut self, pos: Vec2) -> bool {
        if !self.is_position_safe(pos) {
            return false;
        }
        if pos != self.player {
            self.player = pos;
            self.on_player_moved();
        }
        true
    }

    fn on_player_moved(&mut self) {
        self.refresh_camera();
        self.events.push(GameEvent::PlayerMoved {
            position: self.player,
            camera: self.camera,
        });
        self.collect_pickups();
    }

    /// Remove every collectible under the player and emit a pickup per item.
    /// Returns how many were collected.
    pub fn collect_pickups(&mut self) -> usize {
        let rect = self.player_rect();
        let size = self.tuning.collectible_size;
        let hits = collides_any_collectible(&rect, &self.collectibles, size);
        if hits.is_empty() {
            return 0;
        }

        self.collectibles.retain(|c| !hits.contains(&c.id));
        for &id in &hits {
            let reward = self
                .rng
                .random_range(self.tuning.reward_min..=self.tuning.reward_max);
            log::debug!("Picked up collectible {} for {}", id, reward);
            self.events.push(GameEvent::Pickup { id, reward });
        }
        hits.len()
    }

    /// A task was finished: spawn `multiplier` collectibles (at least one)
    /// around the player.
    pub fn complete_task(&mut self, multiplier: u32) -> Vec<CollectibleId> {
        let count = multiplier.max(1);
        log::info!("Task completed, spawning {} collectible(s)", count);
        let reference = self.player;
        (0..count).map(|_| self.spawn_collectible_near(reference)).collect()
    }

    /// Place one collectible around `reference`
    pub fn spawn_collectible_near(&mut self, reference: Vec2) -> CollectibleId {
        let annulus = Annulus::new(
            self.tuning.collectible_min_radius,
            self.tuning.collectible_max_radius,
        );
        let outcome = SpawnSearch::new(
            &self.field,
            &self.bounds,
            self.tuning.collectible_size,
            self.tuning.spawn_attempts,
        )
        .find_near(
            reference,
            annulus,
            self.tuning.collectible_fallback_step,
            self.fallback_spawns,
            &mut self.rng,
        );
        if outcome.fallback {
            self.fallback_spawns += 1;
        }
        self.insert_collectible(outcome.position, outcome.fallback)
    }

    /// Add a collectible at an exact spot (host-side placement policies).
    /// Spots outside the walkable region or on an obstacle are refused.
    pub fn add_collectible(&mut self, pos: Vec2) -> Option<CollectibleId> {
        if !self.is_collectible_position_safe(pos) {
            log::debug!("Refused collectible at ({:.0}, {:.0})", pos.x, pos.y);
            return None;
        }
        Some(self.insert_collectible(pos, false))
    }

    fn insert_collectible(&mut self, pos: Vec2, fallback: bool) -> CollectibleId {
        let id = self.next_id;
        self.next_id += 1;
        self.collectibles.push(Collectible::new(id, pos));
        self.events.push(GameEvent::CollectibleSpawned {
            id,
            position: pos,
            fallback,
        });
        id
    }
}
