//! World simulation module
//!
//! All movement, collision, camera and spawn logic lives here. This module
//! must stay pure:
//! - Time comes in as an argument (host frame timestamps)
//! - Randomness comes from the session's seeded RNG
//! - Stable iteration order (collectibles sorted by id)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod camera;
pub mod collision;
pub mod input;
pub mod obstacle;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bounds::WorldBounds;
pub use camera::{camera_offset, visible_world_rect};
pub use collision::{collides_any_collectible, collides_obstacle};
pub use input::{Direction, HeldDirections, InputEvent};
pub use obstacle::{Obstacle, ObstacleField, ObstacleKind};
pub use rect::Rect;
pub use spawn::{Annulus, SpawnOutcome, SpawnSearch};
pub use state::{Collectible, CollectibleId, GameEvent, MoveOutcome, Snapshot, World};
pub use tick::{Channel, ChannelLoop, FrameRequest, LoopPhase, MovementController};
