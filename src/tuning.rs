//! World tuning and balance
//!
//! Every number the simulation depends on lives here so it can be tweaked
//! from JSON without touching geometry code. Defaults mirror `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::ObstacleKind;

/// Hit-box ratios for one obstacle kind, relative to its square footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxProfile {
    /// Hit-box width / footprint size
    pub width_ratio: f32,
    /// Hit-box height / footprint size
    pub height_ratio: f32,
}

impl HitboxProfile {
    pub const fn new(width_ratio: f32, height_ratio: f32) -> Self {
        Self {
            width_ratio,
            height_ratio,
        }
    }
}

/// Hit-box ratios per obstacle kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitboxTable {
    pub tree: HitboxProfile,
    pub rock: HitboxProfile,
}

impl Default for HitboxTable {
    fn default() -> Self {
        Self {
            tree: HitboxProfile::new(TREE_HITBOX_WIDTH, TREE_HITBOX_HEIGHT),
            rock: HitboxProfile::new(ROCK_HITBOX_WIDTH, ROCK_HITBOX_HEIGHT),
        }
    }
}

impl HitboxTable {
    pub fn for_kind(&self, kind: ObstacleKind) -> HitboxProfile {
        match kind {
            ObstacleKind::Tree => self.tree,
            ObstacleKind::Rock => self.rock,
        }
    }
}

/// Data-driven world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Walkable floor starts at this fraction of the height (None = no sky band)
    pub floor_fraction: Option<f32>,

    // === Entities ===
    pub player_size: f32,
    pub collectible_size: f32,

    // === Movement ===
    /// Continuous speed in world units per second
    pub move_speed: f32,
    /// Distance of a single tap nudge
    pub nudge_step: f32,
    /// Clamp for a single tick's elapsed time (seconds)
    pub max_frame_dt: f32,

    // === Obstacles ===
    pub obstacle_base_size: f32,
    pub obstacle_min_scale: f32,
    pub obstacle_max_scale: f32,
    pub hitboxes: HitboxTable,

    // === Spawning ===
    pub spawn_attempts: u32,
    pub collectible_min_radius: f32,
    pub collectible_max_radius: f32,
    pub collectible_fallback_step: f32,

    // === Rewards ===
    pub reward_min: u32,
    pub reward_max: u32,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            floor_fraction: Some(FLOOR_BOUNDARY_FRACTION),

            player_size: PLAYER_SIZE,
            collectible_size: COLLECTIBLE_SIZE,

            move_speed: MOVE_SPEED,
            nudge_step: NUDGE_STEP,
            max_frame_dt: MAX_FRAME_DT,

            obstacle_base_size: OBSTACLE_BASE_SIZE,
            obstacle_min_scale: OBSTACLE_MIN_SCALE,
            obstacle_max_scale: OBSTACLE_MAX_SCALE,
            hitboxes: HitboxTable::default(),

            spawn_attempts: SPAWN_MAX_ATTEMPTS,
            collectible_min_radius: COLLECTIBLE_MIN_RADIUS,
            collectible_max_radius: COLLECTIBLE_MAX_RADIUS,
            collectible_fallback_step: COLLECTIBLE_FALLBACK_STEP,

            reward_min: REWARD_MIN,
            reward_max: REWARD_MAX,

            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("player_size", self.player_size),
            ("collectible_size", self.collectible_size),
            ("move_speed", self.move_speed),
            ("nudge_step", self.nudge_step),
            ("max_frame_dt", self.max_frame_dt),
            ("obstacle_base_size", self.obstacle_base_size),
            ("obstacle_min_scale", self.obstacle_min_scale),
            ("collectible_fallback_step", self.collectible_fallback_step),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        if let Some(fraction) = self.floor_fraction {
            if !(0.0..1.0).contains(&fraction) {
                return Err(ConfigError::invalid(
                    "floor_fraction",
                    format!("must be in [0, 1), got {fraction}"),
                ));
            }
            let floor_height = self.world_height * (1.0 - fraction);
            if floor_height < self.player_size {
                return Err(ConfigError::invalid(
                    "floor_fraction",
                    "floor band is shorter than the player",
                ));
            }
        }

        if self.player_size > self.world_width || self.player_size > self.world_height {
            return Err(ConfigError::invalid("player_size", "larger than the world"));
        }
        if self.obstacle_max_scale < self.obstacle_min_scale {
            return Err(ConfigError::invalid("obstacle_max_scale", "below obstacle_min_scale"));
        }
        if self.collectible_min_radius < 0.0
            || self.collectible_max_radius < self.collectible_min_radius
        {
            return Err(ConfigError::invalid(
                "collectible_max_radius",
                "annulus must satisfy 0 <= min <= max",
            ));
        }
        if self.spawn_attempts == 0 {
            return Err(ConfigError::invalid("spawn_attempts", "must be at least 1"));
        }
        if self.reward_min > self.reward_max {
            return Err(ConfigError::invalid("reward_max", "below reward_min"));
        }
        let profiles = [
            ("hitboxes.tree", self.hitboxes.tree),
            ("hitboxes.rock", self.hitboxes.rock),
        ];
        for (field, profile) in profiles {
            let ok = |r: f32| r > 0.0 && r <= 1.0;
            if !ok(profile.width_ratio) || !ok(profile.height_ratio) {
                return Err(ConfigError::invalid(field, "ratios must be in (0, 1]"));
            }
        }
        Ok(())
    }

    /// LocalStorage key for developer overrides
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pumpkin_patch_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning overrides: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning =
            Tuning::from_json(r#"{ "move_speed": 120.0, "floor_fraction": null }"#).unwrap();
        assert_eq!(tuning.move_speed, 120.0);
        assert_eq!(tuning.floor_fraction, None);
        assert_eq!(tuning.world_width, WORLD_WIDTH);
    }

    #[test]
    fn test_hitbox_ratios_are_configurable() {
        let json = r#"{
            "hitboxes": {
                "tree": { "width_ratio": 0.2, "height_ratio": 0.4 },
                "rock": { "width_ratio": 0.5, "height_ratio": 0.5 }
            }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.hitboxes.for_kind(ObstacleKind::Tree), HitboxProfile::new(0.2, 0.4));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(Tuning::from_json("not json"), Err(ConfigError::Parse(_))));

        let inverted = Tuning {
            collectible_min_radius: 300.0,
            collectible_max_radius: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::Invalid { field: "collectible_max_radius", .. })
        ));

        let sky_only = Tuning {
            floor_fraction: Some(0.99),
            ..Default::default()
        };
        assert!(sky_only.validate().is_err());

        let no_budget = Tuning {
            spawn_attempts: 0,
            ..Default::default()
        };
        assert!(no_budget.validate().is_err());
    }
}
