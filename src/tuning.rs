//! Data-driven game balance
//!
//! Every gameplay number the simulation uses lives here. Defaults come from
//! [`crate::consts`]; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Units per tick before difficulty/power-up scaling
    pub player_base_speed: f32,
    pub player_head_radius: f32,
    pub player_head_offset: f32,
    pub speed_boost_multiplier: f32,
    pub god_player_speed_multiplier: f32,

    // === Balls ===
    pub ball_radius: f32,
    /// Hard-difficulty ball speed; other difficulties scale from this
    pub ball_base_speed: f32,

    // === Pickups and effects ===
    pub pickup_radius: f32,
    pub effect_duration_ms: u64,
    pub grace_invincibility_ms: u64,
    pub respawn_min_ms: u64,
    pub respawn_max_ms: u64,
    pub shield_deflect_boost: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_base_speed: PLAYER_BASE_SPEED,
            player_head_radius: PLAYER_HEAD_RADIUS,
            player_head_offset: PLAYER_HEAD_OFFSET,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            god_player_speed_multiplier: GOD_PLAYER_SPEED_MULTIPLIER,

            ball_radius: BALL_RADIUS,
            ball_base_speed: BALL_BASE_SPEED,

            pickup_radius: PICKUP_RADIUS,
            effect_duration_ms: EFFECT_DURATION_MS,
            grace_invincibility_ms: GRACE_INVINCIBILITY_MS,
            respawn_min_ms: RESPAWN_MIN_MS,
            respawn_max_ms: RESPAWN_MAX_MS,
            shield_deflect_boost: SHIELD_DEFLECT_BOOST,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Canvas size as a vector
    pub fn canvas(&self) -> glam::Vec2 {
        glam::Vec2::new(self.canvas_width, self.canvas_height)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_base_speed", self.player_base_speed),
            ("player_head_radius", self.player_head_radius),
            ("speed_boost_multiplier", self.speed_boost_multiplier),
            ("god_player_speed_multiplier", self.god_player_speed_multiplier),
            ("ball_radius", self.ball_radius),
            ("ball_base_speed", self.ball_base_speed),
            ("pickup_radius", self.pickup_radius),
            ("shield_deflect_boost", self.shield_deflect_boost),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidTuning {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        if self.player_head_offset < 0.0 {
            return Err(GameError::InvalidTuning {
                field: "player_head_offset",
                reason: "must not be negative".to_string(),
            });
        }

        let durations = [
            ("effect_duration_ms", self.effect_duration_ms),
            ("grace_invincibility_ms", self.grace_invincibility_ms),
            ("respawn_min_ms", self.respawn_min_ms),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(GameError::InvalidTuning {
                    field,
                    reason: "must be at least 1ms".to_string(),
                });
            }
        }

        if self.respawn_min_ms >= self.respawn_max_ms {
            return Err(GameError::InvalidTuning {
                field: "respawn_max_ms",
                reason: format!(
                    "must exceed respawn_min_ms ({} >= {})",
                    self.respawn_min_ms, self.respawn_max_ms
                ),
            });
        }

        let widest = (self.ball_radius * 2.0)
            .max(self.pickup_radius * 2.0)
            .max(self.player_width);
        if self.canvas_width <= widest {
            return Err(GameError::InvalidTuning {
                field: "canvas_width",
                reason: format!("too narrow for entities of size {widest}"),
            });
        }
        let tallest = (self.ball_radius * 2.0)
            .max(self.pickup_radius * 2.0)
            .max(self.player_height);
        if self.canvas_height <= tallest {
            return Err(GameError::InvalidTuning {
                field: "canvas_height",
                reason: format!("too short for entities of size {tallest}"),
            });
        }

        Ok(())
    }
}
