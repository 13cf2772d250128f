//! Ball Dodge - A bouncing-ball survival arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (physics, timed effects, pickups, game state machine)
//! - `renderer`: Draw-command sink the simulation renders into
//! - `ui`: Menu/game-over layout and click hit-testing
//! - `platform`: Input sampling and browser/native glue
//! - `highscores`: Per-difficulty best-score persistence
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::GameError;
pub use highscores::{HighScoreStore, HighScores, MemoryStore};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player body box and movement
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_BASE_SPEED: f32 = 5.0;
    /// Head circle sits this far above the body's top edge
    pub const PLAYER_HEAD_OFFSET: f32 = 5.0;
    pub const PLAYER_HEAD_RADIUS: f32 = 10.0;
    /// Speed power-up overrides base speed with this multiplier
    pub const SPEED_BOOST_MULTIPLIER: f32 = 2.0;
    pub const GOD_PLAYER_SPEED_MULTIPLIER: f32 = 1.15;

    /// Ball defaults (units per tick)
    pub const BALL_RADIUS: f32 = 20.0;
    pub const BALL_BASE_SPEED: f32 = 7.5;
    pub const BALL_MASS: f32 = 1.0;

    /// Pickup defaults
    pub const PICKUP_RADIUS: f32 = 15.0;

    /// Timed effects (milliseconds)
    pub const EFFECT_DURATION_MS: u64 = 5000;
    pub const GRACE_INVINCIBILITY_MS: u64 = 3000;
    pub const RESPAWN_MIN_MS: u64 = 5000;
    pub const RESPAWN_MAX_MS: u64 = 20000;

    /// Shielded deflection speeds the ball up by this factor
    pub const SHIELD_DEFLECT_BOOST: f32 = 1.2;
}
