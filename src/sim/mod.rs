//! Simulation core
//!
//! All gameplay logic lives here. Time only moves when the host passes a
//! new timestamp to [`tick`], and every random draw comes from the game's
//! seeded RNG, so a run replays exactly from its seed and input log.

pub mod collision;
pub mod game;
pub mod physics;
pub mod pickup;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use collision::{Contact, resolve_player_ball};
pub use game::{Game, GameEvent};
pub use pickup::{Pickup, PickupKind, RespawnWindow};
pub use scheduler::{Fired, Scheduler, TimerEvent, TimerHandle};
pub use state::{
    BALL_PALETTE, Ball, Difficulty, Effect, EffectSlot, GamePhase, OVERFLOW_BALL_COLOR, Player,
};
pub use tick::{TickInput, tick};
