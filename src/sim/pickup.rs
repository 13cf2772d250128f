//! Power-up pickups
//!
//! All three pickups share one lifecycle and differ only by the row they
//! read from the [`PickupKind`] table:
//!
//! inactive -> (respawn timer) -> active at a random spot -> collected ->
//! effect applied, inactive, respawn timer re-armed.
//!
//! A spawn that would be redundant (the player already has the effect) is
//! skipped and the timer re-armed instead.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::pickup_touches_player;
use super::scheduler::{Scheduler, TimerEvent, TimerHandle};
use super::state::{Effect, Player};
use crate::renderer::{Rgba, colors};

/// Pickup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Speed,
    Invincibility,
    BounceShield,
}

impl PickupKind {
    pub const ALL: [PickupKind; 3] = [
        PickupKind::Speed,
        PickupKind::Invincibility,
        PickupKind::BounceShield,
    ];

    /// Player effect granted on collection
    pub fn effect(&self) -> Effect {
        match self {
            PickupKind::Speed => Effect::SpeedBoost,
            PickupKind::Invincibility => Effect::Invincibility,
            PickupKind::BounceShield => Effect::BounceShield,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            PickupKind::Speed => colors::MAGENTA,
            PickupKind::Invincibility => colors::CYAN,
            PickupKind::BounceShield => colors::ORANGE,
        }
    }

    /// Position in [`PickupKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PickupKind::Speed => 0,
            PickupKind::Invincibility => 1,
            PickupKind::BounceShield => 2,
        }
    }
}

/// Respawn delay window, `[min_ms, max_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnWindow {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl RespawnWindow {
    pub fn sample(&self, rng: &mut impl Rng) -> u64 {
        rng.random_range(self.min_ms..self.max_ms)
    }
}

/// A collectible power-up
#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Pending spawn timer, if any
    pub spawn_timer: Option<TimerHandle>,
    /// Decoration rotation (radians)
    pub spin: f32,
}

impl Pickup {
    pub fn new(kind: PickupKind, radius: f32) -> Self {
        Self {
            kind,
            pos: Vec2::ZERO,
            radius,
            active: false,
            spawn_timer: None,
            spin: 0.0,
        }
    }

    /// Arm the spawn timer with a random delay, replacing any pending one
    pub fn schedule_spawn(
        &mut self,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
        window: RespawnWindow,
    ) {
        scheduler.cancel_slot(&mut self.spawn_timer);
        let delay = window.sample(rng);
        self.spawn_timer = Some(scheduler.schedule(delay, TimerEvent::PickupSpawn(self.kind)));
    }

    /// Spawn timer fired. Appears at a random in-bounds position unless the
    /// player already has this effect, in which case the timer is re-armed.
    /// Returns true if the pickup became active.
    pub fn spawn(
        &mut self,
        player: &Player,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
        window: RespawnWindow,
        canvas: Vec2,
    ) -> bool {
        self.spawn_timer = None;
        if player.has_effect(self.kind.effect()) {
            log::debug!("{:?} pickup spawn skipped, effect already active", self.kind);
            self.schedule_spawn(scheduler, rng, window);
            return false;
        }

        self.active = true;
        self.pos = Vec2::new(
            rng.random::<f32>() * (canvas.x - self.radius * 2.0) + self.radius,
            rng.random::<f32>() * (canvas.y - self.radius * 2.0) + self.radius,
        );
        log::debug!("{:?} pickup spawned at {:?}", self.kind, self.pos);
        true
    }

    /// Whether the player is close enough to collect this pickup
    pub fn check_collision(&self, player: &Player) -> bool {
        self.active && pickup_touches_player(self, player)
    }

    /// Deactivate, grant the effect and re-arm the spawn timer
    pub fn collect(
        &mut self,
        player: &mut Player,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
        window: RespawnWindow,
    ) {
        self.active = false;
        match self.kind {
            PickupKind::Speed => player.activate_power_up(scheduler),
            PickupKind::Invincibility => player.activate_invincibility(scheduler),
            PickupKind::BounceShield => player.activate_bounce_shield(scheduler),
        }
        log::debug!("{:?} pickup collected", self.kind);
        self.schedule_spawn(scheduler, rng, window);
    }

    /// Back to inactive with a fresh spawn timer (new game)
    pub fn reset(&mut self, scheduler: &mut Scheduler, rng: &mut impl Rng, window: RespawnWindow) {
        self.active = false;
        self.schedule_spawn(scheduler, rng, window);
    }
}
