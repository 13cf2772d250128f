//! Game state and core simulation types

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, resolve_player_ball};
use super::scheduler::{Scheduler, TimerEvent, TimerHandle};
use crate::consts::BALL_MASS;
use crate::error::GameError;
use crate::highscores::{HighScoreStore, HighScores};
use crate::renderer::{Rgba, colors};
use crate::tuning::Tuning;

/// Ball colors, one ball per entry
pub const BALL_PALETTE: [Rgba; 5] = [
    colors::RED,
    colors::BLUE,
    colors::GREEN,
    colors::ORANGE,
    colors::WHITE,
];

/// Color for balls beyond the palette (God mode's extra ball)
pub const OVERFLOW_BALL_COLOR: Rgba = colors::PURPLE;

/// Selected difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Medium,
    Hard,
    God,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Medium, Difficulty::Hard, Difficulty::God];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::God => "God",
        }
    }

    /// Lowercase key used for persistence
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::God => "god",
        }
    }

    /// Ball speed relative to the base ball speed
    pub fn ball_speed_factor(&self) -> f32 {
        match self {
            Difficulty::Medium => 0.75,
            Difficulty::Hard => 1.0,
            Difficulty::God => 1.5,
        }
    }

    /// Player speed relative to base speed
    pub fn player_speed_factor(&self, tuning: &Tuning) -> f32 {
        match self {
            Difficulty::God => tuning.god_player_speed_multiplier,
            _ => 1.0,
        }
    }

    /// Balls in play: one per palette color, plus one in God mode
    pub fn ball_count(&self) -> usize {
        match self {
            Difficulty::God => BALL_PALETTE.len() + 1,
            _ => BALL_PALETTE.len(),
        }
    }

    /// Accent color for buttons and HUD
    pub fn accent(&self) -> Rgba {
        match self {
            Difficulty::Medium => colors::MEDIUM_GREEN,
            Difficulty::Hard => colors::HARD_RED,
            Difficulty::God => colors::GOD_PURPLE,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "god" => Ok(Difficulty::God),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, balls bounce in the background
    Menu,
    /// Active run
    Playing,
    /// Run ended
    GameOver { final_score: u32, is_new_best: bool },
}

/// Timed player effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Movement speed override
    SpeedBoost,
    /// Balls pass through harmlessly
    Invincibility,
    /// Balls are deflected instead of lethal
    BounceShield,
}

/// An effect flag and the timer that will switch it off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectSlot {
    pub active: bool,
    pub timer: Option<TimerHandle>,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner of the body rectangle
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub head_radius: f32,
    pub head_offset: f32,
    pub base_speed: f32,
    /// Current speed in units per tick
    pub speed: f32,
    /// Difficulty scaling applied when no speed boost is active
    speed_factor: f32,
    boost_multiplier: f32,
    effect_duration_ms: u64,
    pub alive: bool,
    pub speed_boost: EffectSlot,
    pub invincibility: EffectSlot,
    pub bounce_shield: EffectSlot,
    /// Whole seconds survived this run
    pub score: u32,
    start_time_ms: u64,
    /// Best score per difficulty, mirrored from the store
    pub high_scores: HighScores,
    /// Glow pulse animation phase
    pub glow_phase: f32,
}

impl Player {
    pub fn new(tuning: &Tuning, high_scores: HighScores) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            width: tuning.player_width,
            height: tuning.player_height,
            head_radius: tuning.player_head_radius,
            head_offset: tuning.player_head_offset,
            base_speed: tuning.player_base_speed,
            speed: tuning.player_base_speed,
            speed_factor: 1.0,
            boost_multiplier: tuning.speed_boost_multiplier,
            effect_duration_ms: tuning.effect_duration_ms,
            alive: true,
            speed_boost: EffectSlot::default(),
            invincibility: EffectSlot::default(),
            bounce_shield: EffectSlot::default(),
            score: 0,
            start_time_ms: 0,
            high_scores,
            glow_phase: 0.0,
        };
        player.center_in(tuning.canvas());
        player
    }

    /// Put the player back at the canvas center, alive, with no effects
    pub fn reset(&mut self, canvas: Vec2, speed_factor: f32, scheduler: &mut Scheduler) {
        self.center_in(canvas);
        self.alive = true;
        self.speed_factor = speed_factor;
        for effect in [Effect::SpeedBoost, Effect::Invincibility, Effect::BounceShield] {
            let slot = self.slot_mut(effect);
            slot.active = false;
            scheduler.cancel_slot(&mut slot.timer);
        }
        self.refresh_speed();
        self.reset_score(scheduler.now_ms());
    }

    fn center_in(&mut self, canvas: Vec2) {
        self.pos = Vec2::new(
            canvas.x / 2.0 - self.width / 2.0,
            canvas.y / 2.0 - self.height / 2.0,
        );
    }

    /// Center of the body rectangle
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Center of the head circle, above the body
    pub fn head_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y - self.head_offset)
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed_boost.active
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.active
    }

    pub fn has_bounce_shield(&self) -> bool {
        self.bounce_shield.active
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.slot(effect).active
    }

    pub fn slot(&self, effect: Effect) -> &EffectSlot {
        match effect {
            Effect::SpeedBoost => &self.speed_boost,
            Effect::Invincibility => &self.invincibility,
            Effect::BounceShield => &self.bounce_shield,
        }
    }

    fn slot_mut(&mut self, effect: Effect) -> &mut EffectSlot {
        match effect {
            Effect::SpeedBoost => &mut self.speed_boost,
            Effect::Invincibility => &mut self.invincibility,
            Effect::BounceShield => &mut self.bounce_shield,
        }
    }

    fn refresh_speed(&mut self) {
        self.speed = if self.speed_boost.active {
            self.base_speed * self.boost_multiplier
        } else {
            self.base_speed * self.speed_factor
        };
    }

    /// Turn an effect on for `duration_ms`. Re-activating restarts the
    /// countdown; the stale timer is cancelled so it cannot end the new one.
    pub fn activate_effect(&mut self, effect: Effect, duration_ms: u64, scheduler: &mut Scheduler) {
        let slot = self.slot_mut(effect);
        slot.active = true;
        scheduler.cancel_slot(&mut slot.timer);
        slot.timer = Some(scheduler.schedule(duration_ms, TimerEvent::EffectExpired(effect)));
        self.refresh_speed();
    }

    pub fn activate_power_up(&mut self, scheduler: &mut Scheduler) {
        self.activate_effect(Effect::SpeedBoost, self.effect_duration_ms, scheduler);
    }

    pub fn activate_invincibility(&mut self, scheduler: &mut Scheduler) {
        self.activate_effect(Effect::Invincibility, self.effect_duration_ms, scheduler);
    }

    pub fn activate_bounce_shield(&mut self, scheduler: &mut Scheduler) {
        self.activate_effect(Effect::BounceShield, self.effect_duration_ms, scheduler);
    }

    /// Apply an expiry timer. Ignored unless `handle` is the slot's current timer.
    pub fn expire_effect(&mut self, effect: Effect, handle: TimerHandle) -> bool {
        let slot = self.slot_mut(effect);
        if slot.timer != Some(handle) {
            return false;
        }
        slot.active = false;
        slot.timer = None;
        self.refresh_speed();
        true
    }

    /// Move by `axis` (each component in -1..=1) times current speed,
    /// keeping the body inside the canvas
    pub fn move_by(&mut self, axis: Vec2, canvas: Vec2) {
        if !self.alive {
            return;
        }
        let next = self.pos + axis * self.speed;
        self.pos = Vec2::new(
            next.x.clamp(0.0, (canvas.x - self.width).max(0.0)),
            next.y.clamp(0.0, (canvas.y - self.height).max(0.0)),
        );
    }

    /// Test a ball against the player. Returns true only for a lethal hit;
    /// a shielded hit deflects the ball and returns false.
    pub fn check_collision(&self, ball: &mut Ball, deflect_boost: f32) -> bool {
        resolve_player_ball(self, ball, deflect_boost) == Contact::Lethal
    }

    pub fn reset_score(&mut self, now_ms: u64) {
        self.score = 0;
        self.start_time_ms = now_ms;
    }

    /// Recompute elapsed seconds and write a new best through to the store.
    /// Returns true when this call raised the best.
    pub fn update_score(
        &mut self,
        now_ms: u64,
        difficulty: Difficulty,
        store: &mut dyn HighScoreStore,
    ) -> bool {
        if !self.alive {
            return false;
        }
        self.score = (now_ms.saturating_sub(self.start_time_ms) / 1000) as u32;
        if self.high_scores.record(difficulty, self.score) {
            store.set_high_score(difficulty, self.score);
            return true;
        }
        false
    }

    pub fn best(&self, difficulty: Difficulty) -> u32 {
        self.high_scores.get(difficulty)
    }

    /// Whether the current score counts as a new high score
    pub fn is_new_best(&self, difficulty: Difficulty) -> bool {
        self.score >= self.best(difficulty)
    }
}

/// A bouncing ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub color: Rgba,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass: BALL_MASS,
            color,
        }
    }

    /// Spawn at a random in-bounds position heading in a random direction
    pub fn spawn_random(
        rng: &mut impl Rng,
        canvas: Vec2,
        radius: f32,
        speed: f32,
        color: Rgba,
    ) -> Self {
        let pos = Vec2::new(
            rng.random::<f32>() * (canvas.x - radius * 2.0) + radius,
            rng.random::<f32>() * (canvas.y - radius * 2.0) + radius,
        );
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        Self::new(pos, Vec2::from_angle(angle) * speed, radius, color)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;

    fn player() -> Player {
        Player::new(&Tuning::default(), HighScores::default())
    }

    fn drain(player: &mut Player, scheduler: &mut Scheduler, until: u64) {
        while let Some(fired) = scheduler.poll(until) {
            if let TimerEvent::EffectExpired(effect) = fired.event {
                player.expire_effect(effect, fired.handle);
            }
        }
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" god ".parse::<Difficulty>().unwrap(), Difficulty::God);
        assert!(matches!(
            "easy".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_difficulty_parameters() {
        assert_eq!(Difficulty::Medium.ball_count(), 5);
        assert_eq!(Difficulty::Hard.ball_count(), 5);
        assert_eq!(Difficulty::God.ball_count(), 6);
        let tuning = Tuning::default();
        assert_eq!(Difficulty::God.player_speed_factor(&tuning), 1.15);
        assert_eq!(Difficulty::Hard.player_speed_factor(&tuning), 1.0);
    }

    #[test]
    fn test_player_starts_centered() {
        let p = player();
        assert_eq!(p.center(), Vec2::new(400.0, 300.0));
        assert_eq!(p.head_center(), Vec2::new(400.0, 285.0 - 5.0));
    }

    #[test]
    fn test_reactivation_refreshes_instead_of_stacking() {
        let mut p = player();
        let mut s = Scheduler::new(0);

        p.activate_invincibility(&mut s);
        drain(&mut p, &mut s, 2000);
        p.activate_invincibility(&mut s);
        assert_eq!(s.pending(), 1);

        // Past the first expiry, before the second
        drain(&mut p, &mut s, 6000);
        assert!(p.is_invincible());

        drain(&mut p, &mut s, 7000);
        assert!(!p.is_invincible());
        assert!(p.invincibility.timer.is_none());
    }

    #[test]
    fn test_speed_boost_overrides_and_restores_speed() {
        let tuning = Tuning::default();
        let mut p = player();
        let mut s = Scheduler::new(0);
        p.reset(tuning.canvas(), 1.15, &mut s);
        assert!((p.speed - 5.75).abs() < 1e-5);

        p.activate_power_up(&mut s);
        assert_eq!(p.speed, 10.0);

        drain(&mut p, &mut s, 5000);
        assert!(!p.has_speed_boost());
        assert!((p.speed - 5.75).abs() < 1e-5);
    }

    #[test]
    fn test_shield_and_invincibility_leave_speed_alone() {
        let mut p = player();
        let mut s = Scheduler::new(0);
        p.activate_bounce_shield(&mut s);
        p.activate_invincibility(&mut s);
        assert_eq!(p.speed, p.base_speed);
    }

    #[test]
    fn test_stale_handle_does_not_expire() {
        let mut p = player();
        let mut s = Scheduler::new(0);
        p.activate_bounce_shield(&mut s);
        let old = p.bounce_shield.timer.unwrap();
        p.activate_bounce_shield(&mut s);
        assert!(!p.expire_effect(Effect::BounceShield, old));
        assert!(p.has_bounce_shield());
    }

    #[test]
    fn test_reset_cancels_effect_timers() {
        let tuning = Tuning::default();
        let mut p = player();
        let mut s = Scheduler::new(0);
        p.activate_power_up(&mut s);
        p.activate_invincibility(&mut s);
        p.activate_bounce_shield(&mut s);
        p.reset(tuning.canvas(), 1.0, &mut s);
        assert_eq!(s.pending(), 0);
        assert!(!p.has_speed_boost() && !p.is_invincible() && !p.has_bounce_shield());
    }

    #[test]
    fn test_move_is_clamped_to_canvas() {
        let canvas = Vec2::new(800.0, 600.0);
        let mut p = player();
        p.pos = Vec2::new(2.0, 598.0 - p.height);
        p.move_by(Vec2::new(-1.0, 1.0), canvas);
        assert_eq!(p.pos, Vec2::new(0.0, 600.0 - p.height));

        p.pos = Vec2::new(800.0 - p.width - 1.0, 1.0);
        p.move_by(Vec2::new(1.0, -1.0), canvas);
        assert_eq!(p.pos, Vec2::new(800.0 - p.width, 0.0));
    }

    #[test]
    fn test_dead_player_does_not_move() {
        let mut p = player();
        let start = p.pos;
        p.alive = false;
        p.move_by(Vec2::X, Vec2::new(800.0, 600.0));
        assert_eq!(p.pos, start);
    }

    #[test]
    fn test_score_writes_through_new_best() {
        let mut p = player();
        let mut store = MemoryStore::default();
        store.set_high_score(Difficulty::Medium, 3);
        p.high_scores = HighScores::load_from(&store);
        p.reset_score(1_000);

        assert!(!p.update_score(3_999, Difficulty::Medium, &mut store));
        assert_eq!(p.score, 2);

        assert!(p.update_score(5_000, Difficulty::Medium, &mut store));
        assert_eq!(p.score, 4);
        assert_eq!(store.get_high_score(Difficulty::Medium), 4);
        assert!(p.is_new_best(Difficulty::Medium));
    }

    #[test]
    fn test_dead_player_score_is_frozen() {
        let mut p = player();
        let mut store = MemoryStore::default();
        p.reset_score(0);
        p.update_score(10_000, Difficulty::Hard, &mut store);
        p.alive = false;
        p.update_score(50_000, Difficulty::Hard, &mut store);
        assert_eq!(p.score, 10);
    }

    #[test]
    fn test_spawned_ball_is_in_bounds_at_speed() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let canvas = Vec2::new(800.0, 600.0);
        for _ in 0..100 {
            let b = Ball::spawn_random(&mut rng, canvas, 20.0, 7.5, colors::RED);
            assert!(b.pos.x >= 20.0 && b.pos.x <= 780.0);
            assert!(b.pos.y >= 20.0 && b.pos.y <= 580.0);
            assert!((b.speed() - 7.5).abs() < 1e-4);
        }
    }
}
