//! Game root and state machine
//!
//! `Game` owns every piece of simulation state: player, balls, pickups, the
//! timer queue, the RNG and the high-score store. Phase transitions:
//!
//! Menu --Play--> Playing --player dies--> GameOver --Play Again--> Playing
//!                                                  --Main Menu--> Menu

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Contact, resolve_player_ball};
use super::pickup::{Pickup, PickupKind, RespawnWindow};
use super::scheduler::{Fired, Scheduler, TimerEvent};
use super::state::{
    BALL_PALETTE, Ball, Difficulty, Effect, GamePhase, OVERFLOW_BALL_COLOR, Player,
};
use crate::error::{GameError, Result};
use crate::highscores::{HighScoreStore, HighScores};
use crate::tuning::Tuning;
use crate::ui::{self, UiAction};

/// Something that happened during a tick, for audio/analytics hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A click landed on a button
    Ui(UiAction),
    PickupSpawned(PickupKind),
    PickupCollected(PickupKind),
    EffectExpired(Effect),
    /// A shielded player bounced a ball away
    BallDeflected,
    /// The player died; the run is over
    PlayerDied { final_score: u32, is_new_best: bool },
}

pub struct Game {
    pub tuning: Tuning,
    pub phase: GamePhase,
    difficulty: Difficulty,
    pub player: Player,
    pub balls: Vec<Ball>,
    /// One pickup per kind, indexed by [`PickupKind::index`]
    pub pickups: [Pickup; 3],
    pub scheduler: Scheduler,
    rng: Pcg32,
    store: Box<dyn HighScoreStore>,
}

impl Game {
    /// Create a game showing the main menu, with background balls and
    /// pickup timers already running. Fails if `tuning` is unusable.
    pub fn new(
        tuning: Tuning,
        store: Box<dyn HighScoreStore>,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self> {
        tuning.validate()?;
        let high_scores = HighScores::load_from(store.as_ref());
        let player = Player::new(&tuning, high_scores);
        let pickups = PickupKind::ALL.map(|kind| Pickup::new(kind, tuning.pickup_radius));

        let mut game = Self {
            tuning,
            phase: GamePhase::Menu,
            difficulty: Difficulty::default(),
            player,
            balls: Vec::new(),
            pickups,
            scheduler: Scheduler::new(now_ms),
            rng: Pcg32::seed_from_u64(seed),
            store,
        };

        let window = game.respawn_window();
        for pickup in game.pickups.iter_mut() {
            pickup.schedule_spawn(&mut game.scheduler, &mut game.rng, window);
        }
        game.ensure_menu_balls();
        Ok(game)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Change difficulty. Only allowed from the main menu.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        if self.phase != GamePhase::Menu {
            return Err(GameError::DifficultyLocked);
        }
        self.difficulty = difficulty;
        Ok(())
    }

    /// Parse and apply a difficulty name
    pub fn select_difficulty(&mut self, name: &str) -> Result<()> {
        let difficulty = name.parse()?;
        self.set_difficulty(difficulty)
    }

    pub fn canvas(&self) -> Vec2 {
        self.tuning.canvas()
    }

    pub fn respawn_window(&self) -> RespawnWindow {
        RespawnWindow {
            min_ms: self.tuning.respawn_min_ms,
            max_ms: self.tuning.respawn_max_ms,
        }
    }

    pub fn pickup(&self, kind: PickupKind) -> &Pickup {
        &self.pickups[kind.index()]
    }

    pub fn store(&self) -> &dyn HighScoreStore {
        self.store.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Ball speed for the current difficulty
    pub fn ball_speed(&self) -> f32 {
        self.tuning.ball_base_speed * self.difficulty.ball_speed_factor()
    }

    /// Start (or restart) a run with the current difficulty
    pub fn start_game(&mut self) {
        let canvas = self.canvas();
        let speed_factor = self.difficulty.player_speed_factor(&self.tuning);
        self.player.reset(canvas, speed_factor, &mut self.scheduler);

        self.balls.clear();
        self.spawn_balls(self.difficulty.ball_count());

        // Grace period replaces the usual effect duration
        self.player.activate_effect(
            Effect::Invincibility,
            self.tuning.grace_invincibility_ms,
            &mut self.scheduler,
        );

        let window = self.respawn_window();
        for pickup in self.pickups.iter_mut() {
            pickup.reset(&mut self.scheduler, &mut self.rng, window);
        }

        self.phase = GamePhase::Playing;
        log::info!(
            "Game started on {} with {} balls",
            self.difficulty,
            self.balls.len()
        );
    }

    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.ensure_menu_balls();
        log::info!("Returned to main menu");
    }

    /// Menu background: one ball per palette color if none are around
    pub fn ensure_menu_balls(&mut self) {
        if self.phase == GamePhase::Menu && self.balls.is_empty() {
            self.spawn_balls(BALL_PALETTE.len());
        }
    }

    fn spawn_balls(&mut self, count: usize) {
        let canvas = self.canvas();
        let speed = self.ball_speed();
        let radius = self.tuning.ball_radius;
        for i in 0..count {
            let color = BALL_PALETTE.get(i).copied().unwrap_or(OVERFLOW_BALL_COLOR);
            let ball = Ball::spawn_random(&mut self.rng, canvas, radius, speed, color);
            self.balls.push(ball);
        }
    }

    /// Fire every timer due by `now_ms`, in order, and move the clock there
    pub fn process_timers(&mut self, now_ms: u64, events: &mut Vec<GameEvent>) {
        while let Some(fired) = self.scheduler.poll(now_ms) {
            self.handle_timer(fired, events);
        }
    }

    fn handle_timer(&mut self, fired: Fired, events: &mut Vec<GameEvent>) {
        match fired.event {
            TimerEvent::EffectExpired(effect) => {
                if self.player.expire_effect(effect, fired.handle) {
                    log::debug!("{:?} expired", effect);
                    events.push(GameEvent::EffectExpired(effect));
                }
            }
            TimerEvent::PickupSpawn(kind) => {
                let window = self.respawn_window();
                let canvas = self.canvas();
                let pickup = &mut self.pickups[kind.index()];
                if pickup.spawn_timer != Some(fired.handle) {
                    return;
                }
                if pickup.spawn(&self.player, &mut self.scheduler, &mut self.rng, window, canvas) {
                    events.push(GameEvent::PickupSpawned(kind));
                }
            }
        }
    }

    /// Route a click (canvas coordinates) to whatever button is under it
    pub fn handle_click(&mut self, point: Vec2) -> Option<UiAction> {
        let canvas = self.canvas();
        let action = match self.phase {
            GamePhase::Menu => ui::hit_test(&ui::menu_buttons(canvas), point),
            GamePhase::GameOver { .. } => ui::hit_test(&ui::game_over_buttons(canvas), point),
            GamePhase::Playing => None,
        }?;
        self.apply_action(action);
        Some(action)
    }

    pub fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::SelectDifficulty(difficulty) => {
                if let Err(e) = self.set_difficulty(difficulty) {
                    log::warn!("Ignoring difficulty change: {}", e);
                }
            }
            UiAction::Play | UiAction::PlayAgain => self.start_game(),
            UiAction::MainMenu => self.return_to_menu(),
        }
    }

    /// Recompute survival time, persisting a new best immediately
    pub fn update_score(&mut self) -> bool {
        let now = self.scheduler.now_ms();
        self.player
            .update_score(now, self.difficulty, self.store.as_mut())
    }

    /// Collect every pickup the player is touching
    pub fn collect_pickups(&mut self, events: &mut Vec<GameEvent>) {
        let window = self.respawn_window();
        for pickup in self.pickups.iter_mut() {
            if pickup.check_collision(&self.player) {
                pickup.collect(&mut self.player, &mut self.scheduler, &mut self.rng, window);
                events.push(GameEvent::PickupCollected(pickup.kind));
            }
        }
    }

    /// Test every ball against the player. All balls are checked even after
    /// a lethal one so each shielded contact is resolved. Returns true if the
    /// player died.
    pub fn check_ball_hits(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let boost = self.tuning.shield_deflect_boost;
        let mut lethal = false;
        for ball in self.balls.iter_mut() {
            match resolve_player_ball(&self.player, ball, boost) {
                Contact::Lethal => lethal = true,
                Contact::Deflected => events.push(GameEvent::BallDeflected),
                Contact::Miss => {}
            }
        }
        if lethal {
            let (final_score, is_new_best) = self.end_game();
            events.push(GameEvent::PlayerDied {
                final_score,
                is_new_best,
            });
        }
        lethal
    }

    fn end_game(&mut self) -> (u32, bool) {
        self.player.alive = false;
        let final_score = self.player.score;
        let is_new_best = self.player.is_new_best(self.difficulty);
        self.phase = GamePhase::GameOver {
            final_score,
            is_new_best,
        };
        log::info!(
            "Game over on {}: survived {}s (best {}s){}",
            self.difficulty,
            final_score,
            self.player.best(self.difficulty),
            if is_new_best { ", new high score" } else { "" }
        );
        (final_score, is_new_best)
    }
}
