//! Browser glue
//!
//! The page owns the canvas and the `requestAnimationFrame` loop. It forwards
//! key and click events to a [`WebGame`] and paints the JSON command list
//! returned by [`WebGame::frame`].

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::{InputState, Viewport, now_ms};
use crate::highscores::LocalStorageStore;
use crate::renderer::CommandBuffer;
use crate::sim::{Game, GameEvent, tick};
use crate::tuning::Tuning;

/// Route `log` to the browser console and panics to `console.error`
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    init();
    log::info!("Ball Dodge (web) starting...");
}

/// A running game bound to LocalStorage high scores
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    input: InputState,
    viewport: Viewport,
    frame: CommandBuffer,
}

#[wasm_bindgen]
impl WebGame {
    /// New game at the main menu, seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsError> {
        let now = now_ms();
        let tuning = Tuning::default();
        let viewport = Viewport {
            origin: Vec2::ZERO,
            size: tuning.canvas(),
        };
        let game = Game::new(tuning, Box::new(LocalStorageStore), now, now)?;
        log::info!("Game initialized with seed: {}", now);
        Ok(WebGame {
            game,
            input: InputState::new(),
            viewport,
            frame: CommandBuffer::new(),
        })
    }

    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Window lost focus; stop moving
    pub fn blur(&mut self) {
        self.input.release_all();
    }

    /// Canvas bounding rect in client coordinates (`getBoundingClientRect`)
    pub fn set_viewport(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.viewport = Viewport {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        };
    }

    pub fn click(&mut self, client_x: f32, client_y: f32) {
        let canvas = self.game.canvas();
        self.input.click(Vec2::new(client_x, client_y), &self.viewport, canvas);
    }

    /// Advance one animation frame and return its draw commands as JSON
    pub fn frame(&mut self) -> Result<String, JsError> {
        let input = self.input.sample();
        self.frame.clear();
        for event in tick(&mut self.game, &input, now_ms(), &mut self.frame) {
            if let GameEvent::PlayerDied { final_score, .. } = event {
                log::info!("Player died after {}s", final_score);
            }
        }
        Ok(self.frame.to_json()?)
    }
}
