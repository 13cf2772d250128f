//! Keyboard and pointer sampling
//!
//! The host forwards raw key names (`KeyboardEvent.key` style) and client
//! click coordinates; the frame driver samples the result once per tick.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Movement keys, with WASD aliases for the arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    W,
    S,
}

impl Key {
    /// Map a key name to a movement key; letters are case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "a" | "A" => Some(Key::A),
            "d" | "D" => Some(Key::D),
            "w" | "W" => Some(Key::W),
            "s" | "S" => Some(Key::S),
            _ => None,
        }
    }
}

/// Where the canvas sits in client coordinates, and how big it is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Viewport {
    /// Translate a client-space point into logical canvas coordinates
    pub fn to_canvas(&self, client: Vec2, canvas: Vec2) -> Vec2 {
        let local = client - self.origin;
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return local;
        }
        local * canvas / self.size
    }
}

/// Current input state as reported by the host
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    /// Most recent click in canvas coordinates, not yet consumed
    click: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed; unknown keys are ignored
    pub fn key_down(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.insert(key);
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop all held keys (e.g. on focus loss)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Record a click given in client coordinates
    pub fn click(&mut self, client: Vec2, viewport: &Viewport, canvas: Vec2) {
        self.click = Some(viewport.to_canvas(client, canvas));
    }

    /// Movement direction; opposite keys cancel out
    pub fn axis(&self) -> Vec2 {
        let left = self.is_held(Key::ArrowLeft) || self.is_held(Key::A);
        let right = self.is_held(Key::ArrowRight) || self.is_held(Key::D);
        let up = self.is_held(Key::ArrowUp) || self.is_held(Key::W);
        let down = self.is_held(Key::ArrowDown) || self.is_held(Key::S);

        let x = right as i32 - left as i32;
        let y = down as i32 - up as i32;
        Vec2::new(x as f32, y as f32)
    }

    /// Sample this tick's input, consuming the pending click
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            axis: self.axis(),
            click: self.click.take(),
        }
    }
}
