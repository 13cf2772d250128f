//! Rendering boundary
//!
//! The simulation never touches a real surface. Each frame it emits a list of
//! draw primitives into a [`RenderSink`]; the host (canvas 2D, GPU, tests)
//! turns them into pixels.

pub mod shapes;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color, components in 0..=1
pub type Rgba = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];
    pub const GREEN: Rgba = [0.0, 0.5, 0.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 0.647, 0.0, 1.0];
    pub const PURPLE: Rgba = [0.5, 0.0, 0.5, 1.0];
    pub const GOLD: Rgba = [1.0, 0.843, 0.0, 1.0];
    pub const CYAN: Rgba = [0.0, 1.0, 1.0, 1.0];
    pub const MAGENTA: Rgba = [1.0, 0.0, 1.0, 1.0];
    pub const GREY: Rgba = [0.4, 0.4, 0.4, 1.0];
    pub const DIM_GREY: Rgba = [0.533, 0.533, 0.533, 1.0];

    /// Difficulty accents
    pub const MEDIUM_GREEN: Rgba = [0.298, 0.686, 0.314, 1.0]; // #4CAF50
    pub const HARD_RED: Rgba = [1.0, 0.267, 0.267, 1.0]; // #ff4444
    pub const GOD_PURPLE: Rgba = [0.6, 0.196, 0.8, 1.0]; // #9932CC

    /// Translucent clears
    pub const MENU_FADE: Rgba = [0.0, 0.0, 0.0, 0.35];
    pub const GAME_OVER_SHADE: Rgba = [0.0, 0.0, 0.0, 0.5];
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Soft shadow/glow around a filled shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

/// A single draw primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    FillRect {
        pos: Vec2,
        size: Vec2,
        color: Rgba,
        glow: Option<Glow>,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        glow: Option<Glow>,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        line_width: f32,
        color: Rgba,
    },
    /// Closed outline through `points`
    StrokePolygon {
        points: Vec<Vec2>,
        line_width: f32,
        color: Rgba,
    },
    /// `pos` is the text baseline anchor
    Text {
        text: String,
        pos: Vec2,
        font_px: f32,
        align: TextAlign,
        color: Rgba,
    },
}

/// Anything that accepts draw primitives
pub trait RenderSink {
    fn draw(&mut self, command: DrawCommand);

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        self.draw(DrawCommand::FillRect {
            pos,
            size,
            color,
            glow: None,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.draw(DrawCommand::FillCircle {
            center,
            radius,
            color,
            glow: None,
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, font_px: f32, align: TextAlign, color: Rgba) {
        self.draw(DrawCommand::Text {
            text: text.to_string(),
            pos,
            font_px,
            align,
            color,
        });
    }
}

/// Records commands for later playback (host renderer, tests, headless runs)
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's commands, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text strings drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// True if any drawn text contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Serialize this frame's commands for a JavaScript canvas renderer
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(&self.commands)?)
    }
}

impl RenderSink for CommandBuffer {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_json_is_a_command_array() {
        let mut sink = CommandBuffer::new();
        sink.fill_circle(Vec2::new(10.0, 20.0), 5.0, colors::RED);
        sink.text(
            "Time: 3s",
            Vec2::new(10.0, 30.0),
            24.0,
            TextAlign::Left,
            colors::WHITE,
        );

        let json = sink.to_json().unwrap();
        let parsed: Vec<DrawCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sink.commands);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["FillCircle"]["radius"], 5.0);
        assert_eq!(value[1]["Text"]["align"], "Left");
    }

    #[test]
    fn test_empty_frame_encodes_empty_array() {
        assert_eq!(CommandBuffer::new().to_json().unwrap(), "[]");
    }
}
