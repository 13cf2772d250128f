//! Menu, HUD and game-over overlays
//!
//! Button geometry is a pure function of the canvas size. The same layout is
//! used to draw a frame and to hit-test clicks, so there is no listener state
//! to keep in sync with what is on screen.

use glam::Vec2;

use crate::highscores::HighScores;
use crate::renderer::{DrawCommand, Glow, RenderSink, Rgba, TextAlign, colors};
use crate::sim::Difficulty;

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Edge-inclusive containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x <= self.pos.x + self.size.x
            && p.y >= self.pos.y
            && p.y <= self.pos.y + self.size.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// What a click on a button asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    SelectDifficulty(Difficulty),
    Play,
    PlayAgain,
    MainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub action: UiAction,
    pub label: &'static str,
}

const DIFFICULTY_BUTTON_SIZE: Vec2 = Vec2::new(120.0, 40.0);
const DIFFICULTY_BUTTON_SPACING: f32 = 20.0;
const WIDE_BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);
const BUTTON_GLOW_BLUR: f32 = 15.0;

/// Menu buttons: three difficulties in a row, then Play
pub fn menu_buttons(canvas: Vec2) -> [Button; 4] {
    let size = DIFFICULTY_BUTTON_SIZE;
    let step = size.x + DIFFICULTY_BUTTON_SPACING;
    let total_width = size.x * 3.0 + DIFFICULTY_BUTTON_SPACING * 2.0;
    let start_x = canvas.x / 2.0 - total_width / 2.0;
    let row_y = canvas.y / 2.0 + 20.0;

    let difficulty = |i: usize, d: Difficulty| Button {
        rect: Rect::new(start_x + step * i as f32, row_y, size.x, size.y),
        action: UiAction::SelectDifficulty(d),
        label: d.as_str(),
    };

    [
        difficulty(0, Difficulty::Medium),
        difficulty(1, Difficulty::Hard),
        difficulty(2, Difficulty::God),
        Button {
            rect: Rect::new(
                canvas.x / 2.0 - WIDE_BUTTON_SIZE.x / 2.0,
                canvas.y / 2.0 + 100.0,
                WIDE_BUTTON_SIZE.x,
                WIDE_BUTTON_SIZE.y,
            ),
            action: UiAction::Play,
            label: "Play Game",
        },
    ]
}

/// Game-over buttons: Play Again above Main Menu
pub fn game_over_buttons(canvas: Vec2) -> [Button; 2] {
    let x = canvas.x / 2.0 - WIDE_BUTTON_SIZE.x / 2.0;
    let play_again_y = canvas.y / 2.0 + 80.0;
    let main_menu_y = play_again_y + WIDE_BUTTON_SIZE.y + 20.0;
    [
        Button {
            rect: Rect::new(x, play_again_y, WIDE_BUTTON_SIZE.x, WIDE_BUTTON_SIZE.y),
            action: UiAction::PlayAgain,
            label: "Play Again",
        },
        Button {
            rect: Rect::new(x, main_menu_y, WIDE_BUTTON_SIZE.x, WIDE_BUTTON_SIZE.y),
            action: UiAction::MainMenu,
            label: "Main Menu",
        },
    ]
}

/// First button containing `point`
pub fn hit_test(buttons: &[Button], point: Vec2) -> Option<UiAction> {
    buttons
        .iter()
        .find(|b| b.rect.contains(point))
        .map(|b| b.action)
}

fn draw_button(
    sink: &mut dyn RenderSink,
    button: &Button,
    fill: Rgba,
    glow: Rgba,
    font_px: f32,
    baseline: f32,
) {
    sink.draw(DrawCommand::FillRect {
        pos: button.rect.pos,
        size: button.rect.size,
        color: fill,
        glow: Some(Glow {
            color: glow,
            blur: BUTTON_GLOW_BLUR,
        }),
    });
    sink.text(
        button.label,
        Vec2::new(button.rect.center_x(), button.rect.pos.y + baseline),
        font_px,
        TextAlign::Center,
        colors::WHITE,
    );
}

/// Main menu overlay: scoreboard, title, difficulty row, play button
pub fn draw_menu(
    sink: &mut dyn RenderSink,
    canvas: Vec2,
    selected: Difficulty,
    scores: &HighScores,
) {
    sink.fill_rect(Vec2::ZERO, canvas, colors::MENU_FADE);

    let mid = canvas.x / 2.0;
    let board_y = 80.0;
    sink.text(
        "High Scores",
        Vec2::new(mid, board_y),
        24.0,
        TextAlign::Center,
        colors::WHITE,
    );
    for (i, d) in Difficulty::ALL.iter().enumerate() {
        let x = mid + (i as f32 - 1.0) * 180.0;
        sink.text(
            d.as_str(),
            Vec2::new(x, board_y + 40.0),
            20.0,
            TextAlign::Center,
            d.accent(),
        );
        sink.text(
            &format!("{}s", scores.get(*d)),
            Vec2::new(x, board_y + 70.0),
            20.0,
            TextAlign::Center,
            colors::WHITE,
        );
    }

    sink.text(
        "Ball Dodge",
        Vec2::new(mid, canvas.y / 3.0 + 50.0),
        64.0,
        TextAlign::Center,
        colors::MEDIUM_GREEN,
    );
    sink.text(
        "Select Difficulty:",
        Vec2::new(mid, canvas.y / 2.0),
        24.0,
        TextAlign::Center,
        colors::WHITE,
    );

    for button in menu_buttons(canvas) {
        match button.action {
            UiAction::SelectDifficulty(d) => {
                let color = if d == selected { d.accent() } else { colors::GREY };
                draw_button(sink, &button, color, color, 24.0, 28.0);
            }
            _ => draw_button(
                sink,
                &button,
                colors::MEDIUM_GREEN,
                colors::MEDIUM_GREEN,
                32.0,
                35.0,
            ),
        }
    }

    sink.text(
        "Use WASD or Arrow Keys to move",
        Vec2::new(mid, canvas.y - 80.0),
        18.0,
        TextAlign::Center,
        colors::DIM_GREY,
    );
    sink.text(
        "Collect power-ups to survive longer",
        Vec2::new(mid, canvas.y - 50.0),
        18.0,
        TextAlign::Center,
        colors::DIM_GREY,
    );
}

/// In-game HUD: time and best on the left, difficulty on the right
pub fn draw_hud(
    sink: &mut dyn RenderSink,
    canvas: Vec2,
    score: u32,
    best: u32,
    difficulty: Difficulty,
) {
    sink.text(
        &format!("Time: {score}s"),
        Vec2::new(10.0, 30.0),
        24.0,
        TextAlign::Left,
        colors::WHITE,
    );
    sink.text(
        &format!("Best: {best}s"),
        Vec2::new(10.0, 60.0),
        24.0,
        TextAlign::Left,
        colors::WHITE,
    );
    sink.text(
        &format!("Difficulty: {difficulty}"),
        Vec2::new(canvas.x - 10.0, 30.0),
        24.0,
        TextAlign::Right,
        difficulty.accent(),
    );
}

/// Game-over overlay with final time and restart/menu buttons
pub fn draw_game_over(
    sink: &mut dyn RenderSink,
    canvas: Vec2,
    final_score: u32,
    is_new_best: bool,
) {
    sink.fill_rect(Vec2::ZERO, canvas, colors::GAME_OVER_SHADE);

    let mid = canvas.x / 2.0;
    let cy = canvas.y / 2.0;
    sink.text(
        "Game Over!",
        Vec2::new(mid, cy - 80.0),
        48.0,
        TextAlign::Center,
        colors::RED,
    );
    sink.text(
        &format!("Survival Time: {final_score} seconds"),
        Vec2::new(mid, cy - 20.0),
        32.0,
        TextAlign::Center,
        colors::WHITE,
    );
    if is_new_best {
        sink.text(
            "New High Score!",
            Vec2::new(mid, cy + 20.0),
            32.0,
            TextAlign::Center,
            colors::GOLD,
        );
    }

    let [play_again, main_menu] = game_over_buttons(canvas);
    draw_button(
        sink,
        &play_again,
        colors::MEDIUM_GREEN,
        colors::MEDIUM_GREEN,
        24.0,
        32.0,
    );
    draw_button(sink, &main_menu, colors::GREY, colors::GREY, 24.0, 32.0);
}
