//! Per-frame driver
//!
//! One call to [`tick`] is one animation frame: due timers fire, a pending
//! click is routed to the visible buttons, balls move and collide, and the
//! frame is drawn into the sink. Gameplay only advances while `Playing`;
//! balls keep bouncing behind the menu and game-over overlays.

use glam::Vec2;

use super::game::{Game, GameEvent};
use super::physics;
use super::state::GamePhase;
use crate::renderer::{RenderSink, colors, shapes};
use crate::ui;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement direction, each component in -1..=1
    pub axis: Vec2,
    /// Click position in canvas coordinates
    pub click: Option<Vec2>,
}

/// Advance the game by one frame at wall time `now_ms` and draw it
pub fn tick(
    game: &mut Game,
    input: &TickInput,
    now_ms: u64,
    sink: &mut dyn RenderSink,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    game.process_timers(now_ms, &mut events);

    if let Some(point) = input.click {
        if let Some(action) = game.handle_click(point) {
            events.push(GameEvent::Ui(action));
        }
    }
    game.ensure_menu_balls();

    let canvas = game.canvas();
    // Overlays leave trails behind the bouncing balls
    let clear = if game.is_playing() {
        colors::BLACK
    } else {
        colors::MENU_FADE
    };
    sink.fill_rect(Vec2::ZERO, canvas, clear);

    physics::step_balls(&mut game.balls, canvas);
    for ball in &game.balls {
        shapes::ball(sink, ball);
    }

    match game.phase {
        GamePhase::Menu => {
            ui::draw_menu(sink, canvas, game.difficulty(), &game.player.high_scores);
        }
        GamePhase::Playing => play_frame(game, input, now_ms, sink, &mut events),
        GamePhase::GameOver {
            final_score,
            is_new_best,
        } => {
            ui::draw_game_over(sink, canvas, final_score, is_new_best);
        }
    }

    events
}

fn play_frame(
    game: &mut Game,
    input: &TickInput,
    now_ms: u64,
    sink: &mut dyn RenderSink,
    events: &mut Vec<GameEvent>,
) {
    let canvas = game.canvas();
    game.player.move_by(input.axis, canvas);
    shapes::player(sink, &mut game.player);

    if game.update_score() {
        log::debug!("New best: {}s", game.player.score);
    }
    let difficulty = game.difficulty();
    ui::draw_hud(
        sink,
        canvas,
        game.player.score,
        game.player.best(difficulty),
        difficulty,
    );

    for pickup in game.pickups.iter_mut() {
        shapes::pickup(sink, pickup, now_ms);
    }
    game.collect_pickups(events);
    game.check_ball_hits(events);
}
