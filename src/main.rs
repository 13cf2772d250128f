//! Ball Dodge entry point
//!
//! The browser build is driven by the page's frame loop through
//! `platform::web::WebGame`. Natively this runs a headless session with a
//! simple dodging autopilot, which is handy for balancing difficulty settings
//! and for checking high-score persistence.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use ball_dodge::error::Result;
    use ball_dodge::highscores::JsonFileStore;
    use ball_dodge::renderer::CommandBuffer;
    use ball_dodge::sim::{Difficulty, Game, GameEvent, GamePhase, TickInput, tick};
    use ball_dodge::{HighScoreStore, Tuning};

    /// Simulated frame length
    const FRAME_MS: u64 = 16;
    const SCORES_PATH: &str = "ball_dodge_scores.json";
    /// Balls farther than this are ignored by the autopilot
    const DANGER_RADIUS: f32 = 180.0;

    /// Usage: `ball-dodge [medium|hard|god] [seconds] [tuning.json]`
    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let difficulty: Difficulty = match args.next() {
            Some(name) => name.parse()?,
            None => Difficulty::default(),
        };
        let limit_secs: u64 = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let tuning = match args.next() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };

        let seed = ball_dodge::platform::now_ms();
        let store = JsonFileStore::open(SCORES_PATH);
        let mut game = Game::new(tuning, Box::new(store), seed, 0)?;
        game.set_difficulty(difficulty)?;
        game.start_game();
        log::info!(
            "Headless run: {} for up to {}s (seed {})",
            difficulty,
            limit_secs,
            seed
        );

        let mut sink = CommandBuffer::new();
        let mut now = 0;
        while now < limit_secs * 1000 {
            now += FRAME_MS;
            let input = TickInput {
                axis: autopilot(&game),
                click: None,
            };
            sink.clear();
            for event in tick(&mut game, &input, now, &mut sink) {
                match event {
                    GameEvent::PlayerDied { .. } => log::info!("Player died at {}ms", now),
                    other => log::debug!("{:?}", other),
                }
            }
            if !game.is_playing() {
                break;
            }
        }

        match game.phase {
            GamePhase::GameOver {
                final_score,
                is_new_best,
            } => {
                println!("Survived {final_score}s on {difficulty}");
                if is_new_best {
                    println!("New high score!");
                }
            }
            _ => println!("Still alive after {}s on {difficulty}", game.player.score),
        }
        println!("Best on {difficulty}: {}s", game.store().get_high_score(difficulty));
        Ok(())
    }

    /// Steer away from nearby balls, drifting back toward the middle
    fn autopilot(game: &Game) -> Vec2 {
        let me = game.player.center();
        let mut push = (game.canvas() / 2.0 - me) * 0.002;
        for ball in &game.balls {
            let away = me - ball.pos;
            let dist = away.length();
            if dist > f32::EPSILON && dist < DANGER_RADIUS {
                push += away / (dist * dist) * 50.0;
            }
        }
        let step = |v: f32| {
            if v > 0.1 {
                1.0
            } else if v < -0.1 {
                -1.0
            } else {
                0.0
            }
        };
        Vec2::new(step(push.x), step(push.y))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Dodge (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
