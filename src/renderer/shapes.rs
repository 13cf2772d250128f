//! Primitive generation for game entities

use glam::Vec2;
use std::f32::consts::PI;

use super::{DrawCommand, Glow, RenderSink, colors};
use crate::sim::{Ball, Pickup, PickupKind, Player};

/// Radians the pickup decorations turn per drawn frame
const PICKUP_SPIN_PER_FRAME: f32 = 0.02;
/// Player glow pulse advance per drawn frame
const GLOW_PHASE_PER_FRAME: f32 = 0.1;
/// Speed pickup ring pulses with period 2π·200ms
const PULSE_MS_PER_RADIAN: f32 = 200.0;
/// A whole number of pulse periods (1000 · 2π · 200ms, rounded). Epoch-scale
/// timestamps are reduced by this before the f32 cast so they keep ms precision.
const PULSE_WRAP_MS: u64 = 1_256_637;

pub fn ball(sink: &mut dyn RenderSink, ball: &Ball) {
    sink.fill_circle(ball.pos, ball.radius, ball.color);
}

/// Body rectangle plus head circle. Invincible players glow cyan, shielded
/// players glow orange; the glow pulses with `player.glow_phase`.
pub fn player(sink: &mut dyn RenderSink, player: &mut Player) {
    if !player.alive {
        return;
    }

    let tint = if player.is_invincible() {
        Some(colors::CYAN)
    } else if player.has_bounce_shield() {
        Some(colors::ORANGE)
    } else {
        None
    };

    let glow = tint.map(|color| {
        player.glow_phase = (player.glow_phase + GLOW_PHASE_PER_FRAME) % (PI * 2.0);
        Glow {
            color,
            blur: 5.0 + player.glow_phase.sin() * 3.0,
        }
    });
    let color = tint.unwrap_or(colors::GOLD);

    sink.draw(DrawCommand::FillRect {
        pos: player.pos,
        size: Vec2::new(player.width, player.height),
        color,
        glow,
    });
    sink.draw(DrawCommand::FillCircle {
        center: player.head_center(),
        radius: player.head_radius,
        color,
        glow,
    });
}

/// Pickup orb plus its kind-specific decoration
pub fn pickup(sink: &mut dyn RenderSink, pickup: &mut Pickup, now_ms: u64) {
    if !pickup.active {
        return;
    }

    sink.fill_circle(pickup.pos, pickup.radius, pickup.kind.color());

    match pickup.kind {
        PickupKind::Speed => {
            let pulse = pickup.radius + 5.0 * pulse_phase(now_ms).sin();
            sink.draw(DrawCommand::StrokeCircle {
                center: pickup.pos,
                radius: pulse,
                line_width: 1.0,
                color: pickup.kind.color(),
            });
        }
        PickupKind::Invincibility => {
            pickup.spin += PICKUP_SPIN_PER_FRAME;
            sink.draw(DrawCommand::StrokePolygon {
                points: star_points(
                    pickup.pos,
                    5,
                    pickup.radius + 8.0,
                    pickup.radius + 3.0,
                    pickup.spin,
                ),
                line_width: 2.0,
                color: colors::WHITE,
            });
        }
        PickupKind::BounceShield => {
            pickup.spin += PICKUP_SPIN_PER_FRAME;
            sink.draw(DrawCommand::StrokePolygon {
                points: ring_points(pickup.pos, 8, pickup.radius + 8.0, pickup.spin),
                line_width: 2.0,
                color: colors::GOLD,
            });
        }
    }
}

/// Pulse angle for a wall-clock time in milliseconds
fn pulse_phase(now_ms: u64) -> f32 {
    (now_ms % PULSE_WRAP_MS) as f32 / PULSE_MS_PER_RADIAN
}

/// Star outline alternating outer/inner radius, `points` tips
fn star_points(center: Vec2, points: usize, outer: f32, inner: f32, rotation: f32) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = i as f32 * PI / points as f32 + rotation;
            center + Vec2::from_angle(angle) * r
        })
        .collect()
}

/// Regular polygon with `sides` vertices
fn ring_points(center: Vec2, sides: usize, radius: f32, rotation: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 * PI * 2.0 / sides as f32 + rotation;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::renderer::CommandBuffer;
    use crate::sim::scheduler::Scheduler;
    use crate::tuning::Tuning;

    #[test]
    fn test_star_alternates_radii() {
        let pts = star_points(Vec2::ZERO, 5, 23.0, 18.0, 0.0);
        assert_eq!(pts.len(), 10);
        assert!((pts[0].length() - 23.0).abs() < 1e-4);
        assert!((pts[1].length() - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_plain_player_is_gold_without_glow() {
        let mut p = Player::new(&Tuning::default(), HighScores::default());
        let mut sink = CommandBuffer::new();
        player(&mut sink, &mut p);
        assert_eq!(sink.len(), 2);
        match &sink.commands[0] {
            DrawCommand::FillRect { color, glow, .. } => {
                assert_eq!(*color, colors::GOLD);
                assert!(glow.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invincible_player_glows_cyan() {
        let mut p = Player::new(&Tuning::default(), HighScores::default());
        let mut s = Scheduler::new(0);
        p.activate_invincibility(&mut s);
        let mut sink = CommandBuffer::new();
        player(&mut sink, &mut p);
        match &sink.commands[0] {
            DrawCommand::FillRect { color, glow: Some(g), .. } => {
                assert_eq!(*color, colors::CYAN);
                assert!(g.blur >= 2.0 && g.blur <= 8.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn pulse_radius(sink: &CommandBuffer) -> f32 {
        match sink.commands.last() {
            Some(DrawCommand::StrokeCircle { radius, .. }) => *radius,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_speed_ring_pulses_at_epoch_timestamps() {
        let mut p = Pickup::new(PickupKind::Speed, 15.0);
        p.active = true;
        let start = 1_760_000_000_000u64;

        let mut radii = Vec::new();
        let mut sink = CommandBuffer::new();
        for frame in 0..120u64 {
            sink.clear();
            pickup(&mut sink, &mut p, start + frame * 16);
            radii.push(pulse_radius(&sink));
        }
        for r in &radii {
            assert!((10.0..=20.0).contains(r));
        }
        // Consecutive 16ms frames move the ring
        for pair in radii.windows(2) {
            assert!((pair[0] - pair[1]).abs() > 1e-4);
        }
    }

    #[test]
    fn test_pulse_phase_is_continuous_across_wrap() {
        let before = pulse_phase(PULSE_WRAP_MS - 1).sin();
        let after = pulse_phase(PULSE_WRAP_MS).sin();
        assert!((before - after).abs() < 0.01);
    }

    #[test]
    fn test_inactive_pickup_draws_nothing() {
        let mut p = Pickup::new(PickupKind::Speed, 15.0);
        let mut sink = CommandBuffer::new();
        pickup(&mut sink, &mut p, 0);
        assert!(sink.is_empty());
    }
}
