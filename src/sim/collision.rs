//! Player interaction rules
//!
//! The player is a rectangle body with a circular head above it. Balls kill
//! on contact unless the player is invincible (no contact at all) or carries
//! a bounce shield (ball is deflected away). Pickups use a coarser
//! circle-vs-circle proximity test.

use glam::Vec2;

use super::pickup::Pickup;
use super::state::{Ball, Player};

/// Outcome of testing one ball against the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No contact, or contact ignored (dead/invincible player)
    Miss,
    /// Contact absorbed by the bounce shield; the ball was redirected
    Deflected,
    /// Contact that kills the player
    Lethal,
}

/// Axis-aligned overlap of the ball's bounding square with the body rectangle
pub fn body_overlaps(player: &Player, ball: &Ball) -> bool {
    player.pos.x < ball.pos.x + ball.radius
        && player.pos.x + player.width > ball.pos.x - ball.radius
        && player.pos.y < ball.pos.y + ball.radius
        && player.pos.y + player.height > ball.pos.y - ball.radius
}

/// Circle-circle overlap of the ball with the player's head
pub fn head_overlaps(player: &Player, ball: &Ball) -> bool {
    player.head_center().distance(ball.pos) < player.head_radius + ball.radius
}

/// Whether a ball touches the player at all, ignoring effects
pub fn touches_player(player: &Player, ball: &Ball) -> bool {
    body_overlaps(player, ball) || head_overlaps(player, ball)
}

/// Redirect a ball straight away from the player's center.
///
/// The new speed is the old speed times `boost`, and the ball is moved to
/// `max(r + w/2, r + h/2)` from the center along the new heading so it
/// cannot re-trigger on the next tick.
pub fn deflect_ball(player: &Player, ball: &mut Ball, boost: f32) {
    let center = player.center();
    let offset = ball.pos - center;
    let angle = offset.y.atan2(offset.x);
    let dir = Vec2::from_angle(angle);

    let speed = ball.vel.length() * boost;
    ball.vel = dir * speed;

    let min_distance = (ball.radius + player.width / 2.0).max(ball.radius + player.height / 2.0);
    ball.pos = center + dir * min_distance;
}

/// Test a ball against the player and apply the shield if needed
pub fn resolve_player_ball(player: &Player, ball: &mut Ball, deflect_boost: f32) -> Contact {
    if !player.alive || player.is_invincible() {
        return Contact::Miss;
    }
    if !touches_player(player, ball) {
        return Contact::Miss;
    }
    if player.has_bounce_shield() {
        deflect_ball(player, ball, deflect_boost);
        return Contact::Deflected;
    }
    Contact::Lethal
}

/// Coarse pickup proximity: pickup circle against a circle of diameter
/// `max(width, height)` around the player's center
pub fn pickup_touches_player(pickup: &Pickup, player: &Player) -> bool {
    let reach = pickup.radius + player.width.max(player.height) / 2.0;
    pickup.pos.distance(player.center()) < reach
}
