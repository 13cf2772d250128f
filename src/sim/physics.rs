//! Ball physics: integration, wall response and elastic ball-ball collisions
//!
//! Velocities are in units per tick; one call to [`step_balls`] is one tick.

use glam::Vec2;

use super::state::Ball;

/// Advance a ball by one tick of its velocity
#[inline]
pub fn integrate(ball: &mut Ball) {
    ball.pos += ball.vel;
}

/// Keep a ball inside `[0, bounds.x] x [0, bounds.y]`.
///
/// On each axis where the ball's edge crosses a wall, the position is clamped
/// so the edge sits on the wall and the velocity component is forced to
/// point away from it. Forcing the sign (rather than negating) keeps a ball
/// that is still overlapping next tick from flipping back into the wall.
/// Returns true if any wall was touched.
pub fn resolve_wall_collision(ball: &mut Ball, bounds: Vec2) -> bool {
    let mut hit = false;
    let r = ball.radius;

    if ball.pos.x + r > bounds.x {
        ball.pos.x = bounds.x - r;
        ball.vel.x = -ball.vel.x.abs();
        hit = true;
    }
    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.vel.x = ball.vel.x.abs();
        hit = true;
    }
    if ball.pos.y + r > bounds.y {
        ball.pos.y = bounds.y - r;
        ball.vel.y = -ball.vel.y.abs();
        hit = true;
    }
    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
        hit = true;
    }

    hit
}

/// Resolve an overlapping pair of balls with a perfectly elastic impulse.
///
/// Both velocities are rotated into the frame whose x axis is the line of
/// centers, the normal components exchange momentum (a plain swap for equal
/// masses), and the result is rotated back. The pair is then pushed apart
/// symmetrically along the normal until the edges just touch.
///
/// Returns false (no-op) when the balls do not overlap or share a center.
pub fn resolve_ball_pair_collision(a: &mut Ball, b: &mut Ball) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;

    if distance >= min_distance {
        return false;
    }
    if distance <= f32::EPSILON {
        log::trace!("Coincident ball centers at {:?}, skipping collision", a.pos);
        return false;
    }

    let theta = delta.y.atan2(delta.x);
    let rot = Vec2::from_angle(theta);
    let unrot = Vec2::new(rot.x, -rot.y);

    // x = along the collision normal, y = tangential
    let va = unrot.rotate(a.vel);
    let vb = unrot.rotate(b.vel);

    let total = a.mass + b.mass;
    let va_n = ((a.mass - b.mass) * va.x + 2.0 * b.mass * vb.x) / total;
    let vb_n = ((b.mass - a.mass) * vb.x + 2.0 * a.mass * va.x) / total;

    a.vel = rot.rotate(Vec2::new(va_n, va.y));
    b.vel = rot.rotate(Vec2::new(vb_n, vb.y));

    let push = rot * ((min_distance - distance) / 2.0);
    a.pos -= push;
    b.pos += push;

    true
}

/// Run one physics tick over every ball: integrate and clamp to the walls,
/// then resolve each unordered overlapping pair once.
/// Returns the number of pair collisions resolved.
pub fn step_balls(balls: &mut [Ball], bounds: Vec2) -> usize {
    for ball in balls.iter_mut() {
        integrate(ball);
        resolve_wall_collision(ball, bounds);
    }

    let mut collisions = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_ball_pair_collision(a, b) {
                collisions += 1;
            }
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;
    use proptest::prelude::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn ball(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(dx, dy), 20.0, colors::WHITE)
    }

    #[test]
    fn test_integrate_adds_velocity() {
        let mut b = ball(100.0, 100.0, 3.0, -4.0);
        integrate(&mut b);
        assert_eq!(b.pos, Vec2::new(103.0, 96.0));
    }

    #[test]
    fn test_right_wall_clamps_and_forces_sign() {
        let mut b = ball(790.0, 300.0, 7.5, 0.0);
        assert!(resolve_wall_collision(&mut b, BOUNDS));
        assert_eq!(b.pos.x, 780.0);
        assert_eq!(b.vel.x, -7.5);
    }

    #[test]
    fn test_wall_does_not_reflect_ball_already_leaving() {
        // Overlapping the left wall but already moving right: sign stays positive
        let mut b = ball(5.0, 300.0, 4.0, 1.0);
        resolve_wall_collision(&mut b, BOUNDS);
        assert_eq!(b.pos.x, 20.0);
        assert_eq!(b.vel.x, 4.0);
        assert_eq!(b.vel.y, 1.0);
    }

    #[test]
    fn test_corner_hits_both_axes() {
        let mut b = ball(-3.0, 610.0, -2.0, 2.0);
        resolve_wall_collision(&mut b, BOUNDS);
        assert_eq!(b.pos, Vec2::new(20.0, 580.0));
        assert_eq!(b.vel, Vec2::new(2.0, -2.0));
    }

    #[test]
    fn test_head_on_equal_mass_swaps_velocities() {
        let mut a = ball(100.0, 100.0, 5.0, 0.0);
        let mut b = ball(135.0, 100.0, -3.0, 0.0);
        assert!(resolve_ball_pair_collision(&mut a, &mut b));
        assert!((a.vel.x - -3.0).abs() < 1e-5);
        assert!((b.vel.x - 5.0).abs() < 1e-5);
        assert!((b.pos.x - a.pos.x - 40.0).abs() < 1e-4);
        // Symmetric correction around the old midpoint
        assert!(((a.pos.x + b.pos.x) / 2.0 - 117.5).abs() < 1e-4);
    }

    #[test]
    fn test_tangential_component_is_kept() {
        // Normal along x; y motion is tangential and must survive
        let mut a = ball(100.0, 100.0, 2.0, 3.0);
        let mut b = ball(130.0, 100.0, 0.0, -1.0);
        resolve_ball_pair_collision(&mut a, &mut b);
        assert!((a.vel - Vec2::new(0.0, 3.0)).length() < 1e-5);
        assert!((b.vel - Vec2::new(2.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_non_overlapping_pair_is_untouched() {
        let mut a = ball(100.0, 100.0, 1.0, 0.0);
        let mut b = ball(141.0, 100.0, -1.0, 0.0);
        let (a0, b0) = (a.clone(), b.clone());
        assert!(!resolve_ball_pair_collision(&mut a, &mut b));
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_coincident_centers_are_a_no_op() {
        let mut a = ball(100.0, 100.0, 1.0, 0.0);
        let mut b = ball(100.0, 100.0, -1.0, 0.0);
        assert!(!resolve_ball_pair_collision(&mut a, &mut b));
        assert!(a.pos.is_finite() && a.vel.is_finite());
        assert_eq!(b.vel, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_step_resolves_each_pair_once() {
        // Two balls about to overlap head-on
        let mut balls = vec![ball(100.0, 100.0, 5.0, 0.0), ball(140.0, 100.0, -5.0, 0.0)];
        let hits = step_balls(&mut balls, BOUNDS);
        assert_eq!(hits, 1);
        // A double resolution would swap the velocities back
        assert!(balls[0].vel.x < 0.0);
        assert!(balls[1].vel.x > 0.0);
    }

    fn arb_ball() -> impl Strategy<Value = Ball> {
        (
            -50.0f32..850.0,
            -50.0f32..650.0,
            -15.0f32..15.0,
            -15.0f32..15.0,
            5.0f32..40.0,
        )
            .prop_map(|(x, y, dx, dy, r)| {
                Ball::new(Vec2::new(x, y), Vec2::new(dx, dy), r, colors::RED)
            })
    }

    proptest! {
        #[test]
        fn prop_wall_keeps_ball_inside(mut b in arb_ball()) {
            let before = b.vel;
            let crossed_right = b.pos.x + b.radius > BOUNDS.x;
            let crossed_left = b.pos.x - b.radius < 0.0;
            let crossed_bottom = b.pos.y + b.radius > BOUNDS.y;
            let crossed_top = b.pos.y - b.radius < 0.0;

            resolve_wall_collision(&mut b, BOUNDS);
            prop_assert!(b.pos.x - b.radius >= -1e-3 && b.pos.x + b.radius <= BOUNDS.x + 1e-3);
            prop_assert!(b.pos.y - b.radius >= -1e-3 && b.pos.y + b.radius <= BOUNDS.y + 1e-3);
            // Every crossed wall leaves the velocity pointing away from it
            if crossed_right { prop_assert!(b.vel.x <= 0.0); }
            if crossed_left { prop_assert!(b.vel.x >= 0.0); }
            if crossed_bottom { prop_assert!(b.vel.y <= 0.0); }
            if crossed_top { prop_assert!(b.vel.y >= 0.0); }
            // Speed is never gained
            prop_assert!((b.vel.length() - before.length()).abs() < 1e-4);
        }

        #[test]
        fn prop_pair_conserves_energy_and_separates(
            ax in 200.0f32..600.0, ay in 200.0f32..400.0,
            angle in 0.0f32..std::f32::consts::TAU,
            gap in 0.5f32..39.0,
            va in (-12.0f32..12.0, -12.0f32..12.0),
            vb in (-12.0f32..12.0, -12.0f32..12.0),
        ) {
            let mut a = ball(ax, ay, va.0, va.1);
            let offset = Vec2::from_angle(angle) * gap;
            let mut b = ball(ax + offset.x, ay + offset.y, vb.0, vb.1);

            let energy_before = a.kinetic_energy() + b.kinetic_energy();
            let momentum_before = a.vel + b.vel;
            prop_assert!(resolve_ball_pair_collision(&mut a, &mut b));
            let energy_after = a.kinetic_energy() + b.kinetic_energy();

            prop_assert!((energy_before - energy_after).abs() <= 1e-3 * energy_before.max(1.0));
            prop_assert!((momentum_before - (a.vel + b.vel)).length() < 1e-3);
            prop_assert!(a.pos.distance(b.pos) >= a.radius + b.radius - 1e-3);
        }
    }
}
