//! Velocity integration, player input handling and arena clamping

use glam::Vec2;

use super::geom::Rect;
use super::state::{Body, Player};
use super::tick::TickInput;
use crate::angle_of;

/// Stop distance for [`seek`]; prevents jitter at the destination
pub const ARRIVAL_EPSILON: f32 = 5.0;

/// position += velocity * dt
pub fn integrate(body: &mut Body, dt: f32) {
    body.pos += body.vel * dt;
}

/// Derive velocity from movement flags (diagonals normalized to unit length),
/// face the pointer, then integrate.
pub fn apply_player_input(player: &mut Player, input: &TickInput, dt: f32) {
    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }

    if dir != Vec2::ZERO {
        dir = dir.normalize();
    }

    player.body.vel = dir * player.speed;
    player.body.facing = angle_of(input.pointer - player.body.pos);
    integrate(&mut player.body, dt);
}

/// Clamp the body so position ± radius stays inside `bounds`. Idempotent.
pub fn constrain_to_bounds(body: &mut Body, bounds: Rect) {
    body.pos.x = body
        .pos
        .x
        .clamp(bounds.x + body.radius, bounds.x + bounds.width - body.radius);
    body.pos.y = body
        .pos
        .y
        .clamp(bounds.y + body.radius, bounds.y + bounds.height - body.radius);
}

/// Move toward `target` at constant `speed`, snapping to rest within
/// [`ARRIVAL_EPSILON`] of it.
pub fn seek(body: &mut Body, target: Vec2, speed: f32, dt: f32) {
    let to_target = target - body.pos;
    if to_target.length() < ARRIVAL_EPSILON {
        body.vel = Vec2::ZERO;
        return;
    }

    body.vel = to_target.normalize() * speed;
    integrate(body, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(pos: Vec2, vel: Vec2) -> Body {
        Body {
            pos,
            vel,
            facing: 0.0,
            radius: 10.0,
        }
    }

    #[test]
    fn integrate_moves_by_velocity_times_dt() {
        let mut b = body(Vec2::new(100.0, 100.0), Vec2::new(60.0, -30.0));
        integrate(&mut b, 0.5);
        assert_eq!(b.pos, Vec2::new(130.0, 85.0));
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        let input = TickInput {
            up: true,
            right: true,
            pointer: Vec2::new(200.0, 100.0),
            ..Default::default()
        };
        apply_player_input(&mut player, &input, 0.0);
        let speed = player.body.vel.length();
        assert!((speed - player.speed).abs() < 1e-3);
    }

    #[test]
    fn facing_tracks_the_pointer() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        let input = TickInput {
            pointer: Vec2::new(100.0, 200.0),
            ..Default::default()
        };
        apply_player_input(&mut player, &input, 0.016);
        assert!((player.body.facing - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn seek_snaps_to_rest_at_the_target() {
        let target = Vec2::new(100.0, 100.0);
        let mut b = body(Vec2::new(98.0, 100.0), Vec2::new(50.0, 0.0));
        seek(&mut b, target, 50.0, 0.016);
        assert_eq!(b.vel, Vec2::ZERO);
        assert_eq!(b.pos, Vec2::new(98.0, 100.0));
    }

    #[test]
    fn seek_moves_at_constant_speed_toward_the_target() {
        let mut b = body(Vec2::ZERO, Vec2::ZERO);
        seek(&mut b, Vec2::new(100.0, 0.0), 50.0, 0.1);
        assert!((b.pos.x - 5.0).abs() < 1e-4);
        assert_eq!(b.pos.y, 0.0);
    }

    proptest! {
        /// Integration is reversible: integrating with -vel undoes it
        #[test]
        fn integration_is_reversible(
            px in -1000.0f32..1000.0,
            py in -1000.0f32..1000.0,
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
            dt in 0.0f32..0.1,
        ) {
            let start = Vec2::new(px, py);
            let mut b = body(start, Vec2::new(vx, vy));
            integrate(&mut b, dt);
            b.vel = -b.vel;
            integrate(&mut b, dt);
            prop_assert!(b.pos.distance(start) < 1e-2);
        }

        /// Clamping twice equals clamping once
        #[test]
        fn constrain_to_bounds_is_idempotent(
            px in -2000.0f32..4000.0,
            py in -2000.0f32..4000.0,
        ) {
            let bounds = Rect::new(0.0, 0.0, 1280.0, 720.0);
            let mut b = body(Vec2::new(px, py), Vec2::ZERO);
            constrain_to_bounds(&mut b, bounds);
            let once = b.pos;
            constrain_to_bounds(&mut b, bounds);
            prop_assert_eq!(b.pos, once);
            prop_assert!(once.x >= bounds.x + b.radius && once.x <= bounds.width - b.radius);
            prop_assert!(once.y >= bounds.y + b.radius && once.y <= bounds.height - b.radius);
        }
    }
}
