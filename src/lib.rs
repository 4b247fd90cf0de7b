//! Rooftop Rescue - deterministic core of a top-down stealth-action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, vision, AI, collisions, levels)
//! - `progress`: Scalar progress facts handed to an external persistence layer
//!
//! Rendering, input capture, audio and UI screens are external collaborators:
//! they read the state snapshot exposed by `sim` and feed a [`sim::TickInput`]
//! back in once per frame. Nothing in this crate touches a wall clock, a
//! screen, or a disk.

pub mod progress;
pub mod sim;

pub use progress::Progress;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single frame delta (seconds). A stalled frame
    /// (tab backgrounding, debugger) must not produce a runaway integration.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Minimum milliseconds between player shots
    pub const PLAYER_FIRE_RATE_MS: f64 = 300.0;

    /// Bullet defaults
    pub const PLAYER_BULLET_SPEED: f32 = 600.0;
    pub const PLAYER_BULLET_DAMAGE: i32 = 999;
    pub const KIDNAPPER_BULLET_SPEED: f32 = 400.0;
    pub const KIDNAPPER_BULLET_DAMAGE: i32 = 5;
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_LIFESPAN_MS: f64 = 3000.0;

    /// Kidnapper defaults
    pub const KIDNAPPER_RADIUS: f32 = 20.0;
    pub const KIDNAPPER_VIEW_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    pub const PATROL_SPEED: f32 = 50.0;
    pub const ALERT_SPEED: f32 = 100.0;
    /// Waypoint arrival radius while patrolling
    pub const PATROL_ARRIVAL: f32 = 30.0;
    /// Arrival radius at a last-known target position
    pub const ALERT_ARRIVAL: f32 = 50.0;
    /// Alertness drain per second once the search spot is reached
    pub const ALERTNESS_DECAY: f32 = 20.0;

    /// Scoring
    pub const KILL_SCORE: u64 = 100;
    /// Kills closer together than this extend the streak
    pub const STREAK_WINDOW_MS: f64 = 5000.0;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle`
#[inline]
pub fn vec_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector (atan2)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn normalize_angle_wraps_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn vec_from_angle_round_trips_through_angle_of() {
        for i in 0..8 {
            let a = -PI + 0.1 + i as f32 * 0.7;
            let a = normalize_angle(a);
            let v = vec_from_angle(a);
            assert!((angle_of(v) - a).abs() < 1e-5);
        }
    }
}
