//! Line-of-sight checks for kidnapper view cones
//!
//! A target is seen iff it is in range, inside the view cone, and no obstacle
//! edge crosses the sight line. Checks run cheapest-first: distance, then
//! angle, then the raycast.

use glam::Vec2;

use super::geom::segment_hits_rect;
use super::state::{Kidnapper, Obstacle};
use crate::{angle_of, normalize_angle};

/// Can `observer` see a point target? No side effects.
pub fn can_see(observer: &Kidnapper, target: Vec2, obstacles: &[Obstacle]) -> bool {
    let distance = observer.body.pos.distance(target);
    if distance > observer.view_distance {
        return false;
    }

    if !in_view_cone(observer.body.pos, observer.body.facing, target, observer.view_angle) {
        return false;
    }

    !sight_blocked(observer.body.pos, target, obstacles)
}

/// Is `target` within the cone `facing ± view_angle / 2` as seen from `origin`?
pub fn in_view_cone(origin: Vec2, facing: f32, target: Vec2, view_angle: f32) -> bool {
    let to_target = target - origin;
    let diff = normalize_angle(angle_of(to_target) - facing);
    diff.abs() <= view_angle / 2.0
}

/// Does any obstacle occlude the straight segment from `from` to `to`?
pub fn sight_blocked(from: Vec2, to: Vec2, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| segment_hits_rect(from, to, &o.rect()))
}
