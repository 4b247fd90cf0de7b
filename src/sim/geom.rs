//! Geometry primitives for collision and occlusion
//!
//! Circle/rectangle intersection tests, penetration push-out, and the
//! segment intersection used by vision raycasts. Everything here is a pure
//! function over positions and sizes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Axis-aligned overlap test against another rectangle
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.max().x < other.min().x
            || other.max().x < self.min().x
            || self.max().y < other.min().y
            || other.max().y < self.min().y)
    }
}

/// Do two circles overlap?
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Closest point on a rectangle to a point (the point itself if inside)
pub fn closest_point_on_rect(p: Vec2, rect: &Rect) -> Vec2 {
    Vec2::new(
        p.x.clamp(rect.x, rect.x + rect.width),
        p.y.clamp(rect.y, rect.y + rect.height),
    )
}

/// Does a circle overlap an axis-aligned rectangle?
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = closest_point_on_rect(center, rect);
    center.distance_squared(closest) < radius * radius
}

/// Push a circle out of a rectangle by the minimum penetration vector.
///
/// Returns the corrected center. If the center sits exactly on the closest
/// point (on or inside the rectangle) the push direction is degenerate; the
/// fallback pushes along +x far enough to clear the right edge instead of
/// producing NaN.
pub fn resolve_circle_rect(center: Vec2, radius: f32, rect: &Rect) -> Vec2 {
    if !circle_rect_overlap(center, radius, rect) {
        return center;
    }

    let closest = closest_point_on_rect(center, rect);
    let push = center - closest;
    let dist = push.length();

    if dist == 0.0 {
        return Vec2::new(rect.x + rect.width + radius, center.y);
    }

    let overlap = radius - dist;
    center + push / dist * overlap
}

/// Do the segments a1->a2 and b1->b2 intersect (endpoints inclusive)?
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        // Parallel or collinear; treated as no crossing
        return false;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Does the segment from->to cross any of the four edges of the rectangle?
pub fn segment_hits_rect(from: Vec2, to: Vec2, rect: &Rect) -> bool {
    let tl = rect.min();
    let br = rect.max();
    let tr = Vec2::new(br.x, tl.y);
    let bl = Vec2::new(tl.x, br.y);

    segments_intersect(from, to, tl, tr)
        || segments_intersect(from, to, tr, br)
        || segments_intersect(from, to, bl, br)
        || segments_intersect(from, to, tl, bl)
}
