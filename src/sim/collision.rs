//! Collision and bounds tests
//!
//! Everything in the duel is a circle, so hit detection reduces to a
//! center-distance check against the sum of radii.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_MARGIN, ARENA_WIDTH};

/// True if two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// True if a point has left the arena by more than the margin
#[inline]
pub fn outside_arena(pos: Vec2) -> bool {
    pos.x < -ARENA_MARGIN
        || pos.x > ARENA_WIDTH + ARENA_MARGIN
        || pos.y < -ARENA_MARGIN
        || pos.y > ARENA_HEIGHT + ARENA_MARGIN
}

/// True if any point of `points` lies within `range` of `center`
pub fn any_within<'a>(center: Vec2, range: f32, mut points: impl Iterator<Item = &'a Vec2>) -> bool {
    points.any(|p| p.distance(center) < range)
}
