//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in arena coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Push one triangle
#[inline]
fn tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Push a quad given its four corners in winding order
#[inline]
fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    tri(out, a, b, c, color);
    tri(out, a, c, d, color);
}

/// Point on a circle
#[inline]
fn on_circle(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::from_angle(theta) * radius
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = i as f32 / segments as f32 * TAU;
        let theta2 = (i + 1) as f32 / segments as f32 * TAU;
        tri(
            out,
            center,
            on_circle(center, radius, theta1),
            on_circle(center, radius, theta2),
            color,
        );
    }
}

/// Hollow circle between two radii
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = i as f32 / segments as f32 * TAU;
        let theta2 = (i + 1) as f32 / segments as f32 * TAU;
        quad(
            out,
            on_circle(center, inner_radius, theta1),
            on_circle(center, outer_radius, theta1),
            on_circle(center, outer_radius, theta2),
            on_circle(center, inner_radius, theta2),
            color,
        );
    }
}

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    let max = min + size;
    quad(
        out,
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    );
}

/// Horizontal gauge: background plus a fill proportional to `ratio`
pub fn bar(
    out: &mut Vec<Vertex>,
    min: Vec2,
    size: Vec2,
    ratio: f32,
    fill: [f32; 4],
    back: [f32; 4],
) {
    rect(out, min, size, back);
    let width = size.x * ratio.clamp(0.0, 1.0);
    if width > 0.0 {
        rect(out, min, Vec2::new(width, size.y), fill);
    }
}

/// Thick line segment tapering from `width_from` to `width_to`
pub fn streak(
    out: &mut Vec<Vertex>,
    from: Vec2,
    to: Vec2,
    width_from: f32,
    width_to: f32,
    color: [f32; 4],
) {
    let Some(dir) = (to - from).try_normalize() else {
        return;
    };
    let perp = dir.perp();
    quad(
        out,
        from + perp * width_from,
        to + perp * width_to,
        to - perp * width_to,
        from - perp * width_from,
        color,
    );
}
