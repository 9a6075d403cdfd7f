use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn point_distance(p: Vec2, q: Vec2) -> f32 {
    (p - q).length()
}

/// Planar distance combined with the vertical delta.
pub fn distance_3d(p: Vec3, q: Vec3) -> f32 {
    let planar = point_distance(p.truncate(), q.truncate());
    (planar * planar + (p.z - q.z).powi(2)).sqrt()
}

/// Projects `p` onto segment `a`-`b`, clamping the parameter to `[0, 1]`.
/// A degenerate segment collapses to `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq == 0.0 {
        return a;
    }

    let t = clamp((p - a).dot(ab) / length_sq, 0.0, 1.0);
    a + ab * t
}

pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    point_distance(p, closest_point_on_segment(p, a, b))
}

pub fn segment_circle_intersects(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let closest = closest_point_on_segment(center, a, b);
    (center - closest).length_squared() <= radius * radius
}

/// Wraps an angle in radians into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

pub fn direction(angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin)
}
