use glam::Vec2;

use crate::geometry::{point_segment_distance, segment_circle_intersects};

/// Immutable line segment in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub start: Vec2,
    pub end: Vec2,
}

impl Wall {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            start: Vec2::new(x1, y1),
            end: Vec2::new(x2, y2),
        }
    }

    pub fn as_tuple(&self) -> (f32, f32, f32, f32) {
        (self.start.x, self.start.y, self.end.x, self.end.y)
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        point_segment_distance(point, self.start, self.end)
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        segment_circle_intersects(self.start, self.end, center, radius)
    }
}

impl From<(f32, f32, f32, f32)> for Wall {
    fn from((x1, y1, x2, y2): (f32, f32, f32, f32)) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}
