use glam::Vec2;

use crate::geometry::direction;
use crate::map::Wall;

/// Distance marched per step along a ray.
pub const MARCH_STEP: f32 = 0.1;
/// A marched point closer than this to a wall counts as a hit.
pub const HIT_EPSILON: f32 = 0.1;

const HEIGHT_BIAS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastConfig {
    pub fov_degrees: f32,
    pub ray_count: usize,
    pub max_distance: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            ray_count: 200,
            max_distance: 20.0,
        }
    }
}

/// Perspective approximation: `screen_height * 0.5 / (distance + 0.1)`,
/// capped at the full screen.
pub fn wall_height(distance: f32, screen_height: f32) -> f32 {
    if distance <= 0.0 {
        return screen_height;
    }
    (screen_height * 0.5 / (distance + HEIGHT_BIAS)).min(screen_height)
}

/// Linear falloff, 255 at the eye down to 0 at 25.5 units.
pub fn brightness(distance: f32) -> u8 {
    (255.0 - distance * 10.0).clamp(0.0, 255.0) as u8
}

/// Brute-force marcher: every step is tested against every wall, with no
/// spatial acceleration.
#[derive(Debug, Clone)]
pub struct Raycaster {
    config: RaycastConfig,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new(RaycastConfig::default())
    }
}

impl Raycaster {
    pub fn new(config: RaycastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.config.fov_degrees = fov_degrees;
    }

    /// Ray angles evenly spaced over `[rotation - fov/2, rotation + fov/2]`
    /// with both ends included, a step of `fov / (n - 1)`. Half-open
    /// `start + i * fov / n` spacing would leave the right edge uncovered and
    /// put no ray on the heading for odd counts. A single ray points straight
    /// ahead.
    pub fn ray_angles(&self, rotation: f32) -> Vec<f32> {
        let count = self.config.ray_count;
        if count == 0 {
            return Vec::new();
        }
        if count == 1 {
            return vec![rotation];
        }

        let fov = self.config.fov_degrees.to_radians();
        let start = rotation - fov / 2.0;
        let step = fov / (count - 1) as f32;
        (0..count).map(|i| start + i as f32 * step).collect()
    }

    /// One distance per ray, ordered left to right.
    pub fn cast(&self, origin: Vec2, rotation: f32, walls: &[Wall]) -> Vec<f32> {
        self.ray_angles(rotation)
            .into_iter()
            .map(|angle| self.cast_ray(origin, angle, walls))
            .collect()
    }

    pub fn cast_ray(&self, origin: Vec2, angle: f32, walls: &[Wall]) -> f32 {
        let max_distance = self.config.max_distance;
        let dir = direction(angle);
        let steps = (max_distance / MARCH_STEP).ceil() as usize;

        for step in 1..=steps {
            let distance = (step as f32 * MARCH_STEP).min(max_distance);
            let point = origin + dir * distance;
            if walls.iter().any(|w| w.distance_to(point) < HIT_EPSILON) {
                return distance;
            }
        }

        max_distance
    }
}
