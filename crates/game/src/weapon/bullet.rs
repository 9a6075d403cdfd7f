use glam::{Vec2, Vec3};

use crate::geometry::{direction, distance_3d};
use crate::map::WallMap;

use super::WeaponKind;

pub const BULLET_LIFETIME: f32 = 3.0;
pub const BULLET_RADIUS: f32 = 0.1;

/// Transient projectile. Velocity is fixed at creation: no steering, no
/// gravity.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub position: Vec3,
    pub direction: f32,
    pub velocity: Vec2,
    pub damage: u32,
    pub weapon: WeaponKind,
    pub owner_id: String,
    pub age: f32,
    pub lifetime: f32,
    pub radius: f32,
}

impl Bullet {
    pub fn new(
        position: Vec3,
        direction_rad: f32,
        speed: f32,
        damage: u32,
        weapon: WeaponKind,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            position,
            direction: direction_rad,
            velocity: direction(direction_rad) * speed,
            damage,
            weapon,
            owner_id: owner_id.into(),
            age: 0.0,
            lifetime: BULLET_LIFETIME,
            radius: BULLET_RADIUS,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity.extend(0.0) * dt;
        self.age += dt;
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    pub fn hits_wall(&self, map: &WallMap) -> bool {
        map.collides(self.position.truncate(), self.radius)
    }

    pub fn hits(&self, target: Vec3, target_radius: f32) -> bool {
        distance_3d(self.position, target) <= target_radius + self.radius
    }
}
