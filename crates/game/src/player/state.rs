use glam::{Vec2, Vec3};

use crate::geometry::normalize_angle;
use crate::weapon::{Arsenal, Weapon, WeaponKind};

pub const MAX_HEALTH: u32 = 100;
pub const MAX_ARMOR: u32 = 100;
pub const PLAYER_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    pub absorbed: u32,
    pub health_lost: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: String,
    pub position: Vec2,
    pub z: f32,
    rotation: f32,
    pub velocity_z: f32,
    pub on_ground: bool,
    health: u32,
    armor: u32,
    pub arsenal: Arsenal,
    pub radius: f32,
}

impl Player {
    pub fn new(player_id: impl Into<String>, spawn: Vec2) -> Self {
        Self {
            player_id: player_id.into(),
            position: spawn,
            z: 0.0,
            rotation: 0.0,
            velocity_z: 0.0,
            on_ground: true,
            health: MAX_HEALTH,
            armor: 0,
            arsenal: Arsenal::new(),
            radius: PLAYER_RADIUS,
        }
    }

    /// Back to spawn defaults: pose, vertical state, health, armor and a
    /// refilled arsenal. Heading is kept.
    pub fn reset(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.z = 0.0;
        self.velocity_z = 0.0;
        self.on_ground = true;
        self.health = MAX_HEALTH;
        self.armor = 0;
        self.arsenal.refill();
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = normalize_angle(rotation);
    }

    pub fn position_3d(&self) -> Vec3 {
        self.position.extend(self.z)
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn armor(&self) -> u32 {
        self.armor
    }

    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(MAX_HEALTH);
    }

    pub fn set_armor(&mut self, armor: u32) {
        self.armor = armor.min(MAX_ARMOR);
    }

    /// Armor soaks up to half of the incoming damage, the rest drains
    /// health down to zero.
    pub fn take_damage(&mut self, damage: u32) -> DamageOutcome {
        let absorbed = (damage / 2).min(self.armor);
        self.armor -= absorbed;
        let remaining = damage - absorbed;

        let before = self.health;
        self.health = self.health.saturating_sub(remaining);

        DamageOutcome {
            absorbed,
            health_lost: before - self.health,
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
    }

    pub fn add_armor(&mut self, amount: u32) {
        self.armor = self.armor.saturating_add(amount).min(MAX_ARMOR);
    }

    pub fn add_ammo(&mut self, kind: WeaponKind, amount: u32) {
        self.arsenal.get_mut(kind).add_ammo(amount);
    }

    pub fn switch_weapon(&mut self, kind: WeaponKind) {
        self.arsenal.switch_to(kind);
    }

    pub fn weapon(&self) -> &Weapon {
        self.arsenal.current()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / MAX_HEALTH as f32
    }

    pub fn armor_fraction(&self) -> f32 {
        self.armor as f32 / MAX_ARMOR as f32
    }

    pub fn ammo_fraction(&self) -> f32 {
        self.weapon().ammo_fraction()
    }
}
