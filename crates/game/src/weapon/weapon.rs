use glam::Vec3;
use rand::Rng;

use super::{Bullet, SHOTGUN_PELLETS, WeaponKind, WeaponTuning};

const MUZZLE_FLASH_DURATION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponState {
    Ready,
    Cooldown,
    Empty,
}

/// Where a trigger pull originates: shooter position and heading.
#[derive(Debug, Clone, Copy)]
pub struct Muzzle {
    pub position: Vec3,
    pub direction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    kind: WeaponKind,
    magazine: u32,
    reserve: u32,
    last_shot_time: Option<f64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let tuning = kind.tuning();
        Self {
            kind,
            magazine: tuning.magazine_capacity,
            reserve: tuning.starting_reserve,
            last_shot_time: None,
        }
    }

    pub fn with_ammo(kind: WeaponKind, magazine: u32, reserve: u32) -> Self {
        Self {
            kind,
            magazine: magazine.min(kind.tuning().magazine_capacity),
            reserve,
            last_shot_time: None,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn tuning(&self) -> WeaponTuning {
        self.kind.tuning()
    }

    pub fn magazine(&self) -> u32 {
        self.magazine
    }

    pub fn reserve(&self) -> u32 {
        self.reserve
    }

    pub fn capacity(&self) -> u32 {
        self.tuning().magazine_capacity
    }

    pub fn state(&self, now: f64) -> WeaponState {
        if self.magazine == 0 {
            return WeaponState::Empty;
        }
        match self.last_shot_time {
            Some(last) if now < last + self.tuning().fire_interval => WeaponState::Cooldown,
            _ => WeaponState::Ready,
        }
    }

    pub fn can_fire(&self, now: f64) -> bool {
        self.state(now) == WeaponState::Ready
    }

    /// One trigger pull. Consumes a single round even when the shotgun
    /// produces several pellets; yields nothing unless the weapon is ready.
    pub fn attempt_fire<R: Rng>(
        &mut self,
        now: f64,
        muzzle: Muzzle,
        owner_id: &str,
        rng: &mut R,
    ) -> Vec<Bullet> {
        if !self.can_fire(now) {
            return Vec::new();
        }

        self.last_shot_time = Some(now);
        self.magazine -= 1;

        let tuning = self.tuning();
        let pellets = match self.kind {
            WeaponKind::Shotgun => SHOTGUN_PELLETS,
            WeaponKind::Pistol | WeaponKind::Rifle => 1,
        };

        (0..pellets)
            .map(|_| {
                let offset = if tuning.spread > 0.0 {
                    rng.gen_range(-tuning.spread..=tuning.spread)
                } else {
                    0.0
                };
                Bullet::new(
                    muzzle.position,
                    muzzle.direction + offset,
                    tuning.bullet_speed,
                    tuning.damage,
                    self.kind,
                    owner_id,
                )
            })
            .collect()
    }

    pub fn reload(&mut self) {
        if self.reserve == 0 {
            return;
        }
        let needed = self.capacity().saturating_sub(self.magazine);
        let moved = needed.min(self.reserve);
        self.magazine += moved;
        self.reserve -= moved;
    }

    pub fn add_ammo(&mut self, amount: u32) {
        self.reserve = self.reserve.saturating_add(amount);
    }

    pub fn ammo_fraction(&self) -> f32 {
        let capacity = self.capacity();
        if capacity == 0 {
            return 0.0;
        }
        self.magazine as f32 / capacity as f32
    }

    pub fn refill(&mut self) {
        *self = Self::new(self.kind);
    }

    pub fn is_muzzle_flash_active(&self, now: f64) -> bool {
        self.last_shot_time
            .is_some_and(|last| now >= last && now - last < MUZZLE_FLASH_DURATION)
    }
}
