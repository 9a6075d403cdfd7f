use std::fmt;

use serde::{Deserialize, Serialize};

pub const SHOTGUN_PELLETS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Pistol,
    Rifle,
    Shotgun,
}

/// Static per-kind tuning. Damage is per bullet, so per pellet for the
/// shotgun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponTuning {
    pub damage: u32,
    pub bullet_speed: f32,
    pub fire_interval: f64,
    pub spread: f32,
    pub magazine_capacity: u32,
    pub starting_reserve: u32,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [Self::Pistol, Self::Rifle, Self::Shotgun];

    pub fn tuning(self) -> WeaponTuning {
        match self {
            Self::Pistol => WeaponTuning {
                damage: 25,
                bullet_speed: 40.0,
                fire_interval: 0.5,
                spread: 0.05,
                magazine_capacity: 12,
                starting_reserve: 48,
            },
            Self::Rifle => WeaponTuning {
                damage: 35,
                bullet_speed: 60.0,
                fire_interval: 0.1,
                spread: 0.02,
                magazine_capacity: 30,
                starting_reserve: 90,
            },
            Self::Shotgun => WeaponTuning {
                damage: 15,
                bullet_speed: 35.0,
                fire_interval: 1.0,
                spread: 0.3,
                magazine_capacity: 8,
                starting_reserve: 24,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pistol => "pistol",
            Self::Rifle => "rifle",
            Self::Shotgun => "shotgun",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Pistol => 0,
            Self::Rifle => 1,
            Self::Shotgun => 2,
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_wire_format() {
        for kind in WeaponKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn unknown_weapon_name_is_rejected_on_the_wire() {
        assert!(serde_json::from_str::<WeaponKind>("\"railgun\"").is_err());
    }
}
