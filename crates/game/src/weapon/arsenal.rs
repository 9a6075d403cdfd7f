use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Weapon, WeaponKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoCount {
    pub magazine: u32,
    pub reserve: u32,
}

/// One weapon per kind plus the currently selected one.
#[derive(Debug, Clone, PartialEq)]
pub struct Arsenal {
    weapons: [Weapon; 3],
    current: WeaponKind,
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::new()
    }
}

impl Arsenal {
    pub fn new() -> Self {
        Self {
            weapons: WeaponKind::ALL.map(Weapon::new),
            current: WeaponKind::Pistol,
        }
    }

    pub fn current_kind(&self) -> WeaponKind {
        self.current
    }

    pub fn current(&self) -> &Weapon {
        self.get(self.current)
    }

    pub fn current_mut(&mut self) -> &mut Weapon {
        self.get_mut(self.current)
    }

    pub fn get(&self, kind: WeaponKind) -> &Weapon {
        &self.weapons[kind.index()]
    }

    pub fn get_mut(&mut self, kind: WeaponKind) -> &mut Weapon {
        &mut self.weapons[kind.index()]
    }

    pub fn switch_to(&mut self, kind: WeaponKind) {
        self.current = kind;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter()
    }

    pub fn refill(&mut self) {
        for weapon in &mut self.weapons {
            weapon.refill();
        }
    }

    pub fn ammo_map(&self) -> BTreeMap<WeaponKind, AmmoCount> {
        self.weapons
            .iter()
            .map(|w| {
                (
                    w.kind(),
                    AmmoCount {
                        magazine: w.magazine(),
                        reserve: w.reserve(),
                    },
                )
            })
            .collect()
    }

    /// Rebuilds an arsenal from replicated counters. Kinds missing from the
    /// map come back empty, magazines are clamped to capacity.
    pub fn from_ammo_map(current: WeaponKind, ammo: &BTreeMap<WeaponKind, AmmoCount>) -> Self {
        let weapons = WeaponKind::ALL.map(|kind| match ammo.get(&kind) {
            Some(count) => Weapon::with_ammo(kind, count.magazine, count.reserve),
            None => Weapon::with_ammo(kind, 0, 0),
        });
        Self { weapons, current }
    }
}
