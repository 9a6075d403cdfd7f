use glam::Vec3;

use crate::map::WallMap;
use crate::player::Player;

use super::{Bullet, WeaponKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub attacker_id: String,
    pub target_id: String,
    pub damage: u32,
    pub weapon: WeaponKind,
    pub position: Vec3,
}

/// Owns every live bullet. Bullets leave the set on expiry, wall impact or
/// player impact.
#[derive(Debug, Default)]
pub struct BallisticsSystem {
    bullets: Vec<Bullet>,
}

impl BallisticsSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, bullets: impl IntoIterator<Item = Bullet>) {
        self.bullets.extend(bullets);
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    /// Advances every bullet and drops the expired ones and the ones now
    /// touching a wall. Returns how many were removed.
    pub fn update(&mut self, dt: f32, map: &WallMap) -> usize {
        let before = self.bullets.len();
        self.bullets.retain_mut(|bullet| {
            bullet.update(dt);
            !bullet.is_expired() && !bullet.hits_wall(map)
        });
        before - self.bullets.len()
    }

    /// Tests each bullet against every player except its owner. Only the
    /// first player in iteration order is credited and the bullet is
    /// consumed.
    pub fn detect_hits(&mut self, players: &[&Player]) -> Vec<Hit> {
        let mut hits = Vec::new();

        self.bullets.retain(|bullet| {
            let target = players.iter().find(|player| {
                player.player_id != bullet.owner_id
                    && bullet.hits(player.position_3d(), player.radius)
            });

            match target {
                Some(player) => {
                    hits.push(Hit {
                        attacker_id: bullet.owner_id.clone(),
                        target_id: player.player_id.clone(),
                        damage: bullet.damage,
                        weapon: bullet.weapon,
                        position: bullet.position,
                    });
                    false
                }
                None => true,
            }
        });

        hits
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::map::Wall;

    fn open_map() -> WallMap {
        WallMap::new(vec![Wall::new(-100.0, -100.0, -99.0, -100.0)]).unwrap()
    }

    fn bullet_at(x: f32, y: f32, owner: &str) -> Bullet {
        Bullet::new(Vec3::new(x, y, 0.0), 0.0, 10.0, 25, WeaponKind::Pistol, owner)
    }

    #[test]
    fn bullets_expire_after_lifetime() {
        let mut system = BallisticsSystem::new();
        system.spawn([bullet_at(0.0, 0.0, "p1")]);

        let map = open_map();
        for _ in 0..179 {
            system.update(1.0 / 60.0, &map);
        }
        assert_eq!(system.len(), 1);

        system.update(2.0 / 60.0, &map);
        assert!(system.is_empty());
    }

    #[test]
    fn bullets_stop_at_walls() {
        let mut system = BallisticsSystem::new();
        system.spawn([bullet_at(7.0, 5.0, "p1")]);
        let map = WallMap::new(vec![Wall::new(8.0, 4.0, 8.0, 6.0)]).unwrap();

        system.update(0.05, &map);
        assert_eq!(system.len(), 1);

        system.update(0.05, &map);
        assert!(system.is_empty());
    }

    #[test]
    fn owner_is_never_hit() {
        let owner = Player::new("p1", Vec2::new(3.0, 3.0));
        let mut system = BallisticsSystem::new();
        system.spawn([bullet_at(3.0, 3.0, "p1"), bullet_at(3.2, 3.0, "p1")]);

        assert!(system.detect_hits(&[&owner]).is_empty());
        assert_eq!(system.len(), 2);
    }

    #[test]
    fn first_matching_player_is_credited_once() {
        let first = Player::new("p2", Vec2::new(3.0, 3.0));
        let second = Player::new("p3", Vec2::new(3.1, 3.0));
        let mut system = BallisticsSystem::new();
        system.spawn([bullet_at(3.05, 3.0, "p1")]);

        let hits = system.detect_hits(&[&first, &second]);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, "p2");
        assert_eq!(hits[0].attacker_id, "p1");
        assert_eq!(hits[0].damage, 25);
        assert!(system.is_empty());
    }
}
