mod arsenal;
mod ballistics;
mod bullet;
mod kind;
mod weapon;

pub use arsenal::{AmmoCount, Arsenal};
pub use ballistics::{BallisticsSystem, Hit};
pub use bullet::{BULLET_LIFETIME, BULLET_RADIUS, Bullet};
pub use kind::{SHOTGUN_PELLETS, WeaponKind, WeaponTuning};
pub use weapon::{Muzzle, Weapon, WeaponState};
