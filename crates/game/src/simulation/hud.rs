use crate::player::{MAX_ARMOR, MAX_HEALTH, Player};
use crate::weapon::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Playing,
    Paused,
    GameOver,
}

impl RoundPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::GameOver => "Game over",
        }
    }
}

/// Formats whole seconds as `MM:SS`.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub health: u32,
    pub max_health: u32,
    pub armor: u32,
    pub max_armor: u32,
    pub weapon: WeaponKind,
    pub magazine: u32,
    pub capacity: u32,
    pub reserve: u32,
    /// Health, armor and magazine as fractions of their maximum, for gauges.
    pub health_ratio: f32,
    pub armor_ratio: f32,
    pub ammo_ratio: f32,
    pub elapsed: f64,
    pub connection_status: String,
    pub muzzle_flash: bool,
    pub phase: RoundPhase,
    pub remote_players: usize,
}

impl Hud {
    pub fn capture(
        player: &Player,
        now: f64,
        elapsed: f64,
        connection_status: String,
        phase: RoundPhase,
        remote_players: usize,
    ) -> Self {
        let weapon = player.weapon();
        Self {
            health: player.health(),
            max_health: MAX_HEALTH,
            armor: player.armor(),
            max_armor: MAX_ARMOR,
            weapon: weapon.kind(),
            magazine: weapon.magazine(),
            capacity: weapon.capacity(),
            reserve: weapon.reserve(),
            health_ratio: player.health_fraction(),
            armor_ratio: player.armor_fraction(),
            ammo_ratio: player.ammo_fraction(),
            elapsed,
            connection_status,
            muzzle_flash: weapon.is_muzzle_flash_active(now),
            phase,
            remote_players,
        }
    }

    pub fn elapsed_label(&self) -> String {
        format_time(self.elapsed)
    }

    pub fn ammo_label(&self) -> String {
        format!("{}/{} ({})", self.magazine, self.capacity, self.reserve)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn time_is_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(61.0), "01:01");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(-4.0), "00:00");
    }

    #[test]
    fn capture_reads_current_weapon() {
        let mut player = Player::new("p1", Vec2::new(3.0, 3.0));
        player.switch_weapon(WeaponKind::Rifle);
        player.add_armor(15);

        let hud = Hud::capture(&player, 10.0, 75.0, "Offline".to_string(), RoundPhase::Playing, 0);
        assert_eq!(hud.weapon, WeaponKind::Rifle);
        assert_eq!(hud.magazine, 30);
        assert_eq!(hud.reserve, 90);
        assert_eq!(hud.armor, 15);
        assert_eq!(hud.elapsed_label(), "01:15");
        assert_eq!(hud.ammo_label(), "30/30 (90)");
        assert_eq!(hud.armor_ratio, 0.15);
        assert_eq!(hud.ammo_ratio, 1.0);

        player.take_damage(60);
        let hud = Hud::capture(&player, 10.0, 75.0, "Offline".to_string(), RoundPhase::Playing, 0);
        assert_eq!(hud.health, 55);
        assert_eq!(hud.health_ratio, 0.55);
        assert!(!hud.muzzle_flash);
    }
}
