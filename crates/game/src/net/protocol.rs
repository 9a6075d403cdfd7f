use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::player::{MAX_ARMOR, MAX_HEALTH, Player};
use crate::weapon::{AmmoCount, Arsenal, WeaponKind};

pub const DEFAULT_PORT: u16 = 27015;
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Full replicated state of one player, the `data` of `player_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    #[serde(deserialize_with = "health_stat")]
    pub health: u32,
    #[serde(deserialize_with = "armor_stat")]
    pub armor: u32,
    pub current_weapon: WeaponKind,
    pub ammo: BTreeMap<WeaponKind, AmmoCount>,
}

/// Peers may send any JSON number for a stat; it is rounded and clamped into
/// `[0, max]` instead of failing the whole update.
fn clamped_stat<'de, D>(deserializer: D, max: u32) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_nan() {
        return Ok(0);
    }
    Ok(value.round().clamp(0.0, f64::from(max)) as u32)
}

fn health_stat<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    clamped_stat(deserializer, MAX_HEALTH)
}

fn armor_stat<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    clamped_stat(deserializer, MAX_ARMOR)
}

impl From<&Player> for PlayerState {
    fn from(player: &Player) -> Self {
        Self {
            id: player.player_id.clone(),
            x: player.position.x,
            y: player.position.y,
            z: player.z,
            rotation: player.rotation(),
            health: player.health(),
            armor: player.armor(),
            current_weapon: player.arsenal.current_kind(),
            ammo: player.arsenal.ammo_map(),
        }
    }
}

impl PlayerState {
    /// Builds a fresh mirror from replicated state. Out-of-range values are
    /// clamped rather than rejected.
    pub fn to_player(&self, player_id: &str) -> Player {
        let mut player = Player::new(player_id, Vec2::new(self.x, self.y));
        player.z = self.z.max(0.0);
        player.on_ground = player.z <= 0.0;
        player.set_rotation(self.rotation);
        player.set_health(self.health);
        player.set_armor(self.armor);
        player.arsenal = Arsenal::from_ammo_map(self.current_weapon, &self.ammo);
        player
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub direction: f32,
    pub weapon: WeaponKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitData {
    pub attacker_id: String,
    pub target_id: String,
    pub damage: u32,
}

/// Wire envelope `{type, player_id?, data?}`. The six `type` names and the
/// field names are the compatibility surface between peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    PlayerUpdate {
        player_id: String,
        data: PlayerState,
    },
    PlayerJoin {
        player_id: String,
    },
    PlayerLeave {
        player_id: String,
    },
    ShotFired {
        player_id: String,
        data: ShotData,
    },
    PlayerHit {
        player_id: String,
        data: HitData,
    },
    GameState {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player_id: Option<String>,
        #[serde(default)]
        data: serde_json::Value,
    },
}

impl Message {
    pub fn player_update(player: &Player) -> Self {
        Self::PlayerUpdate {
            player_id: player.player_id.clone(),
            data: PlayerState::from(player),
        }
    }

    pub fn shot_fired(player: &Player, direction: f32) -> Self {
        Self::ShotFired {
            player_id: player.player_id.clone(),
            data: ShotData {
                x: player.position.x,
                y: player.position.y,
                z: player.z,
                direction,
                weapon: player.arsenal.current_kind(),
            },
        }
    }

    pub fn player_hit(attacker_id: &str, target_id: &str, damage: u32) -> Self {
        Self::PlayerHit {
            player_id: attacker_id.to_string(),
            data: HitData {
                attacker_id: attacker_id.to_string(),
                target_id: target_id.to_string(),
                damage,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerUpdate { .. } => "player_update",
            Self::PlayerJoin { .. } => "player_join",
            Self::PlayerLeave { .. } => "player_leave",
            Self::ShotFired { .. } => "shot_fired",
            Self::PlayerHit { .. } => "player_hit",
            Self::GameState { .. } => "game_state",
        }
    }

    pub fn player_id(&self) -> Option<&str> {
        match self {
            Self::PlayerUpdate { player_id, .. }
            | Self::PlayerJoin { player_id }
            | Self::PlayerLeave { player_id }
            | Self::ShotFired { player_id, .. }
            | Self::PlayerHit { player_id, .. } => Some(player_id),
            Self::GameState { player_id, .. } => player_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_uses_snake_case_type_tags() {
        let message = Message::PlayerJoin {
            player_id: "p2".to_string(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"type": "player_join", "player_id": "p2"}));
        assert_eq!(message.kind(), "player_join");
    }

    #[test]
    fn player_state_round_trips_through_a_fresh_mirror() {
        let mut player = Player::new("p2", Vec2::new(4.25, 7.5));
        player.z = 0.75;
        player.set_rotation(1.25);
        player.take_damage(30);
        player.add_armor(40);
        player.switch_weapon(WeaponKind::Shotgun);
        player.arsenal.get_mut(WeaponKind::Shotgun).add_ammo(3);

        let json = serde_json::to_string(&Message::player_update(&player)).unwrap();
        let Message::PlayerUpdate { player_id, data } = serde_json::from_str(&json).unwrap() else {
            panic!("expected player_update");
        };
        let mirror = data.to_player(&player_id);

        assert_eq!(PlayerState::from(&mirror), PlayerState::from(&player));
        assert_eq!(mirror.position, player.position);
        assert_eq!(mirror.z, player.z);
        assert_eq!(mirror.rotation(), player.rotation());
        assert_eq!(mirror.health(), player.health());
        assert_eq!(mirror.armor(), player.armor());
        assert_eq!(mirror.arsenal.ammo_map(), player.arsenal.ammo_map());
    }

    #[test]
    fn hit_and_shot_payloads_live_under_data() {
        let value = serde_json::to_value(Message::player_hit("p1", "p2", 25)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "player_hit",
                "player_id": "p1",
                "data": {"attacker_id": "p1", "target_id": "p2", "damage": 25}
            })
        );

        let shooter = Player::new("p1", Vec2::new(1.0, 2.0));
        let value = serde_json::to_value(Message::shot_fired(&shooter, 0.5)).unwrap();
        assert_eq!(value["data"]["weapon"], "pistol");
        assert_eq!(value["data"]["direction"], 0.5);
    }

    #[test]
    fn game_state_accepts_missing_fields() {
        let message: Message = serde_json::from_str(r#"{"type": "game_state"}"#).unwrap();
        assert_eq!(
            message,
            Message::GameState {
                player_id: None,
                data: serde_json::Value::Null
            }
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<Message>(r#"{"type": "teleport", "player_id": "p1"}"#).is_err());
    }

    #[test]
    fn out_of_range_state_is_clamped() {
        let state = PlayerState {
            id: "p9".to_string(),
            x: 1.0,
            y: 1.0,
            z: -3.0,
            rotation: -1.0,
            health: 900,
            armor: 200,
            current_weapon: WeaponKind::Rifle,
            ammo: BTreeMap::new(),
        };
        let player = state.to_player("p9");
        assert_eq!(player.health(), 100);
        assert_eq!(player.armor(), 100);
        assert_eq!(player.z, 0.0);
        assert!(player.rotation() >= 0.0);
    }

    #[test]
    fn negative_and_fractional_stats_are_clamped_on_decode() {
        let json = r#"{
            "type": "player_update",
            "player_id": "p2",
            "data": {
                "id": "p2", "x": 4.0, "y": 5.0, "z": 0.0, "rotation": 0.0,
                "health": -5, "armor": 250.0,
                "current_weapon": "rifle", "ammo": {}
            }
        }"#;
        let Message::PlayerUpdate { data, .. } = serde_json::from_str(json).unwrap() else {
            panic!("expected player_update");
        };
        assert_eq!(data.health, 0);
        assert_eq!(data.armor, 100);

        let json = json.replace("-5", "84.6").replace("250.0", "12");
        let Message::PlayerUpdate { data, .. } = serde_json::from_str(&json).unwrap() else {
            panic!("expected player_update");
        };
        let mirror = data.to_player("p2");
        assert_eq!(mirror.health(), 85);
        assert_eq!(mirror.armor(), 12);
    }

    #[test]
    fn non_numeric_stat_is_still_rejected() {
        let json = r#"{"type": "player_update", "player_id": "p2", "data": {
            "id": "p2", "x": 0.0, "y": 0.0, "z": 0.0, "rotation": 0.0,
            "health": "full", "armor": 0, "current_weapon": "pistol", "ammo": {}}}"#;
        assert!(serde_json::from_str::<Message>(json).is_err());
    }
}
