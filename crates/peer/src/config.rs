use std::path::PathBuf;
use std::time::Duration;

use linkfire::{DEFAULT_TICK_RATE, SessionConfig, Settings, generated_player_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerMode {
    Offline,
    Host { bind: String },
    Join { addr: String },
}

impl PeerMode {
    /// Host and offline peers take the first spawn, joiners the second.
    pub fn spawn_slot(&self) -> usize {
        match self {
            PeerMode::Offline | PeerMode::Host { .. } => 0,
            PeerMode::Join { .. } => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub mode: PeerMode,
    pub player_id: String,
    pub tick_rate: u32,
    pub settings_path: PathBuf,
    pub headless: bool,
    pub duration: Option<Duration>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            mode: PeerMode::Offline,
            player_id: generated_player_id(),
            tick_rate: DEFAULT_TICK_RATE,
            settings_path: PathBuf::from("settings.json"),
            headless: false,
            duration: None,
        }
    }
}

impl PeerConfig {
    pub fn session_config(&self, settings: &Settings) -> SessionConfig {
        let mut config = SessionConfig::default()
            .with_player_id(self.player_id.clone())
            .with_spawn_slot(self.mode.spawn_slot())
            .with_settings(settings);
        config.tick_rate = self.tick_rate;
        config
    }
}

pub fn host_addr(bind: &str, port: u16) -> String {
    format!("{bind}:{port}")
}

/// Accepts `host` or `host:port`, filling in the default port.
pub fn join_addr(addr: &str, port: u16) -> String {
    if addr.contains(':') {
        addr.to_string()
    } else {
        format!("{addr}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_address_gets_default_port() {
        assert_eq!(join_addr("10.0.0.2", 27015), "10.0.0.2:27015");
        assert_eq!(join_addr("10.0.0.2:4000", 27015), "10.0.0.2:4000");
        assert_eq!(host_addr("0.0.0.0", 27015), "0.0.0.0:27015");
    }

    #[test]
    fn session_config_follows_mode_and_settings() {
        let peer = PeerConfig {
            mode: PeerMode::Join {
                addr: "127.0.0.1:27015".to_string(),
            },
            player_id: "p2".to_string(),
            tick_rate: 30,
            ..PeerConfig::default()
        };
        let settings = Settings {
            fov: 75.0,
            ..Settings::default()
        };

        let config = peer.session_config(&settings);
        assert_eq!(config.player_id, "p2");
        assert_eq!(config.spawn_slot, 1);
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.raycast.fov_degrees, 75.0);
    }

    #[test]
    fn default_player_ids_differ_between_peers() {
        let host = PeerConfig::default();
        let joiner = PeerConfig::default();
        assert!(host.player_id.starts_with("player-"));
        assert_ne!(host.player_id, joiner.player_id);
    }
}
