use linkfire::SessionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One-line description of a session event for the log.
pub fn describe(event: &SessionEvent) -> (LogLevel, String) {
    match event {
        SessionEvent::RoundStarted { round, spawn } => (
            LogLevel::Info,
            format!("Round {round} started at ({:.0}, {:.0})", spawn.x, spawn.y),
        ),
        SessionEvent::PeerConnected { peer, addr } => {
            (LogLevel::Info, format!("Peer {peer} connected from {addr}"))
        }
        SessionEvent::PeerDisconnected { peer } => {
            (LogLevel::Warn, format!("Peer {peer} disconnected"))
        }
        SessionEvent::PlayerJoined(id) => (LogLevel::Info, format!("{id} joined")),
        SessionEvent::PlayerLeft(id) => (LogLevel::Info, format!("{id} left")),
        SessionEvent::ShotFired { weapon, pellets } => {
            let label = if *pellets == 1 { "round" } else { "pellets" };
            (LogLevel::Info, format!("Fired {weapon} ({pellets} {label})"))
        }
        SessionEvent::ShotObserved { player_id, weapon } => {
            (LogLevel::Info, format!("{player_id} fired a {weapon}"))
        }
        SessionEvent::Hit {
            attacker_id,
            target_id,
            damage,
        } => (
            LogLevel::Info,
            format!("{attacker_id} hit {target_id} for {damage}"),
        ),
        SessionEvent::LocalPlayerHit {
            attacker_id,
            outcome,
        } => (
            LogLevel::Warn,
            format!(
                "Hit by {attacker_id}: -{} health, -{} armor",
                outcome.health_lost, outcome.absorbed
            ),
        ),
        SessionEvent::IdClash { peer } => (
            LogLevel::Warn,
            format!("Peer {peer} uses our player id; restart one side with --player-id"),
        ),
        SessionEvent::GameState(data) => (LogLevel::Info, format!("Game state: {data}")),
        SessionEvent::Paused => (LogLevel::Info, "Paused. Press 'p' to resume".to_string()),
        SessionEvent::Resumed => (LogLevel::Info, "Resumed".to_string()),
        SessionEvent::GameOver { survived } => (
            LogLevel::Error,
            format!(
                "Eliminated after {}. Press 'n' for a new round",
                linkfire::simulation::format_time(*survived)
            ),
        ),
    }
}
