use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use glam::Vec2;
use linkfire::net::NetworkStats;
use linkfire::{
    Action, Buttons, GameSession, InputState, Message, Player, Role, RoundPhase, SessionConfig,
    SessionEvent, Settings, TickInput, Transport, TransportEvent, WallMap, WeaponKind,
};

/// In-memory transport: records what the session sends and replays injected events.
#[derive(Clone, Default)]
struct Loopback {
    sent: Arc<Mutex<Vec<Message>>>,
    inbox: Arc<Mutex<Vec<TransportEvent>>>,
    shut_down: Arc<Mutex<bool>>,
}

impl Loopback {
    fn deliver(&self, message: Message) {
        self.inbox
            .lock()
            .unwrap()
            .push(TransportEvent::Message { peer: 1, message });
    }

    fn push(&self, event: TransportEvent) {
        self.inbox.lock().unwrap().push(event);
    }

    fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    fn sent_of(&self, kind: &str) -> Vec<Message> {
        self.sent().into_iter().filter(|m| m.kind() == kind).collect()
    }

    fn clear_sent(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Transport for Loopback {
    fn role(&self) -> Role {
        Role::Host
    }

    fn send(&mut self, message: &Message) {
        self.sent.lock().unwrap().push(message.clone());
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut *self.inbox.lock().unwrap())
    }

    fn is_connected(&self) -> bool {
        !*self.shut_down.lock().unwrap()
    }

    fn status(&self) -> String {
        "Loopback".to_string()
    }

    fn stats(&self) -> NetworkStats {
        NetworkStats::default()
    }

    fn shutdown(&mut self) {
        *self.shut_down.lock().unwrap() = true;
    }
}

fn session() -> (GameSession, Loopback) {
    let link = Loopback::default();
    let config = SessionConfig::default().with_player_id("p1");
    let session = GameSession::new(config, WallMap::default(), Box::new(link.clone())).with_seed(42);
    (session, link)
}

fn fire() -> TickInput {
    TickInput {
        actions: vec![Action::Fire],
        ..TickInput::default()
    }
}

#[test]
fn start_announces_and_every_tick_broadcasts_state() {
    let (mut session, link) = session();
    assert_eq!(link.sent_of("player_join").len(), 1);
    assert_eq!(session.local_player().position, Vec2::new(3.0, 3.0));

    for _ in 0..3 {
        session.tick(&TickInput::idle());
    }
    let updates = link.sent_of("player_update");
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].player_id(), Some("p1"));
    assert_eq!(session.tick_count(), 3);
}

#[test]
fn firing_spawns_bullets_and_announces_the_shot() {
    let (mut session, link) = session();

    session.tick(&fire());
    assert_eq!(session.ballistics().len(), 1);
    assert_eq!(link.sent_of("shot_fired").len(), 1);
    assert_eq!(session.local_player().weapon().magazine(), 11);

    // still cooling down
    session.tick(&fire());
    assert_eq!(link.sent_of("shot_fired").len(), 1);

    session.tick(&TickInput {
        actions: vec![Action::SwitchWeapon(WeaponKind::Shotgun), Action::Fire],
        ..TickInput::default()
    });
    assert_eq!(session.local_player().arsenal.current_kind(), WeaponKind::Shotgun);
    let fired: Vec<_> = session
        .drain_events()
        .filter_map(|e| match e {
            SessionEvent::ShotFired { weapon, pellets } => Some((weapon, pellets)),
            _ => None,
        })
        .collect();
    assert_eq!(fired, vec![(WeaponKind::Pistol, 1), (WeaponKind::Shotgun, 8)]);
}

#[test]
fn local_bullet_hits_mirror_and_reports_it() {
    let (mut session, link) = session();
    let target = Player::new("p2", Vec2::new(5.0, 3.0));
    link.deliver(Message::player_update(&target));

    session.tick(&TickInput::idle());
    assert!(session.mirrors().contains("p2"));
    link.clear_sent();

    session.tick(&fire());
    for _ in 0..10 {
        session.tick(&TickInput::idle());
    }

    let hits = link.sent_of("player_hit");
    assert_eq!(hits, vec![Message::player_hit("p1", "p2", 25)]);
    assert_eq!(session.mirrors().get("p2").unwrap().health(), 75);
    assert!(session.ballistics().is_empty());
    assert_eq!(session.local_player().health(), 100);
}

#[test]
fn lethal_hit_from_peer_ends_the_round() {
    let (mut session, link) = session();
    link.deliver(Message::player_hit("p2", "p1", 150));

    session.tick(&TickInput::idle());
    assert_eq!(session.local_player().health(), 0);
    assert_eq!(session.phase(), RoundPhase::GameOver);
    assert!(session
        .drain_events()
        .any(|e| matches!(e, SessionEvent::GameOver { .. })));

    link.clear_sent();
    session.tick(&TickInput::idle());
    assert!(link.sent_of("player_update").is_empty());

    session.start_round();
    assert_eq!(session.phase(), RoundPhase::Playing);
    assert_eq!(session.local_player().health(), 100);
    assert_eq!(session.local_player().position, Vec2::new(17.0, 17.0));
}

#[test]
fn game_state_and_peer_loss_surface_as_events() {
    let (mut session, link) = session();
    let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
    link.push(TransportEvent::PeerConnected { peer: 1, addr });
    link.deliver(Message::PlayerJoin {
        player_id: "p3".to_string(),
    });
    link.deliver(Message::GameState {
        player_id: None,
        data: serde_json::json!({"mode": "ffa"}),
    });

    session.tick(&TickInput::idle());
    assert_eq!(session.game_state(), Some(&serde_json::json!({"mode": "ffa"})));
    // the newcomer is greeted
    assert_eq!(link.sent_of("player_join").len(), 2);

    link.push(TransportEvent::PeerDisconnected { peer: 1 });
    session.tick(&TickInput::idle());
    assert!(session.mirrors().is_empty());

    let events: Vec<_> = session.drain_events().collect();
    assert!(events.contains(&SessionEvent::PeerConnected { peer: 1, addr }));
    assert!(events.contains(&SessionEvent::PlayerJoined("p3".to_string())));
    assert!(events.contains(&SessionEvent::PlayerLeft("p3".to_string())));
}

#[test]
fn frame_carries_rays_and_hud() {
    let (mut session, _link) = session();
    session.tick(&fire());

    let frame = session.frame();
    assert_eq!(frame.distances.len(), 200);
    assert!(frame.distances.iter().all(|d| *d > 0.0 && *d <= 20.0));
    assert_eq!(frame.hud.weapon, WeaponKind::Pistol);
    assert_eq!(frame.hud.magazine, 11);
    assert_eq!(frame.hud.connection_status, "Loopback");
    assert!(frame.hud.muzzle_flash);
    assert_eq!(frame.hud.elapsed_label(), "00:00");
}

#[test]
fn advance_runs_fixed_ticks_from_buffered_input() {
    let (mut session, link) = session();
    let mut input = InputState::default();
    input.push_action(Action::Reload);

    let ticks = session.advance(1.0 / 30.0 + 1e-4, &mut input);
    assert_eq!(ticks, 2);
    assert_eq!(link.sent_of("player_update").len(), 2);
    assert_eq!(session.advance(0.001, &mut input), 0);
}

#[test]
fn settings_adjust_view_and_look() {
    let (mut session, _link) = session();
    let settings = Settings {
        fov: 90.0,
        mouse_sensitivity: 0.5,
        ..Settings::default()
    };
    session.apply_settings(&settings);

    assert_eq!(session.config().raycast.fov_degrees, 90.0);
    assert!((session.config().player.look_sensitivity - 0.01).abs() < 1e-6);
}

#[test]
fn shutdown_says_goodbye_once() {
    let (mut session, link) = session();
    session.shutdown();
    session.shutdown();

    assert_eq!(link.sent_of("player_leave").len(), 1);
    assert!(!link.is_connected());
    drop(session);
    assert_eq!(link.sent_of("player_leave").len(), 1);
}

#[test]
fn overlapping_mirrors_credit_the_lowest_id() {
    let (mut session, link) = session();
    for id in ["p3", "p2", "p4"] {
        link.deliver(Message::player_update(&Player::new(id, Vec2::new(5.0, 3.0))));
    }
    session.tick(&TickInput::idle());
    assert_eq!(session.mirrors().len(), 3);

    session.tick(&fire());
    for _ in 0..10 {
        session.tick(&TickInput::idle());
    }

    assert_eq!(link.sent_of("player_hit"), vec![Message::player_hit("p1", "p2", 25)]);
    assert_eq!(session.mirrors().get("p3").unwrap().health(), 100);
}

#[test]
fn pause_freezes_the_local_player_but_not_the_network() {
    let (mut session, link) = session();
    assert!(session.pause());
    assert!(!session.pause());
    assert_eq!(session.phase(), RoundPhase::Paused);
    link.clear_sent();

    link.deliver(Message::player_update(&Player::new("p2", Vec2::new(8.0, 8.0))));
    for _ in 0..30 {
        session.tick(&TickInput {
            actions: vec![Action::Fire],
            ..TickInput::with_buttons(Buttons::FORWARD)
        });
    }

    assert!(session.mirrors().contains("p2"));
    assert!(link.sent().is_empty());
    assert!(session.ballistics().is_empty());
    assert_eq!(session.local_player().position, Vec2::new(3.0, 3.0));
    assert_eq!(session.elapsed(), 0.0);
    assert_eq!(session.hud().phase.label(), "Paused");

    assert!(session.toggle_pause());
    assert_eq!(session.phase(), RoundPhase::Playing);
    session.tick(&fire());
    assert_eq!(link.sent_of("shot_fired").len(), 1);

    let events: Vec<_> = session.drain_events().collect();
    assert!(events.contains(&SessionEvent::Paused));
    assert!(events.contains(&SessionEvent::Resumed));
}

#[test]
fn lethal_hit_while_paused_still_ends_the_round() {
    let (mut session, link) = session();
    session.pause();
    link.deliver(Message::player_hit("p2", "p1", 120));

    session.tick(&TickInput::idle());
    assert_eq!(session.phase(), RoundPhase::GameOver);
    assert!(!session.toggle_pause());
}
