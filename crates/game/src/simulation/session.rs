use std::collections::VecDeque;
use std::net::SocketAddr;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::hud::{Hud, RoundPhase};
use super::tick::FixedTimestep;
use crate::map::WallMap;
use crate::net::{
    DEFAULT_TICK_RATE, Message, MirrorTable, PeerId, SyncEvent, Transport, TransportEvent,
};
use crate::player::{Action, DamageOutcome, InputState, Player, PlayerConfig, PlayerController, TickInput};
use crate::render::{RaycastConfig, Raycaster};
use crate::settings::Settings;
use crate::weapon::{BallisticsSystem, Muzzle, WeaponKind};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub player_id: String,
    pub tick_rate: u32,
    /// Offset into the map's spawn points so peers do not share a spawn.
    pub spawn_slot: usize,
    pub player: PlayerConfig,
    pub raycast: RaycastConfig,
}

/// A fresh `player-xxxxxxxx` id, so peers started without an explicit id do
/// not collide.
pub fn generated_player_id() -> String {
    format!("player-{:08x}", rand::random::<u32>())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_id: generated_player_id(),
            tick_rate: DEFAULT_TICK_RATE,
            spawn_slot: 0,
            player: PlayerConfig::default(),
            raycast: RaycastConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_player_id(mut self, player_id: impl Into<String>) -> Self {
        self.player_id = player_id.into();
        self
    }

    pub fn with_spawn_slot(mut self, spawn_slot: usize) -> Self {
        self.spawn_slot = spawn_slot;
        self
    }

    /// Applies the parts of the user settings the simulation consumes.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.player.look_sensitivity = settings.look_sensitivity();
        self.raycast.fov_degrees = settings.fov;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RoundStarted {
        round: usize,
        spawn: Vec2,
    },
    PeerConnected {
        peer: PeerId,
        addr: SocketAddr,
    },
    PeerDisconnected {
        peer: PeerId,
    },
    PlayerJoined(String),
    PlayerLeft(String),
    ShotFired {
        weapon: WeaponKind,
        pellets: usize,
    },
    ShotObserved {
        player_id: String,
        weapon: WeaponKind,
    },
    Hit {
        attacker_id: String,
        target_id: String,
        damage: u32,
    },
    LocalPlayerHit {
        attacker_id: String,
        outcome: DamageOutcome,
    },
    /// A peer announced or updated a player with our own id.
    IdClash {
        peer: PeerId,
    },
    GameState(serde_json::Value),
    Paused,
    Resumed,
    GameOver {
        survived: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub distances: Vec<f32>,
    pub hud: Hud,
}

/// One peer's view of the match: the local player, every mirror, live
/// bullets and the link to the other peers.
///
/// All game state lives on the thread that calls `tick`; the transport only
/// hands over messages through `poll`.
pub struct GameSession {
    config: SessionConfig,
    map: WallMap,
    local: Player,
    controller: PlayerController,
    ballistics: BallisticsSystem,
    raycaster: Raycaster,
    mirrors: MirrorTable,
    transport: Box<dyn Transport>,
    timestep: FixedTimestep,
    rng: StdRng,
    tick: u64,
    time: f64,
    round: usize,
    round_start: f64,
    phase: RoundPhase,
    game_state: Option<serde_json::Value>,
    events: VecDeque<SessionEvent>,
    closed: bool,
}

impl GameSession {
    /// Starts the first round and announces the local player.
    pub fn new(config: SessionConfig, map: WallMap, transport: Box<dyn Transport>) -> Self {
        let local = Player::new(config.player_id.clone(), map.spawn_point(config.spawn_slot));
        let mut session = Self {
            controller: PlayerController::new(config.player.clone()),
            raycaster: Raycaster::new(config.raycast),
            mirrors: MirrorTable::new(config.player_id.clone()),
            timestep: FixedTimestep::new(config.tick_rate),
            config,
            map,
            local,
            ballistics: BallisticsSystem::new(),
            transport,
            rng: StdRng::from_entropy(),
            tick: 0,
            time: 0.0,
            round: 0,
            round_start: 0.0,
            phase: RoundPhase::Playing,
            game_state: None,
            events: VecDeque::new(),
            closed: false,
        };
        session.start_round();
        session.announce();
        session
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn map(&self) -> &WallMap {
        &self.map
    }

    pub fn local_player(&self) -> &Player {
        &self.local
    }

    pub fn local_player_mut(&mut self) -> &mut Player {
        &mut self.local
    }

    pub fn mirrors(&self) -> &MirrorTable {
        &self.mirrors
    }

    pub fn ballistics(&self) -> &BallisticsSystem {
        &self.ballistics
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn elapsed(&self) -> f64 {
        self.time - self.round_start
    }

    pub fn game_state(&self) -> Option<&serde_json::Value> {
        self.game_state.as_ref()
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.config = self.config.clone().with_settings(settings);
        self.controller = PlayerController::new(self.config.player.clone());
        self.raycaster.set_fov(self.config.raycast.fov_degrees);
    }

    /// Resets the local player at the next spawn point and clears bullets.
    pub fn start_round(&mut self) {
        let spawn = self.map.spawn_point(self.config.spawn_slot + self.round);
        self.local.reset(spawn);
        self.ballistics.clear();
        self.phase = RoundPhase::Playing;
        self.round_start = self.time;
        self.events.push_back(SessionEvent::RoundStarted {
            round: self.round,
            spawn,
        });
        log::info!(
            "Round {} started for {} at ({:.1}, {:.1})",
            self.round,
            self.local.player_id,
            spawn.x,
            spawn.y
        );
        self.round += 1;
    }

    /// Runs as many fixed ticks as `delta` seconds allow, pulling a fresh
    /// tick input from `input` for each one.
    pub fn advance(&mut self, delta: f32, input: &mut InputState) -> u32 {
        self.timestep.accumulate(delta);

        let mut ticks_run = 0;
        while self.timestep.consume_tick() {
            let tick_input = input.take_tick_input();
            self.tick(&tick_input);
            ticks_run += 1;
        }
        ticks_run
    }

    /// Freezes local simulation. The network is still drained, so mirrors
    /// stay current and hits from peers still land. Returns false unless a
    /// round was being played.
    pub fn pause(&mut self) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        self.phase = RoundPhase::Paused;
        self.events.push_back(SessionEvent::Paused);
        log::info!("{} paused", self.local.player_id);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != RoundPhase::Paused {
            return false;
        }
        self.phase = RoundPhase::Playing;
        self.events.push_back(SessionEvent::Resumed);
        log::info!("{} resumed", self.local.player_id);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.pause() || self.resume()
    }

    /// One fixed step: network, actions, movement, bullets, hits, broadcast.
    pub fn tick(&mut self, input: &TickInput) {
        let dt = self.timestep.dt();
        self.tick += 1;
        self.time += f64::from(dt);

        self.process_network();

        match self.phase {
            RoundPhase::GameOver => return,
            // paused time does not count towards the round
            RoundPhase::Paused => self.round_start += f64::from(dt),
            RoundPhase::Playing => {
                for action in &input.actions {
                    self.apply_action(*action);
                }

                self.controller
                    .process(&mut self.local, input, &self.map, dt);
                self.ballistics.update(dt, &self.map);
                self.resolve_hits();

                self.transport.send(&Message::player_update(&self.local));
            }
        }

        if !self.local.is_alive() {
            self.phase = RoundPhase::GameOver;
            let survived = self.elapsed();
            log::info!("{} was eliminated after {survived:.1}s", self.local.player_id);
            self.events.push_back(SessionEvent::GameOver { survived });
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Fire => self.fire(),
            Action::Reload => self.local.arsenal.current_mut().reload(),
            Action::SwitchWeapon(kind) => self.local.switch_weapon(kind),
        }
    }

    fn fire(&mut self) {
        let muzzle = Muzzle {
            position: self.local.position_3d(),
            direction: self.local.rotation(),
        };
        let weapon = self.local.arsenal.current_kind();
        let bullets = self.local.arsenal.current_mut().attempt_fire(
            self.time,
            muzzle,
            &self.config.player_id,
            &mut self.rng,
        );
        if bullets.is_empty() {
            return;
        }

        self.events.push_back(SessionEvent::ShotFired {
            weapon,
            pellets: bullets.len(),
        });
        self.ballistics.spawn(bullets);
        self.transport
            .send(&Message::shot_fired(&self.local, muzzle.direction));
    }

    fn resolve_hits(&mut self) {
        let hits = {
            let players: Vec<&Player> = std::iter::once(&self.local)
                .chain(self.mirrors.players())
                .collect();
            self.ballistics.detect_hits(&players)
        };

        for hit in hits {
            if hit.target_id == self.local.player_id {
                self.local.take_damage(hit.damage);
            } else if let Some(target) = self.mirrors.get_mut(&hit.target_id) {
                target.take_damage(hit.damage);
            }

            self.transport
                .send(&Message::player_hit(&hit.attacker_id, &hit.target_id, hit.damage));
            self.events.push_back(SessionEvent::Hit {
                attacker_id: hit.attacker_id,
                target_id: hit.target_id,
                damage: hit.damage,
            });
        }
    }

    fn process_network(&mut self) {
        for event in self.transport.poll() {
            match event {
                TransportEvent::PeerConnected { peer, addr } => {
                    self.events
                        .push_back(SessionEvent::PeerConnected { peer, addr });
                    // Let the newcomer learn about us before the next update.
                    self.announce();
                }
                TransportEvent::PeerDisconnected { peer } => {
                    self.events
                        .push_back(SessionEvent::PeerDisconnected { peer });
                    for player_id in self.mirrors.drop_peer(peer) {
                        log::info!("{player_id} lost with peer {peer}");
                        self.events.push_back(SessionEvent::PlayerLeft(player_id));
                    }
                }
                TransportEvent::Message { peer, message } => {
                    if let Some(event) = self.mirrors.apply(peer, message, &mut self.local) {
                        self.on_sync_event(event);
                    }
                }
            }
        }
    }

    fn on_sync_event(&mut self, event: SyncEvent) {
        let event = match event {
            SyncEvent::Updated(_) => return,
            SyncEvent::PlayerJoined(player_id) => {
                log::info!("{player_id} joined");
                SessionEvent::PlayerJoined(player_id)
            }
            SyncEvent::PlayerLeft(player_id) => {
                log::info!("{player_id} left");
                SessionEvent::PlayerLeft(player_id)
            }
            SyncEvent::ShotObserved { player_id, shot } => SessionEvent::ShotObserved {
                player_id,
                weapon: shot.weapon,
            },
            SyncEvent::LocalPlayerHit {
                attacker_id,
                outcome,
                ..
            } => SessionEvent::LocalPlayerHit {
                attacker_id,
                outcome,
            },
            SyncEvent::MirrorHit {
                attacker_id,
                target_id,
                damage,
            } => SessionEvent::Hit {
                attacker_id,
                target_id,
                damage,
            },
            SyncEvent::IdClash(peer) => SessionEvent::IdClash { peer },
            SyncEvent::GameState(data) => {
                self.game_state = Some(data.clone());
                SessionEvent::GameState(data)
            }
        };
        self.events.push_back(event);
    }

    fn announce(&mut self) {
        self.transport.send(&Message::PlayerJoin {
            player_id: self.config.player_id.clone(),
        });
    }

    pub fn frame(&self) -> FrameOutput {
        FrameOutput {
            distances: self.raycaster.cast(
                self.local.position,
                self.local.rotation(),
                self.map.walls(),
            ),
            hud: self.hud(),
        }
    }

    pub fn hud(&self) -> Hud {
        Hud::capture(
            &self.local,
            self.time,
            self.elapsed(),
            self.transport.status(),
            self.phase,
            self.mirrors.len(),
        )
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Says goodbye to the other peers and stops the transport.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        self.transport.send(&Message::PlayerLeave {
            player_id: self.config.player_id.clone(),
        });
        self.transport.shutdown();
        self.mirrors.clear();
        log::info!("Session for {} closed", self.config.player_id);
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
