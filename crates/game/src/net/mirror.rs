use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::protocol::{HitData, Message, PlayerState, ShotData};
use super::transport::PeerId;
use crate::player::{DamageOutcome, Player};

/// Outcome of applying one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    PlayerJoined(String),
    PlayerLeft(String),
    Updated(String),
    ShotObserved {
        player_id: String,
        shot: ShotData,
    },
    LocalPlayerHit {
        attacker_id: String,
        damage: u32,
        outcome: DamageOutcome,
    },
    MirrorHit {
        attacker_id: String,
        target_id: String,
        damage: u32,
    },
    GameState(serde_json::Value),
    /// A link sent a join or update carrying the local player id.
    IdClash(PeerId),
}

#[derive(Debug, Clone)]
struct Mirror {
    player: Player,
    origin: PeerId,
}

/// Latest known state of every remote player, keyed and iterated by player
/// id.
///
/// Owned by the simulation; the network side only ever hands it messages.
#[derive(Debug)]
pub struct MirrorTable {
    local_id: String,
    mirrors: BTreeMap<String, Mirror>,
    clashing_links: BTreeSet<PeerId>,
}

impl MirrorTable {
    pub fn new(local_id: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            mirrors: BTreeMap::new(),
            clashing_links: BTreeSet::new(),
        }
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.mirrors.contains_key(player_id)
    }

    pub fn get(&self, player_id: &str) -> Option<&Player> {
        self.mirrors.get(player_id).map(|mirror| &mirror.player)
    }

    pub fn get_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.mirrors.get_mut(player_id).map(|mirror| &mut mirror.player)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.mirrors.values().map(|mirror| &mirror.player)
    }

    pub fn ids(&self) -> Vec<String> {
        self.mirrors.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.mirrors.clear();
        self.clashing_links.clear();
    }

    /// Applies a message received on link `origin`. Joins and updates that
    /// carry the local player id never touch `local`; the first one per link
    /// is reported as `IdClash`. Only `player_hit` may affect `local`.
    pub fn apply(&mut self, origin: PeerId, message: Message, local: &mut Player) -> Option<SyncEvent> {
        match message {
            Message::PlayerUpdate { player_id, data } => self.apply_update(origin, player_id, &data),
            Message::PlayerJoin { player_id } => {
                if player_id == self.local_id {
                    return self.report_clash(origin);
                }
                if self.mirrors.contains_key(&player_id) {
                    return None;
                }
                let player = Player::new(player_id.clone(), Vec2::ZERO);
                self.mirrors.insert(player_id.clone(), Mirror { player, origin });
                Some(SyncEvent::PlayerJoined(player_id))
            }
            Message::PlayerLeave { player_id } => self
                .mirrors
                .remove(&player_id)
                .map(|_| SyncEvent::PlayerLeft(player_id)),
            Message::ShotFired { player_id, data } => {
                if player_id == self.local_id {
                    return None;
                }
                Some(SyncEvent::ShotObserved {
                    player_id,
                    shot: data,
                })
            }
            Message::PlayerHit { data, .. } => self.apply_hit(data, local),
            Message::GameState { data, .. } => Some(SyncEvent::GameState(data)),
        }
    }

    fn apply_update(&mut self, origin: PeerId, player_id: String, data: &PlayerState) -> Option<SyncEvent> {
        if player_id == self.local_id {
            return self.report_clash(origin);
        }

        let player = data.to_player(&player_id);
        match self.mirrors.get_mut(&player_id) {
            Some(mirror) => {
                mirror.player = player;
                mirror.origin = origin;
                Some(SyncEvent::Updated(player_id))
            }
            None => {
                self.mirrors.insert(player_id.clone(), Mirror { player, origin });
                Some(SyncEvent::PlayerJoined(player_id))
            }
        }
    }

    fn report_clash(&mut self, origin: PeerId) -> Option<SyncEvent> {
        if !self.clashing_links.insert(origin) {
            return None;
        }
        log::warn!(
            "Peer {origin} is using the local player id {:?}; its state is ignored",
            self.local_id
        );
        Some(SyncEvent::IdClash(origin))
    }

    fn apply_hit(&mut self, hit: HitData, local: &mut Player) -> Option<SyncEvent> {
        if hit.target_id == self.local_id {
            let outcome = local.take_damage(hit.damage);
            return Some(SyncEvent::LocalPlayerHit {
                attacker_id: hit.attacker_id,
                damage: hit.damage,
                outcome,
            });
        }

        let mirror = self.mirrors.get_mut(&hit.target_id)?;
        mirror.player.take_damage(hit.damage);
        Some(SyncEvent::MirrorHit {
            attacker_id: hit.attacker_id,
            target_id: hit.target_id,
            damage: hit.damage,
        })
    }

    /// Forgets every mirror learned through a link that has gone away.
    pub fn drop_peer(&mut self, origin: PeerId) -> Vec<String> {
        self.clashing_links.remove(&origin);
        let removed: Vec<_> = self
            .mirrors
            .iter()
            .filter(|(_, mirror)| mirror.origin == origin)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &removed {
            self.mirrors.remove(id);
        }
        removed
    }
}
