use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use glam::Vec2;
use linkfire::{Action, Buttons, WeaponKind};

/// Terminals report presses and auto-repeats but rarely releases, so a key
/// stays held for this long after its last press.
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Mouse counts synthesized per second while a turn key is held.
pub const TURN_COUNTS_PER_SEC: f32 = 900.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Held {
    Button(Buttons),
    TurnLeft,
    TurnRight,
}

/// What a single key press means to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Quit,
    NewRound,
    TogglePause,
    Action(Action),
    Held,
    Ignored,
}

#[derive(Debug, Default)]
pub struct KeyLatch {
    last_press: HashMap<Held, Instant>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: KeyCode, now: Instant) -> KeyIntent {
        let held = match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyIntent::Quit,
            KeyCode::Char('n') => return KeyIntent::NewRound,
            KeyCode::Char('p') => return KeyIntent::TogglePause,
            KeyCode::Char('f') => return KeyIntent::Action(Action::Fire),
            KeyCode::Char('r') => return KeyIntent::Action(Action::Reload),
            KeyCode::Char('1') => return KeyIntent::Action(Action::SwitchWeapon(WeaponKind::Pistol)),
            KeyCode::Char('2') => return KeyIntent::Action(Action::SwitchWeapon(WeaponKind::Rifle)),
            KeyCode::Char('3') => return KeyIntent::Action(Action::SwitchWeapon(WeaponKind::Shotgun)),
            KeyCode::Char('w') => Held::Button(Buttons::FORWARD),
            KeyCode::Char('s') => Held::Button(Buttons::BACK),
            KeyCode::Char('a') => Held::Button(Buttons::STRAFE_LEFT),
            KeyCode::Char('d') => Held::Button(Buttons::STRAFE_RIGHT),
            KeyCode::Char(' ') => Held::Button(Buttons::JUMP),
            KeyCode::Left => Held::TurnLeft,
            KeyCode::Right => Held::TurnRight,
            _ => return KeyIntent::Ignored,
        };
        self.last_press.insert(held, now);
        KeyIntent::Held
    }

    fn is_held(&self, held: Held, now: Instant) -> bool {
        self.last_press
            .get(&held)
            .is_some_and(|pressed| now.saturating_duration_since(*pressed) < HOLD_WINDOW)
    }

    pub fn buttons(&self, now: Instant) -> Buttons {
        self.last_press
            .keys()
            .filter(|held| self.is_held(**held, now))
            .fold(Buttons::empty(), |acc, held| match held {
                Held::Button(button) => acc | *button,
                Held::TurnLeft | Held::TurnRight => acc,
            })
    }

    /// Synthesized mouse movement for `elapsed` seconds of held turn keys.
    pub fn mouse_delta(&self, now: Instant, elapsed: f32) -> Vec2 {
        // Mouse-right lowers the heading, and the view draws higher angles
        // further right, so turning right means negative counts.
        let mut direction = 0.0;
        if self.is_held(Held::TurnLeft, now) {
            direction += 1.0;
        }
        if self.is_held(Held::TurnRight, now) {
            direction -= 1.0;
        }
        Vec2::new(direction * TURN_COUNTS_PER_SEC * elapsed, 0.0)
    }
}
