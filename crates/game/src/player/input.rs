use bitflags::bitflags;
use glam::Vec2;

use crate::weapon::WeaponKind;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const FORWARD = 1 << 0;
        const BACK = 1 << 1;
        const STRAFE_LEFT = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
        const JUMP = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fire,
    Reload,
    SwitchWeapon(WeaponKind),
}

/// Everything the simulation consumes for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub buttons: Buttons,
    pub mouse_delta: Vec2,
    pub actions: Vec<Action>,
}

impl TickInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_buttons(buttons: Buttons) -> Self {
        Self {
            buttons,
            ..Self::default()
        }
    }
}

/// Collects device input between ticks. Buttons are level-triggered and
/// persist; mouse motion and actions are drained by `take_tick_input`.
#[derive(Debug, Default)]
pub struct InputState {
    buttons: Buttons,
    mouse_delta: Vec2,
    actions: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, button: Buttons, held: bool) {
        self.buttons.set(button, held);
    }

    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons;
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub fn accumulate_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn push_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            buttons: self.buttons,
            mouse_delta: std::mem::take(&mut self.mouse_delta),
            actions: std::mem::take(&mut self.actions),
        }
    }
}
