mod config;
mod controller;
mod input;
mod state;

pub use config::PlayerConfig;
pub use controller::{MoveOutcome, PlayerController};
pub use input::{Action, Buttons, InputState, TickInput};
pub use state::{DamageOutcome, MAX_ARMOR, MAX_HEALTH, PLAYER_RADIUS, Player};
