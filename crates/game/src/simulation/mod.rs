mod hud;
mod session;
mod tick;

pub use hud::{Hud, RoundPhase, format_time};
pub use session::{FrameOutput, GameSession, SessionConfig, SessionEvent, generated_player_id};
pub use tick::{FixedTimestep, MAX_FRAME_DELTA};
