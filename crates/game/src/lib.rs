pub mod geometry;
pub mod map;
pub mod net;
pub mod player;
pub mod render;
pub mod settings;
pub mod simulation;
pub mod weapon;

pub use map::{Arena, MapError, Wall, WallMap};
pub use net::{
    CodecError, DEFAULT_PORT, DEFAULT_TICK_RATE, Message, MirrorTable, NetworkStats,
    NullTransport, PeerId, PlayerState, Role, TcpTransport, Transport, TransportError,
    TransportEvent,
};
pub use player::{
    Action, Buttons, InputState, MoveOutcome, Player, PlayerConfig, PlayerController, TickInput,
};
pub use render::{RaycastConfig, Raycaster};
pub use settings::{Settings, SettingsError};
pub use simulation::{
    FixedTimestep, FrameOutput, GameSession, Hud, RoundPhase, SessionConfig, SessionEvent,
    generated_player_id,
};
pub use weapon::{BallisticsSystem, Bullet, WeaponKind};
