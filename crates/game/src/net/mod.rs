mod codec;
mod mirror;
mod protocol;
mod stats;
mod tcp;
mod transport;

pub use codec::{
    decode_message, encode_frame, CodecError, FrameDecoder, LENGTH_PREFIX_SIZE, MAX_FRAME_SIZE,
};
pub use mirror::{MirrorTable, SyncEvent};
pub use protocol::{HitData, Message, PlayerState, ShotData, DEFAULT_PORT, DEFAULT_TICK_RATE};
pub use stats::NetworkStats;
pub use tcp::{TcpTransport, TransportError, CONNECT_TIMEOUT, OUTBOUND_QUEUE_FRAMES, SHUTDOWN_TIMEOUT};
pub use transport::{NullTransport, PeerId, Role, Transport, TransportEvent};
