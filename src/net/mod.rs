//! Replication protocol and transports

pub mod channel;
pub mod error;
pub mod framing;
pub mod messages;
pub mod replica;
pub mod tcp;

pub use channel::{
    memory_listener, memory_pair, ClientMemoryChannel, ConnectionSource, MemoryChannel,
    MemoryConnector, MemoryListener, MessageChannel, ServerChannel,
};
pub use error::ChannelError;
pub use messages::{
    ActionView, ClientMessage, EntityView, IntentRequest, PerceptionMessage, ServerMessage,
    StructureView, TileView,
};
pub use replica::ObserverReplica;
pub use tcp::{ClientTcpChannel, TcpAcceptor, TcpChannel};
