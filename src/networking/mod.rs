//! Replication and transport
//!
//! # Module Structure
//!
//! - `replication` - Applies ordered game envelopes to a `ChessGame` mirror,
//!   enforces the authority rules and tracks network entity lifecycle
//! - `transport` - `Transport` trait and the in-process `LocalHub`
//! - `codec` - Length-prefixed bincode framing
//! - `relay` - tokio room relay that orders and broadcasts envelopes
//! - `client` - `RemoteTransport`, the tokio link from a participant to the relay
//!
//! The core never orders messages itself. Whatever sits in the middle (the
//! relay or the local hub) stamps each envelope with a sequence number and
//! the authority flag, and every participant applies envelopes in that order.

pub mod client;
pub mod codec;
pub mod relay;
pub mod replication;
pub mod transport;

pub use client::{RemoteTransport, RoomRequest};
pub use relay::RelayServer;
pub use replication::{Applied, Application, EntityLedger, EntityRecord, Replicator};
pub use transport::{LocalHub, LocalTransport, Transport, TransportEvent};

/// Errors from the network layer
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Connection closed")]
    Disconnected,

    #[error("Lobby error: {message}")]
    Lobby { message: String },

    #[error("Handshake failed: {message}")]
    Handshake { message: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
