use crate::{PieceColor, PieceType, PromotionPiece, WireSquare};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lobby-related messages for room management
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum LobbyMessage {
    // Client → Server
    CreateRoom { code: Option<String> },
    JoinRoom { code: String },
    LeaveRoom,

    // Server → Client
    RoomCreated { code: String },
    JoinedRoom { code: String, is_host: bool, peer_id: Uuid }, // is_host: true=White + authority
    PlayerJoined { peer_id: Uuid },
    PlayerLeft { peer_id: Uuid },
    GameStarting { your_color: PieceColor, authority: bool },
    Error { message: String },
}

/// In-game messages
///
/// `Move` and `Promote` may be originated by either participant. `SpawnPiece`
/// and `DespawnPiece` manage the lifecycle of network-owned piece entities and
/// are only honoured when the ordering point stamped them as coming from the
/// authority peer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum GameMessage {
    Move {
        from: WireSquare,
        to: WireSquare,
    },
    Promote {
        square: WireSquare,
        choice: PromotionPiece,
    },
    SpawnPiece {
        id: u32,
        piece_type: PieceType,
        color: PieceColor,
        square: WireSquare,
        promotion: bool,
    },
    DespawnPiece {
        id: u32,
    },
}

/// A game message after it passed the ordering point
///
/// `seq` is strictly increasing per room and `from_authority` is stamped by
/// the relay (or local hub), never copied from what the sender claimed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameEnvelope {
    pub seq: u64,
    pub sender: Uuid,
    pub from_authority: bool,
    pub message: GameMessage,
}

impl GameEnvelope {
    /// Envelope as a client submits it; the relay overwrites the stamps.
    pub fn unstamped(sender: Uuid, message: GameMessage) -> Self {
        Self {
            seq: 0,
            sender,
            from_authority: false,
            message,
        }
    }
}

/// Top-level frame payload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum NetPacket {
    Lobby(LobbyMessage),
    Game(GameEnvelope),
}
