//! Participant side of the relay link
//!
//! [`RemoteTransport::connect`] performs the lobby handshake (create or join
//! a room and wait for `GameStarting`), then splits the socket into a reader
//! task and a writer task. The reader forwards game envelopes and presence
//! into a `crossbeam_channel` the synchronous session polls; the writer
//! drains an unbounded tokio channel. The tasks run on the caller's tokio
//! runtime.

use super::codec::{read_frame, write_frame};
use super::transport::{Transport, TransportEvent};
use super::{NetworkError, NetworkResult};
use crossbeam_channel::{unbounded, Receiver, Sender};
use shared::protocol::{GameEnvelope, GameMessage, LobbyMessage, NetPacket};
use shared::PieceColor;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How to enter a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRequest {
    /// Create a room, with a fixed code or a generated one
    Create(Option<String>),
    Join(String),
}

/// Connected participant, ready to play
pub struct RemoteTransport {
    peer_id: Uuid,
    room_code: String,
    color: PieceColor,
    authority: bool,
    outbound: mpsc::UnboundedSender<NetPacket>,
    inbound: Receiver<TransportEvent>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
    left: bool,
}

impl RemoteTransport {
    /// Connect to the relay and complete the lobby handshake
    ///
    /// Resolves once the room has two participants. A room creator therefore
    /// waits here until someone joins.
    pub async fn connect(addr: impl ToSocketAddrs, request: RoomRequest) -> NetworkResult<Self> {
        let mut stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let hello = match &request {
            RoomRequest::Create(code) => LobbyMessage::CreateRoom { code: code.clone() },
            RoomRequest::Join(code) => LobbyMessage::JoinRoom { code: code.clone() },
        };
        write_frame(&mut stream, &NetPacket::Lobby(hello)).await?;

        let mut joined: Option<(String, Uuid)> = None;
        let (color, authority) = loop {
            let packet = read_frame(&mut stream).await?.ok_or_else(|| NetworkError::Handshake {
                message: "relay closed the connection".to_string(),
            })?;
            match packet {
                NetPacket::Lobby(LobbyMessage::RoomCreated { code }) => {
                    info!("[LOBBY] Room created: {}", code);
                }
                NetPacket::Lobby(LobbyMessage::JoinedRoom {
                    code,
                    is_host,
                    peer_id,
                }) => {
                    info!("[LOBBY] Joined room {} as {}", code, if is_host { "host" } else { "guest" });
                    joined = Some((code, peer_id));
                }
                NetPacket::Lobby(LobbyMessage::PlayerJoined { peer_id }) => {
                    info!("[LOBBY] Opponent {} joined", peer_id);
                }
                NetPacket::Lobby(LobbyMessage::GameStarting {
                    your_color,
                    authority,
                }) => break (your_color, authority),
                NetPacket::Lobby(LobbyMessage::Error { message }) => {
                    return Err(NetworkError::Lobby { message });
                }
                other => debug!("[LOBBY] Ignoring {:?} during handshake", other),
            }
        };

        let Some((room_code, peer_id)) = joined else {
            return Err(NetworkError::Handshake {
                message: "game started before the room was joined".to_string(),
            });
        };
        info!("[NETWORK] Game starting in room {}: playing {}", room_code, color);

        let (read_half, mut write_half) = stream.into_split();
        let (event_tx, event_rx) = unbounded();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<NetPacket>();

        let reader = tokio::spawn(forward_inbound(read_half, event_tx));
        let writer = tokio::spawn(async move {
            while let Some(packet) = outbound_rx.recv().await {
                if let Err(e) = write_frame(&mut write_half, &packet).await {
                    warn!("[NETWORK] Write failed: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            peer_id,
            room_code,
            color,
            authority,
            outbound,
            inbound: event_rx,
            reader,
            writer,
            left: false,
        })
    }

    pub fn room_code(&self) -> &str {
        &self.room_code
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    pub fn is_authority(&self) -> bool {
        self.authority
    }
}

async fn forward_inbound(mut reader: OwnedReadHalf, events: Sender<TransportEvent>) {
    loop {
        let event = match read_frame(&mut reader).await {
            Ok(Some(NetPacket::Game(envelope))) => TransportEvent::Message(envelope),
            Ok(Some(NetPacket::Lobby(LobbyMessage::PlayerLeft { peer_id }))) => {
                info!("[NETWORK] Opponent {} left", peer_id);
                TransportEvent::PeerLeft(peer_id)
            }
            Ok(Some(NetPacket::Lobby(LobbyMessage::Error { message }))) => {
                warn!("[NETWORK] Relay error: {}", message);
                continue;
            }
            Ok(Some(NetPacket::Lobby(other))) => {
                debug!("[NETWORK] Ignoring lobby message {:?}", other);
                continue;
            }
            Ok(None) => {
                info!("[NETWORK] Relay closed the connection");
                let _ = events.send(TransportEvent::Disconnected);
                return;
            }
            Err(e) => {
                warn!("[NETWORK] Read failed: {}", e);
                let _ = events.send(TransportEvent::Disconnected);
                return;
            }
        };
        if events.send(event).is_err() {
            return;
        }
    }
}

impl Transport for RemoteTransport {
    fn peer_id(&self) -> Uuid {
        self.peer_id
    }

    fn send(&mut self, message: GameMessage) -> NetworkResult<()> {
        if self.left {
            return Err(NetworkError::Disconnected);
        }
        let packet = NetPacket::Game(GameEnvelope::unstamped(self.peer_id, message));
        self.outbound
            .send(packet)
            .map_err(|_| NetworkError::Disconnected)
    }

    fn try_recv(&mut self) -> Option<TransportEvent> {
        self.inbound.try_recv().ok()
    }

    fn leave(&mut self) {
        if self.left {
            return;
        }
        self.left = true;
        let _ = self.outbound.send(NetPacket::Lobby(LobbyMessage::LeaveRoom));
        info!("[NETWORK] Left room {}", self.room_code);
    }
}

impl Drop for RemoteTransport {
    fn drop(&mut self) {
        self.reader.abort();
        if self.left {
            // Let the writer flush LeaveRoom; it exits once `outbound` drops
            return;
        }
        self.writer.abort();
    }
}
