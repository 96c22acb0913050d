//! Room relay
//!
//! The relay is the ordering point of a networked game. Participants connect
//! over TCP, create or join a room by code and from then on send game
//! messages to the relay, which stamps each one with the room's next sequence
//! number and the authority flag and broadcasts it to both participants (the
//! sender included). Stamping and fan-out happen under one lock, so both
//! participants receive the same total order.
//!
//! The host (room creator) plays White and is the authority peer. When a
//! participant leaves or disconnects, the other receives `PlayerLeft`.

use super::codec::{read_frame, write_frame};
use super::NetworkResult;
use parking_lot::Mutex;
use shared::protocol::{GameEnvelope, LobbyMessage, NetPacket};
use shared::PieceColor;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

type PeerTx = mpsc::UnboundedSender<NetPacket>;

#[derive(Debug)]
struct Seat {
    peer_id: Uuid,
    tx: PeerTx,
}

/// A game room with up to two participants
#[derive(Debug)]
struct Room {
    host: Seat,
    guest: Option<Seat>,
    next_seq: u64,
}

/// All active rooms
#[derive(Debug, Default)]
struct Rooms {
    rooms: HashMap<String, Room>,
    peer_to_room: HashMap<Uuid, String>,
}

impl Rooms {
    fn generate_code(&self) -> String {
        use rand::Rng;
        let mut rng = rand::rng();
        loop {
            let code: String = (0..6)
                .map(|_| rng.random_range(b'A'..=b'Z') as char)
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    fn create(&mut self, peer_id: Uuid, tx: &PeerTx, requested: Option<String>) {
        if self.peer_to_room.contains_key(&peer_id) {
            send(tx, LobbyMessage::Error {
                message: "Already in a room".to_string(),
            });
            return;
        }

        let code = match requested {
            Some(code) if self.rooms.contains_key(&code) => {
                send(tx, LobbyMessage::Error {
                    message: format!("Room {code} already exists"),
                });
                return;
            }
            Some(code) => code,
            None => self.generate_code(),
        };

        info!("[RELAY] Creating room {} for {}", code, peer_id);
        self.rooms.insert(
            code.clone(),
            Room {
                host: Seat {
                    peer_id,
                    tx: tx.clone(),
                },
                guest: None,
                next_seq: 0,
            },
        );
        self.peer_to_room.insert(peer_id, code.clone());

        send(tx, LobbyMessage::RoomCreated { code: code.clone() });
        send(tx, LobbyMessage::JoinedRoom {
            code,
            is_host: true,
            peer_id,
        });
    }

    fn join(&mut self, peer_id: Uuid, tx: &PeerTx, code: String) {
        if self.peer_to_room.contains_key(&peer_id) {
            send(tx, LobbyMessage::Error {
                message: "Already in a room".to_string(),
            });
            return;
        }
        let Some(room) = self.rooms.get_mut(&code) else {
            send(tx, LobbyMessage::Error {
                message: format!("Room {code} not found"),
            });
            return;
        };
        if room.guest.is_some() {
            send(tx, LobbyMessage::Error {
                message: format!("Room {code} is full"),
            });
            return;
        }

        info!("[RELAY] {} joined room {}", peer_id, code);
        room.guest = Some(Seat {
            peer_id,
            tx: tx.clone(),
        });

        send(tx, LobbyMessage::JoinedRoom {
            code: code.clone(),
            is_host: false,
            peer_id,
        });
        send(&room.host.tx, LobbyMessage::PlayerJoined { peer_id });
        send(&room.host.tx, LobbyMessage::GameStarting {
            your_color: PieceColor::White,
            authority: true,
        });
        send(tx, LobbyMessage::GameStarting {
            your_color: PieceColor::Black,
            authority: false,
        });
        self.peer_to_room.insert(peer_id, code);
    }

    /// Remove `peer_id` from its room and tell the other participant
    fn leave(&mut self, peer_id: Uuid) {
        let Some(code) = self.peer_to_room.remove(&peer_id) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&code) else {
            return;
        };

        if room.host.peer_id == peer_id {
            // Host left - notify guest and close the room
            if let Some(guest) = room.guest.take() {
                send(&guest.tx, LobbyMessage::PlayerLeft { peer_id });
                self.peer_to_room.remove(&guest.peer_id);
            }
            self.rooms.remove(&code);
            info!("[RELAY] Host {} left, room {} closed", peer_id, code);
        } else if room.guest.as_ref().is_some_and(|guest| guest.peer_id == peer_id) {
            room.guest = None;
            send(&room.host.tx, LobbyMessage::PlayerLeft { peer_id });
            info!("[RELAY] Guest {} left room {}", peer_id, code);
        }
    }

    /// Stamp and fan out one game envelope
    fn broadcast(&mut self, peer_id: Uuid, envelope: GameEnvelope) {
        let Some(code) = self.peer_to_room.get(&peer_id) else {
            warn!("[RELAY] Game message from {} outside any room, dropped", peer_id);
            return;
        };
        let Some(room) = self.rooms.get_mut(code) else {
            return;
        };

        room.next_seq += 1;
        let stamped = GameEnvelope {
            seq: room.next_seq,
            sender: peer_id,
            from_authority: room.host.peer_id == peer_id,
            message: envelope.message,
        };
        debug!("[RELAY] seq {} from {}: {:?}", stamped.seq, peer_id, stamped.message);

        let packet = NetPacket::Game(stamped);
        let _ = room.host.tx.send(packet.clone());
        if let Some(guest) = &room.guest {
            let _ = guest.tx.send(packet);
        }
    }

    fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

fn send(tx: &PeerTx, message: LobbyMessage) {
    // The writer task is gone only when the peer is disconnecting
    let _ = tx.send(NetPacket::Lobby(message));
}

/// TCP relay server
pub struct RelayServer {
    listener: TcpListener,
    rooms: Arc<Mutex<Rooms>>,
}

impl RelayServer {
    pub async fn bind(addr: impl tokio::net::ToSocketAddrs) -> NetworkResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            rooms: Arc::new(Mutex::new(Rooms::default())),
        })
    }

    pub fn local_addr(&self) -> NetworkResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for counting open rooms while the server runs
    pub fn room_counter(&self) -> RoomCounter {
        RoomCounter {
            rooms: Arc::clone(&self.rooms),
        }
    }

    /// Accept connections until the task is dropped
    pub async fn run(self) -> NetworkResult<()> {
        info!("[RELAY] Listening on {}", self.listener.local_addr()?);
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!("[RELAY] Connection from {}", addr);
                    let rooms = Arc::clone(&self.rooms);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, rooms).await {
                            warn!("[RELAY] Connection from {} ended: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("[RELAY] Accept failed: {}", e);
                }
            }
        }
    }
}

/// Read-only view on the relay's room table
#[derive(Clone)]
pub struct RoomCounter {
    rooms: Arc<Mutex<Rooms>>,
}

impl RoomCounter {
    pub fn count(&self) -> usize {
        self.rooms.lock().room_count()
    }
}

async fn handle_connection(stream: TcpStream, rooms: Arc<Mutex<Rooms>>) -> NetworkResult<()> {
    let peer_id = Uuid::new_v4();
    let (mut reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<NetPacket>();

    let writer_task = tokio::spawn(async move {
        while let Some(packet) = rx.recv().await {
            if let Err(e) = write_frame(&mut writer, &packet).await {
                debug!("[RELAY] Write to {} failed: {}", peer_id, e);
                break;
            }
        }
    });

    let result = read_loop(&mut reader, peer_id, &tx, &rooms).await;

    rooms.lock().leave(peer_id);
    drop(tx);
    let _ = writer_task.await;
    debug!("[RELAY] Peer {} disconnected", peer_id);
    result
}

async fn read_loop(
    reader: &mut tokio::net::tcp::OwnedReadHalf,
    peer_id: Uuid,
    tx: &PeerTx,
    rooms: &Arc<Mutex<Rooms>>,
) -> NetworkResult<()> {
    while let Some(packet) = read_frame(reader).await? {
        match packet {
            NetPacket::Lobby(LobbyMessage::CreateRoom { code }) => {
                rooms.lock().create(peer_id, tx, code);
            }
            NetPacket::Lobby(LobbyMessage::JoinRoom { code }) => {
                rooms.lock().join(peer_id, tx, code);
            }
            NetPacket::Lobby(LobbyMessage::LeaveRoom) => {
                rooms.lock().leave(peer_id);
            }
            NetPacket::Lobby(other) => {
                warn!("[RELAY] Unexpected lobby message from {}: {:?}", peer_id, other)
            }
            NetPacket::Game(envelope) => {
                rooms.lock().broadcast(peer_id, envelope);
            }
        }
    }
    Ok(())
}
