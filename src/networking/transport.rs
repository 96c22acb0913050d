//! Transport collaborator
//!
//! A [`Transport`] carries `GameMessage`s from one participant to every
//! participant (the sender included) in a single total order. The session
//! polls it; nothing here calls back into the game.
//!
//! [`LocalHub`] is the in-process implementation used by the demo and the
//! tests. It plays the relay's role: it stamps each envelope with the next
//! sequence number and the authority flag and fans it out, all under one
//! lock, so every inbox sees the same order.

use super::{NetworkError, NetworkResult};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use shared::protocol::{GameEnvelope, GameMessage};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Something the transport delivered
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Ordered game message
    Message(GameEnvelope),
    /// The other participant left the room
    PeerLeft(Uuid),
    /// Our own link to the ordering point is gone
    Disconnected,
}

pub trait Transport: Send {
    fn peer_id(&self) -> Uuid;

    /// Submit a message for ordered broadcast
    fn send(&mut self, message: GameMessage) -> NetworkResult<()>;

    /// Next delivered event, if any; never blocks
    fn try_recv(&mut self) -> Option<TransportEvent>;

    /// Leave the room; the other participant receives `PeerLeft`
    fn leave(&mut self);
}

#[derive(Default)]
struct HubState {
    next_seq: u64,
    authority: Option<Uuid>,
    peers: Vec<(Uuid, Sender<TransportEvent>)>,
}

/// In-process ordered broadcast
#[derive(Clone, Default)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. The first one to join as `authority` keeps the role.
    pub fn join(&self, authority: bool) -> LocalTransport {
        let peer_id = Uuid::new_v4();
        let (tx, rx) = unbounded();

        let mut state = self.state.lock();
        if authority && state.authority.is_none() {
            state.authority = Some(peer_id);
        }
        state.peers.push((peer_id, tx));
        info!(
            "[HUB] Peer {} joined ({} in room{})",
            peer_id,
            state.peers.len(),
            if state.authority == Some(peer_id) { ", authority" } else { "" }
        );

        LocalTransport {
            peer_id,
            state: Arc::clone(&self.state),
            inbox: rx,
            joined: true,
        }
    }

    pub fn peer_count(&self) -> usize {
        self.state.lock().peers.len()
    }
}

/// One participant's handle on a [`LocalHub`]
pub struct LocalTransport {
    peer_id: Uuid,
    state: Arc<Mutex<HubState>>,
    inbox: Receiver<TransportEvent>,
    joined: bool,
}

impl Transport for LocalTransport {
    fn peer_id(&self) -> Uuid {
        self.peer_id
    }

    fn send(&mut self, message: GameMessage) -> NetworkResult<()> {
        if !self.joined {
            return Err(NetworkError::Disconnected);
        }

        let mut state = self.state.lock();
        state.next_seq += 1;
        let envelope = GameEnvelope {
            seq: state.next_seq,
            sender: self.peer_id,
            from_authority: state.authority == Some(self.peer_id),
            message,
        };
        debug!("[HUB] seq {} from {}: {:?}", envelope.seq, self.peer_id, envelope.message);

        for (_, tx) in &state.peers {
            // A dropped receiver is a peer mid-teardown
            let _ = tx.send(TransportEvent::Message(envelope.clone()));
        }
        Ok(())
    }

    fn try_recv(&mut self) -> Option<TransportEvent> {
        self.inbox.try_recv().ok()
    }

    fn leave(&mut self) {
        if !self.joined {
            return;
        }
        self.joined = false;

        let mut state = self.state.lock();
        state.peers.retain(|(id, _)| *id != self.peer_id);
        for (_, tx) in &state.peers {
            let _ = tx.send(TransportEvent::PeerLeft(self.peer_id));
        }
        info!("[HUB] Peer {} left", self.peer_id);
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        self.leave();
    }
}
