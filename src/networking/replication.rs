//! Replication protocol
//!
//! Turns ordered [`GameEnvelope`]s into state changes on the local
//! [`ChessGame`] mirror. Every participant runs the same code on the same
//! stream, so mirrors stay identical without any participant touching
//! another's state.
//!
//! # Authority
//!
//! Any participant may originate `Move` and `Promote`. Only envelopes the
//! ordering point stamped `from_authority` may create or destroy piece
//! entities (`SpawnPiece`, `DespawnPiece`). After applying a capture or a
//! promotion, the authority owes the room the matching lifecycle messages;
//! [`Application::follow_ups`] lists them. Mirrors have already derived the
//! same result locally, so those follow-ups land as no-ops there.
//!
//! # Drops
//!
//! Duplicates (`seq` not above the last applied), lifecycle messages without
//! the authority stamp, off-board coordinates and anything the state machine
//! rejects are logged and dropped. Divergence is not detected or repaired;
//! the board fingerprint is logged at debug level for diagnosis.

use crate::game::controller::{ChessGame, MoveOutcome};
use crate::game::rules::standard_setup;
use crate::game::types::{Piece, PieceColor, PieceId, PieceType, Square};
use shared::protocol::{GameEnvelope, GameMessage};
use shared::WireSquare;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// What applying one envelope did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Moved(MoveOutcome),
    Promoted { square: Square, piece: PieceId },
    Spawned(PieceId),
    Despawned(PieceId),
    /// Valid lifecycle message with nothing left to do
    AlreadyApplied,
    Dropped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub applied: Applied,
    /// Lifecycle messages this participant must now send (authority only)
    pub follow_ups: Vec<GameMessage>,
}

impl Application {
    fn only(applied: Applied) -> Self {
        Self {
            applied,
            follow_ups: Vec::new(),
        }
    }

    fn dropped() -> Self {
        Self::only(Applied::Dropped)
    }
}

/// Logical record of a network piece entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    pub piece_type: PieceType,
    pub color: PieceColor,
    pub alive: bool,
}

/// Liveness of every piece entity the authority has created
#[derive(Debug, Default, Clone)]
pub struct EntityLedger {
    entities: HashMap<PieceId, EntityRecord>,
}

impl EntityLedger {
    /// Mark `id` alive; `false` if it already was, or if the id belongs to a
    /// different piece
    pub fn spawn(&mut self, id: PieceId, piece_type: PieceType, color: PieceColor) -> bool {
        match self.entities.get(&id) {
            Some(record) if record.piece_type != piece_type || record.color != color => {
                warn!("[REPLICATION] Entity {} already recorded as {:?} {:?}", id, record.color, record.piece_type);
                false
            }
            Some(record) if record.alive => false,
            _ => {
                self.entities.insert(
                    id,
                    EntityRecord {
                        piece_type,
                        color,
                        alive: true,
                    },
                );
                true
            }
        }
    }

    /// Mark `id` dead; `false` if unknown or already dead
    pub fn despawn(&mut self, id: PieceId) -> bool {
        match self.entities.get_mut(&id) {
            Some(record) if record.alive => {
                record.alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: PieceId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    pub fn is_alive(&self, id: PieceId) -> bool {
        self.entities.get(&id).is_some_and(|record| record.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.entities.values().filter(|record| record.alive).count()
    }
}

/// Applies ordered envelopes to a local mirror
#[derive(Debug, Clone)]
pub struct Replicator {
    local_peer: Uuid,
    is_authority: bool,
    last_seq: u64,
    ledger: EntityLedger,
}

impl Replicator {
    pub fn new(local_peer: Uuid, is_authority: bool) -> Self {
        Self {
            local_peer,
            is_authority,
            last_seq: 0,
            ledger: EntityLedger::default(),
        }
    }

    pub fn local_peer(&self) -> Uuid {
        self.local_peer
    }

    pub fn is_authority(&self) -> bool {
        self.is_authority
    }

    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    pub fn ledger(&self) -> &EntityLedger {
        &self.ledger
    }

    /// The 32 spawns of the standard array; empty unless we are the authority
    pub fn setup_messages(&self) -> Vec<GameMessage> {
        if !self.is_authority {
            warn!("[REPLICATION] Only the authority issues setup spawns");
            return Vec::new();
        }
        standard_setup().iter().map(|piece| spawn_message(piece, false)).collect()
    }

    pub fn apply(&mut self, game: &mut ChessGame, envelope: &GameEnvelope) -> Application {
        if envelope.seq <= self.last_seq {
            warn!(
                "[REPLICATION] Dropping duplicate seq {} (last applied {})",
                envelope.seq, self.last_seq
            );
            return Application::dropped();
        }
        self.last_seq = envelope.seq;

        let application = match &envelope.message {
            GameMessage::Move { from, to } => self.apply_move(game, *from, *to),
            GameMessage::Promote { square, choice } => {
                let Some(square) = wire_square(*square) else {
                    return Application::dropped();
                };
                let pawn = game.pending_promotion().request().map(|request| request.pawn);
                match game.apply_promotion(square, *choice) {
                    Ok(id) => {
                        let mut follow_ups = Vec::new();
                        if self.is_authority {
                            if let Some(pawn) = pawn {
                                follow_ups.push(GameMessage::DespawnPiece { id: pawn.0 });
                            }
                            if let Some(piece) = game.board().piece_at(square) {
                                follow_ups.push(spawn_message(piece, true));
                            }
                        }
                        Application {
                            applied: Applied::Promoted { square, piece: id },
                            follow_ups,
                        }
                    }
                    Err(e) => {
                        warn!("[REPLICATION] Dropping promotion on {}: {}", square, e);
                        Application::dropped()
                    }
                }
            }
            GameMessage::SpawnPiece {
                id,
                piece_type,
                color,
                square,
                promotion,
            } => {
                if !envelope.from_authority {
                    warn!("[REPLICATION] Dropping spawn {} from non-authority {}", id, envelope.sender);
                    return Application::dropped();
                }
                let Some(square) = wire_square(*square) else {
                    return Application::dropped();
                };
                let mut piece = Piece::new(PieceId(*id), *piece_type, *color, square);
                piece.has_moved = *promotion;

                match game.spawn_piece(piece) {
                    Ok(placed) => {
                        self.ledger.spawn(piece.id, piece.kind, piece.color);
                        Application::only(if placed {
                            Applied::Spawned(piece.id)
                        } else {
                            Applied::AlreadyApplied
                        })
                    }
                    Err(e) => {
                        warn!("[REPLICATION] Dropping spawn {}: {}", piece.id, e);
                        Application::dropped()
                    }
                }
            }
            GameMessage::DespawnPiece { id } => {
                if !envelope.from_authority {
                    warn!("[REPLICATION] Dropping despawn {} from non-authority {}", id, envelope.sender);
                    return Application::dropped();
                }
                let id = PieceId(*id);
                self.ledger.despawn(id);
                Application::only(match game.despawn_piece(id) {
                    Some(_) => Applied::Despawned(id),
                    None => Applied::AlreadyApplied,
                })
            }
        };

        debug!(
            "[REPLICATION] seq {} -> {:?}, board {}",
            envelope.seq,
            application.applied,
            game.board().fingerprint_hex()
        );
        application
    }

    fn apply_move(&mut self, game: &mut ChessGame, from: WireSquare, to: WireSquare) -> Application {
        let (Some(from), Some(to)) = (wire_square(from), wire_square(to)) else {
            return Application::dropped();
        };

        match game.apply_move(from, to) {
            Ok(outcome) => {
                let mut follow_ups = Vec::new();
                if let Some(captured) = outcome.captured() {
                    if self.is_authority {
                        follow_ups.push(GameMessage::DespawnPiece { id: captured.id.0 });
                    }
                }
                Application {
                    applied: Applied::Moved(outcome),
                    follow_ups,
                }
            }
            Err(e) => {
                warn!("[REPLICATION] Dropping move {} -> {}: {}", from, to, e);
                Application::dropped()
            }
        }
    }
}

fn wire_square(square: WireSquare) -> Option<Square> {
    let parsed = Square::from_wire(square);
    if parsed.is_none() {
        warn!("[REPLICATION] Invalid square ({}, {})", square.0, square.1);
    }
    parsed
}

fn spawn_message(piece: &Piece, promotion: bool) -> GameMessage {
    GameMessage::SpawnPiece {
        id: piece.id.0,
        piece_type: piece.kind,
        color: piece.color,
        square: piece.position.to_wire(),
        promotion,
    }
}
