//! Game session - the participant-side context
//!
//! A `GameSession` is built once per game and owns everything one
//! participant needs: its `ChessGame` mirror, the `Replicator`, and the
//! injected transport and view. Input events come in through
//! [`piece_clicked`](GameSession::piece_clicked),
//! [`tile_clicked`](GameSession::tile_clicked) and
//! [`promotion_chosen`](GameSession::promotion_chosen); none of them touch
//! the board directly. They only send messages, and the board changes when
//! [`pump`](GameSession::pump) applies the ordered stream coming back.
//!
//! # Presence
//!
//! The opponent leaving (or our link dropping) wins the game for the local
//! player. Leaving ourselves loses it. Both are final.

use crate::game::controller::{ChessGame, MoveOutcome};
use crate::game::events::HighlightKind;
use crate::game::resources::TurnPhase;
use crate::game::types::{PieceColor, PieceId, PromotionPiece, Square};
use crate::game::view::{dispatch, GameView};
use crate::networking::replication::{Applied, Replicator};
use crate::networking::transport::{Transport, TransportEvent};
use crate::networking::NetworkResult;
use shared::protocol::GameMessage;
use tracing::{debug, info, warn};

/// The locally selected piece and where it may go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub piece: PieceId,
    pub from: Square,
    pub targets: Vec<Square>,
}

pub struct GameSession {
    game: ChessGame,
    replicator: Replicator,
    transport: Box<dyn Transport>,
    view: Box<dyn GameView>,
    local_color: PieceColor,
    selection: Option<Selection>,
    awaiting_promotion_choice: bool,
}

impl GameSession {
    pub fn new(
        transport: Box<dyn Transport>,
        view: Box<dyn GameView>,
        local_color: PieceColor,
        is_authority: bool,
    ) -> Self {
        let replicator = Replicator::new(transport.peer_id(), is_authority);
        Self {
            game: ChessGame::new(),
            replicator,
            transport,
            view,
            local_color,
            selection: None,
            awaiting_promotion_choice: false,
        }
    }

    pub fn game(&self) -> &ChessGame {
        &self.game
    }

    pub fn local_color(&self) -> PieceColor {
        self.local_color
    }

    pub fn is_authority(&self) -> bool {
        self.replicator.is_authority()
    }

    pub fn replicator(&self) -> &Replicator {
        &self.replicator
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Whether the local player owes a promotion choice
    pub fn awaiting_promotion_choice(&self) -> bool {
        self.awaiting_promotion_choice
    }

    pub fn status_text(&self) -> String {
        if self.game.is_game_over() {
            return self.game.game_over().outcome_for(self.local_color).to_string();
        }
        self.game.turn().status_text(self.local_color)
    }

    /// Announce the session; the authority also broadcasts the standard setup
    pub fn start(&mut self) -> NetworkResult<()> {
        info!(
            "[SESSION] Starting as {}{}",
            self.local_color,
            if self.is_authority() { " (authority)" } else { "" }
        );
        self.view
            .session_started(self.local_color, self.is_authority());
        let turn = self.game.current_turn();
        self.view
            .turn_changed(turn, &self.game.turn().status_text(self.local_color));

        for message in self.replicator.setup_messages() {
            self.transport.send(message)?;
        }
        Ok(())
    }

    /// Input: a piece was clicked
    ///
    /// Selects it if it is ours and it is our turn. Clicking an opposing
    /// piece that the current selection can capture counts as a tile click.
    pub fn piece_clicked(&mut self, id: PieceId) {
        if !self.accepts_input() {
            return;
        }
        let Some(piece) = self.game.board().piece_by_id(id).copied() else {
            warn!("[SESSION] Click on unknown piece {}", id);
            return;
        };

        if piece.color != self.local_color {
            let capturable = self
                .selection
                .as_ref()
                .is_some_and(|selection| selection.targets.contains(&piece.position));
            if capturable {
                self.tile_clicked(piece.position);
            }
            return;
        }
        if piece.color != self.game.current_turn() {
            debug!("[SESSION] Not our turn, ignoring selection of {}", id);
            return;
        }

        let targets = match self.game.legal_targets(piece.position) {
            Ok(targets) => targets,
            Err(e) => {
                warn!("[SESSION] Selection failed: {}", e);
                return;
            }
        };

        self.view.clear_highlights();
        let anchor = self.view.square_anchor(piece.position);
        self.view
            .highlight(piece.position, anchor, HighlightKind::Selected);
        for &target in &targets {
            let kind = if self.game.board().is_empty(target) {
                HighlightKind::Normal
            } else {
                HighlightKind::Capture
            };
            let anchor = self.view.square_anchor(target);
            self.view.highlight(target, anchor, kind);
        }
        self.redraw_check();

        debug!("[SESSION] Selected {} on {} ({} targets)", id, piece.position, targets.len());
        self.selection = Some(Selection {
            piece: id,
            from: piece.position,
            targets,
        });
        self.game.set_selecting(true);
    }

    /// Input: a board square was clicked
    ///
    /// Sends a move if the square is a legal target of the selection;
    /// otherwise drops the selection.
    pub fn tile_clicked(&mut self, square: Square) {
        if !self.accepts_input() {
            return;
        }
        let Some(selection) = self.selection.take() else {
            return;
        };
        self.game.set_selecting(false);
        self.view.clear_highlights();
        self.redraw_check();

        if !selection.targets.contains(&square) {
            debug!("[SESSION] {} is not a target, selection cleared", square);
            return;
        }

        info!("[SESSION] Sending move {} -> {}", selection.from, square);
        let message = GameMessage::Move {
            from: selection.from.to_wire(),
            to: square.to_wire(),
        };
        if let Err(e) = self.transport.send(message) {
            warn!("[SESSION] Failed to send move: {}", e);
        }
    }

    /// Input: the local player picked a promotion piece
    pub fn promotion_chosen(&mut self, choice: PromotionPiece) {
        if !self.awaiting_promotion_choice {
            warn!("[SESSION] Promotion choice {:?} with nothing pending", choice);
            return;
        }
        let Some(square) = self.game.pending_promotion().request().map(|r| r.square) else {
            self.awaiting_promotion_choice = false;
            return;
        };

        info!("[SESSION] Promoting on {} to {:?}", square, choice);
        match self.transport.send(GameMessage::Promote {
            square: square.to_wire(),
            choice,
        }) {
            Ok(()) => self.awaiting_promotion_choice = false,
            Err(e) => warn!("[SESSION] Failed to send promotion: {}", e),
        }
    }

    /// Apply everything the transport delivered; returns the number of events
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.transport.try_recv() {
            handled += 1;
            match event {
                TransportEvent::Message(envelope) => {
                    let application = self.replicator.apply(&mut self.game, &envelope);

                    if let Applied::Moved(outcome) = &application.applied {
                        self.selection = None;
                        if let MoveOutcome::PromotionPending { color, .. } = outcome {
                            if envelope.sender == self.replicator.local_peer() {
                                self.awaiting_promotion_choice = true;
                                self.view.promotion_requested(*color);
                            }
                        }
                    }

                    for message in application.follow_ups {
                        if let Err(e) = self.transport.send(message) {
                            warn!("[SESSION] Failed to send follow-up: {}", e);
                        }
                    }
                }
                TransportEvent::PeerLeft(peer) => {
                    info!("[SESSION] Opponent {} left", peer);
                    self.opponent_left();
                }
                TransportEvent::Disconnected => {
                    warn!("[SESSION] Lost connection to the room");
                    self.opponent_left();
                }
            }
            self.flush_events();
        }
        handled
    }

    /// Presence: the opponent is gone, the local player wins
    pub fn opponent_left(&mut self) {
        self.end_by_forfeit(self.local_color.opponent());
    }

    /// Presence: the local player leaves and loses
    pub fn leave(&mut self) {
        self.end_by_forfeit(self.local_color);
        self.transport.leave();
    }

    fn end_by_forfeit(&mut self, loser: PieceColor) {
        self.selection = None;
        self.awaiting_promotion_choice = false;
        if self.game.forfeit(loser) {
            self.flush_events();
        }
    }

    fn accepts_input(&self) -> bool {
        !self.game.is_game_over() && self.game.turn().phase != TurnPhase::PromotionPending
    }

    fn redraw_check(&mut self) {
        if let Some((_, king)) = self.game.check() {
            let anchor = self.view.square_anchor(king);
            self.view.highlight(king, anchor, HighlightKind::Check);
        }
    }

    fn flush_events(&mut self) {
        for event in self.game.drain_events() {
            dispatch(self.view.as_mut(), &event, self.local_color);
        }
    }
}
