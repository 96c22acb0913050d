//! Turn / game state machine
//!
//! `ChessGame` is the logical game every participant mirrors. It only changes
//! in response to protocol messages (moves, promotions, spawns) and is fully
//! deterministic: two mirrors fed the same ordered messages end up with
//! identical boards, turns and results. Rejections are returned as
//! [`GameError`] and leave the state untouched, so an invalid message is
//! dropped the same way everywhere.
//!
//! # Move sequence
//!
//! ```text
//! apply_move ─ capture tally ─┬─ pawn on far rank ─ PromotionPending ─ apply_promotion ─┐
//!                             └──────────────────────────────────────────────────────────┴─ finish_turn
//! finish_turn: flip turn ─ check? ─ checkmate? ─ GameOver
//! ```

use crate::game::error::{GameError, GameResult};
use crate::game::events::GameEvent;
use crate::game::resources::{
    CapturedPieces, GameOverState, PendingPromotion, TurnPhase, TurnState,
};
use crate::game::rules::{
    is_checkmate, is_in_check, is_legal_move, is_promotion_square, legal_moves, BoardState,
};
use crate::game::types::{Piece, PieceColor, PieceId, PromotionPiece, Square};
use tracing::{debug, info, warn};

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Turn advanced and check was evaluated
    Completed { captured: Option<Piece> },
    /// Pawn reached the far rank; the game waits for a promotion choice
    PromotionPending {
        square: Square,
        color: PieceColor,
        captured: Option<Piece>,
    },
}

impl MoveOutcome {
    pub fn captured(&self) -> Option<&Piece> {
        match self {
            MoveOutcome::Completed { captured } => captured.as_ref(),
            MoveOutcome::PromotionPending { captured, .. } => captured.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChessGame {
    board: BoardState,
    turn: TurnState,
    game_over: GameOverState,
    pending_promotion: PendingPromotion,
    captured: CapturedPieces,
    check: Option<(PieceColor, Square)>,
    /// One past the highest piece id ever allocated
    id_floor: PieceId,
    events: Vec<GameEvent>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    /// Empty board, White to move; pieces arrive as spawn messages
    pub fn new() -> Self {
        Self::from_board(BoardState::empty(), PieceColor::White)
    }

    /// Standard starting array already on the board
    pub fn standard() -> Self {
        Self::from_board(BoardState::standard(), PieceColor::White)
    }

    /// Start from an arbitrary position with `to_move` on move
    pub fn from_board(board: BoardState, to_move: PieceColor) -> Self {
        let id_floor = board.next_piece_id(PieceId(0));
        Self {
            board,
            turn: TurnState {
                current: to_move,
                ..TurnState::default()
            },
            game_over: GameOverState::Playing,
            pending_promotion: PendingPromotion::default(),
            captured: CapturedPieces::default(),
            check: None,
            id_floor,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn current_turn(&self) -> PieceColor {
        self.turn.current
    }

    pub fn game_over(&self) -> GameOverState {
        self.game_over
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_game_over()
    }

    pub fn pending_promotion(&self) -> &PendingPromotion {
        &self.pending_promotion
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    /// Side currently in check and its king's square
    pub fn check(&self) -> Option<(PieceColor, Square)> {
        self.check
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Legal targets of the piece on `square`, for highlighting
    pub fn legal_targets(&self, square: Square) -> GameResult<Vec<Square>> {
        let piece = self
            .board
            .piece_at(square)
            .ok_or(GameError::PieceNotFound { square })?;
        Ok(legal_moves(piece, &self.board))
    }

    /// Record that the local player picked up or put down a piece
    pub fn set_selecting(&mut self, selecting: bool) {
        let next = if selecting {
            TurnPhase::AwaitingMoveConfirmation
        } else {
            TurnPhase::AwaitingSelection
        };
        if self.turn.phase.accepts_input() {
            self.turn.transition_to(next);
        }
    }

    /// Apply a move from `from` to `to`
    ///
    /// Rejected without side effects when the game is over, a promotion is
    /// pending, `from` is empty, the piece is not the side to move, or `to`
    /// is not among its legal moves.
    pub fn apply_move(&mut self, from: Square, to: Square) -> GameResult<MoveOutcome> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if self.pending_promotion.is_active() {
            return Err(GameError::PromotionPending);
        }

        let piece = *self
            .board
            .piece_at(from)
            .ok_or(GameError::PieceNotFound { square: from })?;

        if piece.color != self.turn.current {
            return Err(GameError::NotYourTurn { color: piece.color });
        }
        if !is_legal_move(&piece, to, &self.board) {
            return Err(GameError::IllegalMove { from, to });
        }

        let captured = self.board.relocate(from, to)?;
        if let Some(moved) = self.board.piece_at_mut(to) {
            moved.has_moved = true;
        }

        info!(
            "[MOVE] {} {:?} {} -> {}{}",
            piece.color,
            piece.kind,
            from,
            to,
            captured
                .map(|c| format!(" captures {} {:?}", c.color, c.kind))
                .unwrap_or_default()
        );

        self.events.push(GameEvent::ClearHighlights);
        self.check = None;

        if let Some(taken) = captured {
            if let Some(count) = self.captured.add_capture(taken.color, taken.kind) {
                self.events.push(GameEvent::CapturedCountChanged {
                    color: taken.color,
                    kind: taken.kind,
                    count,
                });
            }
        }

        if is_promotion_square(piece.kind, piece.color, to) {
            info!("[PROMOTION] {} pawn on {} awaits promotion", piece.color, to);
            self.pending_promotion.start(piece.id, to, piece.color);
            if self.turn.phase != TurnPhase::PromotionPending {
                self.turn.transition_to(TurnPhase::PromotionPending);
            }
            return Ok(MoveOutcome::PromotionPending {
                square: to,
                color: piece.color,
                captured,
            });
        }

        self.finish_turn();
        Ok(MoveOutcome::Completed { captured })
    }

    /// Replace the pending pawn with `choice` and resume the turn
    ///
    /// The new piece's id depends only on mirrored state, so every
    /// participant allocates the same one.
    pub fn apply_promotion(&mut self, square: Square, choice: PromotionPiece) -> GameResult<PieceId> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        let request = *self
            .pending_promotion
            .request()
            .ok_or(GameError::NoPendingPromotion)?;
        if request.square != square {
            return Err(GameError::PromotionMismatch { square });
        }
        match self.board.piece_at(square) {
            Some(pawn) if pawn.id == request.pawn => {}
            _ => return Err(GameError::PieceNotFound { square }),
        }

        let id = self.board.next_piece_id(self.id_floor);
        self.board.remove(square);
        let mut promoted = Piece::new(id, choice.piece_type(), request.color, square);
        promoted.has_moved = true;
        self.board.place(promoted)?;
        self.id_floor = PieceId(id.0 + 1);
        self.pending_promotion.clear();
        self.turn.transition_to(TurnPhase::AwaitingSelection);

        info!(
            "[PROMOTION] {} pawn {} on {} promoted to {:?} {}",
            request.color, request.pawn, square, choice, id
        );

        self.finish_turn();
        Ok(id)
    }

    /// Place a replicated piece
    ///
    /// Returns `Ok(false)` when the same piece is already there, which is how
    /// the authority's follow-up spawns for promotions land on mirrors that
    /// already derived the piece themselves.
    pub fn spawn_piece(&mut self, piece: Piece) -> GameResult<bool> {
        if let Some(existing) = self.board.piece_at(piece.position) {
            if existing.id == piece.id && existing.kind == piece.kind && existing.color == piece.color {
                return Ok(false);
            }
            return Err(GameError::SquareOccupied {
                square: piece.position,
            });
        }
        if self.board.piece_by_id(piece.id).is_some() {
            warn!("[GAME] Spawn of {} ignored, already on the board elsewhere", piece.id);
            return Ok(false);
        }

        self.board.place(piece)?;
        self.id_floor = PieceId(self.id_floor.0.max(piece.id.0 + 1));
        debug!("[GAME] Spawned {} {:?} {} on {}", piece.color, piece.kind, piece.id, piece.position);
        Ok(true)
    }

    /// Remove a replicated piece if it is still on the board
    ///
    /// Captured pieces and promoted pawns are already gone by the time the
    /// authority's despawn arrives, so `None` is the usual answer.
    pub fn despawn_piece(&mut self, id: PieceId) -> Option<Piece> {
        let square = self.board.piece_by_id(id)?.position;
        let removed = self.board.remove(square);
        if removed.is_some() {
            debug!("[GAME] Despawned {} from {}", id, square);
        }
        removed
    }

    /// End the game because `loser` left; no-op if already over
    pub fn forfeit(&mut self, loser: PieceColor) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.pending_promotion.clear();
        self.end(GameOverState::forfeit(loser));
        true
    }

    fn finish_turn(&mut self) {
        self.turn.switch_turn();
        let color = self.turn.current;
        self.events.push(GameEvent::TurnChanged { turn: color });

        if !is_in_check(color, &self.board) {
            return;
        }
        let Some(king) = self.board.king_square(color) else {
            return;
        };

        info!("[GAME] {} king on {} is in check", color, king);
        self.check = Some((color, king));
        self.events.push(GameEvent::Check { color, king });

        if is_checkmate(color, &self.board) {
            info!("[GAME] ========== CHECKMATE! ==========");
            self.end(GameOverState::checkmate(color));
        }
    }

    fn end(&mut self, result: GameOverState) {
        self.game_over = result;
        self.turn.transition_to(TurnPhase::GameOver);
        info!("[GAME] {} - Move #{}", result.message(), self.turn.move_number);
        self.events.push(GameEvent::GameOver(result));
    }
}
