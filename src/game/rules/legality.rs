//! Legal-move filtering, check and checkmate detection
//!
//! Each candidate move is simulated on a copy of the board. The caller's board
//! is only ever borrowed immutably, so there is no rollback to get wrong and
//! candidates could be evaluated in parallel.

use super::board_state::BoardState;
use super::piece_moves::pseudo_legal_moves;
use crate::game::types::{Piece, PieceColor, Square};
use tracing::{trace, warn};

/// Pseudo-legal moves of `piece` that do not leave its own king in check
pub fn legal_moves(piece: &Piece, board: &BoardState) -> Vec<Square> {
    pseudo_legal_moves(piece, board)
        .into_iter()
        .filter(|&target| {
            let legal = !leaves_king_in_check(piece, target, board);
            trace!(
                "[RULES] {:?} {:?} {} -> {}: {}",
                piece.color,
                piece.kind,
                piece.position,
                target,
                if legal { "legal" } else { "exposes king" }
            );
            legal
        })
        .collect()
}

/// Whether `target` is a legal destination for `piece`
pub fn is_legal_move(piece: &Piece, target: Square, board: &BoardState) -> bool {
    pseudo_legal_moves(piece, board).contains(&target) && !leaves_king_in_check(piece, target, board)
}

fn leaves_king_in_check(piece: &Piece, target: Square, board: &BoardState) -> bool {
    let mut snapshot = *board;
    if snapshot.relocate(piece.position, target).is_err() {
        // Piece is not where it claims to be; nothing sensible to simulate
        return true;
    }
    is_in_check(piece.color, &snapshot)
}

/// `color` is in check iff some opposing piece's pseudo-legal set contains
/// its king's square
pub fn is_in_check(color: PieceColor, board: &BoardState) -> bool {
    let Some(king) = board.king_square(color) else {
        warn!("[RULES] No {:?} king on the board, treating as not in check", color);
        return false;
    };

    is_square_attacked(king, color.opponent(), board)
}

/// Whether any piece of `attacker` can reach `square` pseudo-legally
pub fn is_square_attacked(square: Square, attacker: PieceColor, board: &BoardState) -> bool {
    board
        .pieces_of(attacker)
        .any(|piece| pseudo_legal_moves(piece, board).contains(&square))
}

/// Whether any piece of `color` has at least one legal move
pub fn has_any_legal_move(color: PieceColor, board: &BoardState) -> bool {
    board
        .pieces_of(color)
        .any(|piece| !legal_moves(piece, board).is_empty())
}

/// In check and no legal move anywhere
pub fn is_checkmate(color: PieceColor, board: &BoardState) -> bool {
    is_in_check(color, board) && !has_any_legal_move(color, board)
}
