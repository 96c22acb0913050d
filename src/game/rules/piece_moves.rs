//! Chess piece movement rules
//!
//! Pseudo-legal move generation per piece kind. These functions know nothing
//! about check: they only apply the movement pattern and board occupancy.
//! Pure functions with no side effects - easy to test.

use super::board_state::BoardState;
use crate::game::types::{Piece, PieceColor, PieceType, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Get all pseudo-legal target squares for a piece
///
/// Never returns an off-board square or a square held by the mover's own
/// color. May return the opposing king's square; that is what check detection
/// looks for.
pub fn pseudo_legal_moves(piece: &Piece, board: &BoardState) -> Vec<Square> {
    let mut moves = Vec::new();
    let from = piece.position;
    let color = piece.color;

    match piece.kind {
        PieceType::Pawn => pawn_moves(from, color, board, &mut moves),
        PieceType::Knight => step_moves(from, color, &KNIGHT_OFFSETS, board, &mut moves),
        PieceType::Bishop => sliding_moves(from, color, &DIAGONALS, board, &mut moves),
        PieceType::Rook => sliding_moves(from, color, &ORTHOGONALS, board, &mut moves),
        PieceType::Queen => {
            sliding_moves(from, color, &ORTHOGONALS, board, &mut moves);
            sliding_moves(from, color, &DIAGONALS, board, &mut moves);
        }
        PieceType::King => step_moves(from, color, &KING_OFFSETS, board, &mut moves),
    }

    moves
}

/// Pawn: one step forward onto an empty square, two steps from the starting
/// rank when both squares are empty, diagonal steps only onto opposing pieces.
/// No en passant.
fn pawn_moves(from: Square, color: PieceColor, board: &BoardState, moves: &mut Vec<Square>) {
    let direction = color.forward();

    if let Some(one_step) = from.offset(direction, 0) {
        if board.is_empty(one_step) {
            moves.push(one_step);

            if from.row() == color.pawn_rank() {
                if let Some(two_steps) = from.offset(2 * direction, 0) {
                    if board.is_empty(two_steps) {
                        moves.push(two_steps);
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(target) = from.offset(direction, dc) {
            if matches!(board.get_piece_color(target), Some(target_color) if target_color != color) {
                moves.push(target);
            }
        }
    }
}

/// Knight and king: fixed offsets, target must not hold a friendly piece
fn step_moves(
    from: Square,
    color: PieceColor,
    offsets: &[(i8, i8)],
    board: &BoardState,
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in offsets {
        let Some(target) = from.offset(dr, dc) else {
            continue;
        };
        if board.get_piece_color(target) != Some(color) {
            moves.push(target);
        }
    }
}

/// Ray-cast along each direction until the edge or the first occupied square
///
/// The first occupied square is included only when it holds an opposing
/// piece; a friendly blocker ends the ray without being added.
fn sliding_moves(
    from: Square,
    color: PieceColor,
    directions: &[(i8, i8)],
    board: &BoardState,
    moves: &mut Vec<Square>,
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match board.get_piece_color(next) {
                None => moves.push(next),
                Some(occupant) => {
                    if occupant != color {
                        moves.push(next);
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

/// Whether a piece of `kind` and `color` landing on `square` must promote
pub fn is_promotion_square(kind: PieceType, color: PieceColor, square: Square) -> bool {
    kind == PieceType::Pawn && square.row() == color.promotion_rank()
}
