//! Test suite for chess move generation and check detection
//!
//! Tests all piece movement rules and board state queries using pure
//! functions. No networking or session machinery is involved.
//!
//! # Test Organization
//!
//! - `test_board_state_*` - BoardState query and mutation operations
//! - `test_pawn_*` - Pawn movement (forward, double-move, capture)
//! - `test_knight_*` - Knight L-shaped movement
//! - `test_bishop_*` / `test_rook_*` / `test_queen_*` - Ray casting and blocking
//! - `test_king_*` - King single-square movement
//! - `test_check_*` / `test_checkmate_*` - Check and checkmate detection
//! - `test_legal_*` - Legality filter behaviour

use super::*;
use crate::game::types::{Piece, PieceColor, PieceId, PieceType, Square};

/// Helper function to create a test board state from piece definitions
///
/// Takes a list of (piece_type, color, (row, col)) tuples; ids follow list
/// order.
fn create_test_board(pieces: &[(PieceType, PieceColor, (u8, u8))]) -> BoardState {
    let mut board = BoardState::empty();
    for (i, &(piece_type, color, (row, col))) in pieces.iter().enumerate() {
        let piece = Piece::new(PieceId(i as u32), piece_type, color, sq(row, col));
        board.place(piece).expect("test squares must be distinct");
    }
    board
}

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col).expect("test square must be on the board")
}

fn moves_from(board: &BoardState, row: u8, col: u8) -> Vec<Square> {
    let piece = board.piece_at(sq(row, col)).expect("piece expected");
    pseudo_legal_moves(piece, board)
}

fn legal_from(board: &BoardState, row: u8, col: u8) -> Vec<Square> {
    let piece = board.piece_at(sq(row, col)).expect("piece expected");
    legal_moves(piece, board)
}

// ============================================================================
// Board State Tests
// ============================================================================

#[test]
fn test_board_state_is_empty() {
    //! Verifies that BoardState correctly identifies empty squares
    let board = create_test_board(&[(PieceType::Pawn, PieceColor::White, (3, 3))]);

    assert!(board.is_empty(sq(2, 2)), "Adjacent square should be empty");
    assert!(!board.is_empty(sq(3, 3)), "Square with piece should not be empty");
    assert!(board.is_empty(sq(7, 7)), "Far corner should be empty");
}

#[test]
fn test_board_state_standard_setup() {
    //! Checks the 32-piece starting array and its back rank order
    let board = BoardState::standard();
    assert_eq!(board.piece_count(), 32);
    assert_eq!(board.pieces_of(PieceColor::White).count(), 16);
    assert_eq!(board.pieces_of(PieceColor::Black).count(), 16);

    let expected = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];
    for (col, kind) in expected.iter().enumerate() {
        let white = board.piece_at(sq(0, col as u8)).unwrap();
        let black = board.piece_at(sq(7, col as u8)).unwrap();
        assert_eq!((white.kind, white.color), (*kind, PieceColor::White));
        assert_eq!((black.kind, black.color), (*kind, PieceColor::Black));
        assert_eq!(board.piece_at(sq(1, col as u8)).unwrap().kind, PieceType::Pawn);
        assert_eq!(board.piece_at(sq(6, col as u8)).unwrap().kind, PieceType::Pawn);
    }

    assert_eq!(board.king_square(PieceColor::White), Some(sq(0, 4)));
    assert_eq!(board.king_square(PieceColor::Black), Some(sq(7, 4)));
}

#[test]
fn test_board_state_place_rejects_occupied() {
    let mut board = create_test_board(&[(PieceType::Rook, PieceColor::White, (0, 0))]);
    let intruder = Piece::new(PieceId(9), PieceType::Knight, PieceColor::Black, sq(0, 0));
    assert!(board.place(intruder).is_err());
    assert_eq!(board.piece_at(sq(0, 0)).unwrap().kind, PieceType::Rook);
}

#[test]
fn test_board_state_relocate_and_inverse() {
    //! Applying a move and then its inverse restores the prior board
    //!
    //! Move the piece back and put the captured piece back where it stood.
    let original = create_test_board(&[
        (PieceType::Rook, PieceColor::White, (0, 0)),
        (PieceType::Knight, PieceColor::Black, (0, 5)),
        (PieceType::King, PieceColor::White, (7, 7)),
    ]);

    let mut board = original;
    let displaced = board.relocate(sq(0, 0), sq(0, 5)).unwrap();
    assert_eq!(displaced.map(|p| p.kind), Some(PieceType::Knight));
    assert_eq!(board.piece_at(sq(0, 5)).unwrap().position, sq(0, 5));
    assert_ne!(board, original);

    board.relocate(sq(0, 5), sq(0, 0)).unwrap();
    board.place(displaced.unwrap()).unwrap();
    assert_eq!(board, original);
    assert_eq!(board.fingerprint(), original.fingerprint());
}

#[test]
fn test_board_state_fingerprint_tracks_changes() {
    let a = BoardState::standard();
    let mut b = BoardState::standard();
    assert_eq!(a.fingerprint(), b.fingerprint());

    b.relocate(sq(1, 4), sq(3, 4)).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_board_state_next_piece_id() {
    let board = BoardState::standard();
    assert_eq!(board.next_piece_id(PieceId(0)), PieceId(32));
    assert_eq!(board.next_piece_id(PieceId(40)), PieceId(40));
    assert_eq!(BoardState::empty().next_piece_id(PieceId(0)), PieceId(0));
}

// ============================================================================
// Pawn Movement Tests
// ============================================================================

#[test]
fn test_pawn_single_and_double_from_start() {
    //! Pawns on their starting rank may advance one or two squares
    let board = create_test_board(&[
        (PieceType::Pawn, PieceColor::White, (1, 4)),
        (PieceType::Pawn, PieceColor::Black, (6, 3)),
    ]);

    let white = moves_from(&board, 1, 4);
    assert_eq!(white, vec![sq(2, 4), sq(3, 4)]);

    let black = moves_from(&board, 6, 3);
    assert_eq!(black, vec![sq(5, 3), sq(4, 3)], "Black pawns move toward row 0");
}

#[test]
fn test_pawn_no_double_step_off_start_rank() {
    let board = create_test_board(&[(PieceType::Pawn, PieceColor::White, (2, 4))]);
    assert_eq!(moves_from(&board, 2, 4), vec![sq(3, 4)]);
}

#[test]
fn test_pawn_blocked_by_piece() {
    //! Verifies pawns cannot move through other pieces
    //!
    //! A piece directly in front blocks both the single and the double step;
    //! a piece two squares ahead blocks only the double step.
    let blocked = create_test_board(&[
        (PieceType::Pawn, PieceColor::White, (1, 2)),
        (PieceType::Pawn, PieceColor::Black, (2, 2)),
    ]);
    assert!(moves_from(&blocked, 1, 2).is_empty());

    let far_blocked = create_test_board(&[
        (PieceType::Pawn, PieceColor::White, (1, 2)),
        (PieceType::Knight, PieceColor::White, (3, 2)),
    ]);
    assert_eq!(moves_from(&far_blocked, 1, 2), vec![sq(2, 2)]);
}

#[test]
fn test_pawn_captures_diagonally_only_enemies() {
    let board = create_test_board(&[
        (PieceType::Pawn, PieceColor::White, (3, 3)),
        (PieceType::Knight, PieceColor::Black, (4, 4)),
        (PieceType::Knight, PieceColor::White, (4, 2)),
    ]);

    let moves = moves_from(&board, 3, 3);
    assert!(moves.contains(&sq(4, 4)), "Enemy on the diagonal can be captured");
    assert!(!moves.contains(&sq(4, 2)), "Friendly piece on the diagonal cannot");
    assert!(moves.contains(&sq(4, 3)));
    assert_eq!(moves.len(), 2);
}

#[test]
fn test_pawn_cannot_capture_forward() {
    let board = create_test_board(&[
        (PieceType::Pawn, PieceColor::White, (3, 3)),
        (PieceType::Pawn, PieceColor::Black, (4, 3)),
    ]);
    assert!(moves_from(&board, 3, 3).is_empty());
}

#[test]
fn test_pawn_on_edge_file() {
    let board = create_test_board(&[
        (PieceType::Pawn, PieceColor::Black, (6, 0)),
        (PieceType::Rook, PieceColor::White, (5, 1)),
    ]);
    assert_eq!(moves_from(&board, 6, 0), vec![sq(5, 0), sq(4, 0), sq(5, 1)]);
}

// ============================================================================
// Knight Movement Tests
// ============================================================================

#[test]
fn test_knight_l_shaped_movement() {
    //! A centralised knight reaches all eight L-shaped targets
    let board = create_test_board(&[(PieceType::Knight, PieceColor::White, (3, 3))]);
    let moves = moves_from(&board, 3, 3);
    assert_eq!(moves.len(), 8);
    for target in [(5, 4), (5, 2), (1, 4), (1, 2), (4, 5), (4, 1), (2, 5), (2, 1)] {
        assert!(moves.contains(&sq(target.0, target.1)), "missing {:?}", target);
    }
}

#[test]
fn test_knight_corner_and_jumps() {
    //! Knights jump over pieces but never land on friendly ones
    let board = create_test_board(&[
        (PieceType::Knight, PieceColor::White, (0, 1)),
        (PieceType::Pawn, PieceColor::White, (1, 1)),
        (PieceType::Pawn, PieceColor::White, (2, 0)),
        (PieceType::Pawn, PieceColor::Black, (2, 2)),
    ]);
    let moves = moves_from(&board, 0, 1);
    assert_eq!(moves.len(), 2);
    assert!(moves.contains(&sq(2, 2)), "Enemy square is a capture");
    assert!(moves.contains(&sq(1, 3)));
}

// ============================================================================
// Sliding Piece Tests
// ============================================================================

#[test]
fn test_bishop_open_board() {
    let board = create_test_board(&[(PieceType::Bishop, PieceColor::White, (3, 3))]);
    assert_eq!(moves_from(&board, 3, 3).len(), 13);
}

#[test]
fn test_bishop_friendly_blocker_hides_enemy() {
    //! Friendly piece one step away, enemy two steps away on the same diagonal
    //!
    //! The ray must stop at the friendly piece without adding it, so it never
    //! reaches the enemy.
    let board = create_test_board(&[
        (PieceType::Bishop, PieceColor::White, (2, 2)),
        (PieceType::Pawn, PieceColor::White, (3, 3)),
        (PieceType::Knight, PieceColor::Black, (4, 4)),
        (PieceType::King, PieceColor::White, (0, 7)),
        (PieceType::King, PieceColor::Black, (7, 0)),
    ]);

    let moves = legal_from(&board, 2, 2);
    let up_right: Vec<_> = moves
        .iter()
        .filter(|s| s.row() > 2 && s.col() > 2)
        .collect();
    assert!(up_right.is_empty(), "Direction must be empty, got {:?}", up_right);
    assert!(!moves.contains(&sq(4, 4)));
}

#[test]
fn test_rook_capture_ends_ray() {
    let board = create_test_board(&[
        (PieceType::Rook, PieceColor::White, (3, 3)),
        (PieceType::Pawn, PieceColor::Black, (3, 5)),
    ]);
    let moves = moves_from(&board, 3, 3);
    assert!(moves.contains(&sq(3, 4)));
    assert!(moves.contains(&sq(3, 5)), "Enemy square is the ray's last entry");
    assert!(!moves.contains(&sq(3, 6)));
    assert_eq!(moves.len(), 12);
}

#[test]
fn test_rook_surrounded_has_no_moves() {
    //! A piece surrounded by friendly pieces has no moves
    let board = create_test_board(&[
        (PieceType::Rook, PieceColor::White, (4, 4)),
        (PieceType::Pawn, PieceColor::White, (4, 5)),
        (PieceType::Pawn, PieceColor::White, (4, 3)),
        (PieceType::Pawn, PieceColor::White, (5, 4)),
        (PieceType::Pawn, PieceColor::White, (3, 4)),
    ]);
    assert!(moves_from(&board, 4, 4).is_empty());
}

#[test]
fn test_queen_combines_rook_and_bishop() {
    let board = create_test_board(&[(PieceType::Queen, PieceColor::Black, (3, 3))]);
    assert_eq!(moves_from(&board, 3, 3).len(), 27);
}

#[test]
fn test_queen_complex_board() {
    //! Queen captures an enemy rook, cannot jump friendly or enemy pieces
    let board = create_test_board(&[
        (PieceType::Queen, PieceColor::White, (3, 3)),
        (PieceType::Pawn, PieceColor::White, (4, 4)),
        (PieceType::Rook, PieceColor::Black, (3, 6)),
        (PieceType::Bishop, PieceColor::Black, (6, 6)),
    ]);
    let moves = moves_from(&board, 3, 3);
    assert!(moves.contains(&sq(3, 6)));
    assert!(!moves.contains(&sq(3, 7)));
    assert!(!moves.contains(&sq(4, 4)));
    assert!(!moves.contains(&sq(5, 5)));
}

// ============================================================================
// King Movement Tests
// ============================================================================

#[test]
fn test_king_single_step() {
    let board = create_test_board(&[(PieceType::King, PieceColor::White, (0, 4))]);
    let moves = moves_from(&board, 0, 4);
    assert_eq!(moves.len(), 5);
    assert!(!moves.contains(&sq(0, 6)), "No castling");
    assert!(!moves.contains(&sq(0, 2)), "No castling");
}

// ============================================================================
// Generic Properties
// ============================================================================

#[test]
fn test_pseudo_legal_never_targets_own_pieces() {
    //! Over a handful of positions, no generated square holds a friendly piece
    let mut positions = vec![BoardState::standard()];
    let mut opened = BoardState::standard();
    opened.relocate(sq(1, 4), sq(3, 4)).unwrap();
    opened.relocate(sq(6, 3), sq(4, 3)).unwrap();
    opened.relocate(sq(0, 6), sq(2, 5)).unwrap();
    positions.push(opened);
    positions.push(create_test_board(&[
        (PieceType::Queen, PieceColor::White, (0, 0)),
        (PieceType::Knight, PieceColor::White, (7, 7)),
        (PieceType::King, PieceColor::Black, (4, 4)),
        (PieceType::Pawn, PieceColor::Black, (1, 1)),
    ]));

    for board in &positions {
        for piece in board.pieces() {
            for target in pseudo_legal_moves(piece, board) {
                assert_ne!(board.get_piece_color(target), Some(piece.color));
                assert_ne!(target, piece.position);
            }
        }
    }
}

#[test]
fn test_standard_position_move_counts() {
    //! Twenty legal moves per side from the starting array
    let board = BoardState::standard();
    for color in [PieceColor::White, PieceColor::Black] {
        let total: usize = board
            .pieces_of(color)
            .map(|piece| legal_moves(piece, &board).len())
            .sum();
        assert_eq!(total, 20, "{:?} should have 20 moves", color);
    }
}

// ============================================================================
// Check and Checkmate Tests
// ============================================================================

#[test]
fn test_check_rook_on_open_rank() {
    //! White king on e1, black rook on a1, nothing in between
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Rook, PieceColor::Black, (0, 0)),
        (PieceType::King, PieceColor::Black, (7, 7)),
    ]);
    assert!(is_in_check(PieceColor::White, &board));
    assert!(!is_in_check(PieceColor::Black, &board));
    assert!(!is_checkmate(PieceColor::White, &board), "King can step off the rank");
}

#[test]
fn test_check_blocked_by_piece() {
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Rook, PieceColor::Black, (0, 0)),
        (PieceType::Knight, PieceColor::White, (0, 1)),
        (PieceType::King, PieceColor::Black, (7, 7)),
    ]);
    assert!(!is_in_check(PieceColor::White, &board));
}

#[test]
fn test_checkmate_king_boxed_in_by_own_pieces() {
    //! Back-rank mate: king hemmed in by its own pieces, no block or capture
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Bishop, PieceColor::White, (0, 5)),
        (PieceType::Pawn, PieceColor::White, (1, 3)),
        (PieceType::Pawn, PieceColor::White, (1, 4)),
        (PieceType::Pawn, PieceColor::White, (1, 5)),
        (PieceType::Rook, PieceColor::Black, (0, 0)),
        (PieceType::King, PieceColor::Black, (7, 7)),
    ]);
    assert!(is_in_check(PieceColor::White, &board));
    assert!(!has_any_legal_move(PieceColor::White, &board));
    assert!(is_checkmate(PieceColor::White, &board));
}

#[test]
fn test_checkmate_averted_by_capture() {
    //! Same box, but a white rook can take the checking rook
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Bishop, PieceColor::White, (0, 5)),
        (PieceType::Pawn, PieceColor::White, (1, 3)),
        (PieceType::Pawn, PieceColor::White, (1, 4)),
        (PieceType::Pawn, PieceColor::White, (1, 5)),
        (PieceType::Rook, PieceColor::Black, (0, 0)),
        (PieceType::Rook, PieceColor::White, (5, 0)),
        (PieceType::King, PieceColor::Black, (7, 7)),
    ]);
    assert!(is_in_check(PieceColor::White, &board));
    assert!(!is_checkmate(PieceColor::White, &board));
    assert_eq!(legal_from(&board, 5, 0), vec![sq(0, 0)], "Only the capture resolves check");
}

#[test]
fn test_checkmate_implies_check() {
    //! Not in check means not checkmated, even with zero legal moves
    let board = create_test_board(&[
        (PieceType::King, PieceColor::Black, (7, 0)),
        (PieceType::Queen, PieceColor::White, (5, 1)),
        (PieceType::King, PieceColor::White, (0, 7)),
    ]);
    assert!(!is_in_check(PieceColor::Black, &board));
    assert!(!has_any_legal_move(PieceColor::Black, &board));
    assert!(!is_checkmate(PieceColor::Black, &board));
}

// ============================================================================
// Legality Filter Tests
// ============================================================================

#[test]
fn test_legal_moves_side_effect_free() {
    //! The board before and after a legality query is identical
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Rook, PieceColor::White, (1, 4)),
        (PieceType::Rook, PieceColor::Black, (7, 4)),
        (PieceType::Knight, PieceColor::Black, (2, 3)),
        (PieceType::King, PieceColor::Black, (7, 7)),
    ]);
    let before = board;
    for piece in board.pieces() {
        let _ = legal_moves(piece, &board);
    }
    let _ = is_checkmate(PieceColor::White, &board);
    assert_eq!(board, before);
    assert_eq!(board.fingerprint(), before.fingerprint());
}

#[test]
fn test_legal_pinned_piece_stays_on_line() {
    //! A rook pinned on the e-file may only move along the file
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Rook, PieceColor::White, (2, 4)),
        (PieceType::Rook, PieceColor::Black, (7, 4)),
        (PieceType::King, PieceColor::Black, (7, 0)),
    ]);
    let moves = legal_from(&board, 2, 4);
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|s| s.col() == 4), "Pinned rook left the file: {:?}", moves);
    assert!(moves.contains(&sq(7, 4)), "Capturing the pinning rook is legal");
}

#[test]
fn test_legal_king_cannot_step_into_attack() {
    let board = create_test_board(&[
        (PieceType::King, PieceColor::White, (0, 4)),
        (PieceType::Rook, PieceColor::Black, (1, 0)),
        (PieceType::King, PieceColor::Black, (7, 7)),
    ]);
    let moves = legal_from(&board, 0, 4);
    assert!(moves.iter().all(|s| s.row() == 0), "Row 1 is covered by the rook");
    assert_eq!(moves.len(), 2);
}

#[test]
fn test_is_legal_move_matches_legal_moves() {
    let board = BoardState::standard();
    let pawn = *board.piece_at(sq(1, 4)).unwrap();
    assert!(is_legal_move(&pawn, sq(3, 4), &board));
    assert!(!is_legal_move(&pawn, sq(4, 4), &board));
}

#[test]
fn test_promotion_square() {
    assert!(is_promotion_square(PieceType::Pawn, PieceColor::White, sq(7, 0)));
    assert!(is_promotion_square(PieceType::Pawn, PieceColor::Black, sq(0, 5)));
    assert!(!is_promotion_square(PieceType::Pawn, PieceColor::White, sq(0, 5)));
    assert!(!is_promotion_square(PieceType::Queen, PieceColor::White, sq(7, 0)));
}
