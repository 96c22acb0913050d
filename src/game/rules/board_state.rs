//! Board state representation for move validation
//!
//! `BoardState` is the 8x8 logical grid every participant mirrors. It is plain
//! data (`Copy`), which lets the legality filter simulate a candidate move on a
//! snapshot instead of perturbing the live board and rolling it back.

use crate::game::error::{GameError, GameResult};
use crate::game::types::{Piece, PieceColor, PieceId, PieceType, Square};
use sha2::{Digest, Sha256};

/// Back rank order, file a to file h
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Represents the state of the board for move validation
///
/// Invariant: a square holds at most one piece, and a piece's `position`
/// always equals the square it is stored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoardState {
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Board with the standard starting array already placed
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for piece in standard_setup() {
            // Setup squares are distinct, placement cannot fail
            let _ = board.place(piece);
        }
        board
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares[square.row() as usize][square.col() as usize].as_ref()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn get_piece_color(&self, square: Square) -> Option<PieceColor> {
        self.piece_at(square).map(|piece| piece.color)
    }

    pub fn piece_by_id(&self, id: PieceId) -> Option<&Piece> {
        self.pieces().find(|piece| piece.id == id)
    }

    /// Put a piece on its own `position`. Fails if the square is taken.
    pub fn place(&mut self, piece: Piece) -> GameResult<()> {
        let slot = self.slot_mut(piece.position);
        if slot.is_some() {
            return Err(GameError::SquareOccupied {
                square: piece.position,
            });
        }
        *slot = Some(piece);
        Ok(())
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.slot_mut(square).take()
    }

    /// Move whatever stands on `from` to `to`, returning the displaced occupant
    ///
    /// Updates the mover's `position`; does not touch `has_moved`, so the
    /// legality filter can use it for hypothetical moves.
    pub fn relocate(&mut self, from: Square, to: Square) -> GameResult<Option<Piece>> {
        let mut mover = self.remove(from).ok_or(GameError::PieceNotFound { square: from })?;
        let displaced = self.remove(to);
        mover.position = to;
        *self.slot_mut(to) = Some(mover);
        Ok(displaced)
    }

    /// Mutable access to a piece for in-place metadata updates
    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.slot_mut(square).as_mut()
    }

    pub fn king_square(&self, color: PieceColor) -> Option<Square> {
        self.pieces()
            .find(|piece| piece.kind == PieceType::King && piece.color == color)
            .map(|piece| piece.position)
    }

    /// All pieces in row-major order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().flatten()
    }

    pub fn pieces_of(&self, color: PieceColor) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.color == color)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Next unused piece id: one past the highest id on the board
    ///
    /// Depends only on board contents, so every mirror allocates the same id
    /// for a promoted piece.
    pub fn next_piece_id(&self, floor: PieceId) -> PieceId {
        let highest = self.pieces().map(|piece| piece.id.0 + 1).max().unwrap_or(0);
        PieceId(highest.max(floor.0))
    }

    /// SHA-256 over a canonical encoding of every square
    ///
    /// Two mirrors that applied the same ordered message stream produce the
    /// same fingerprint. Only used for diagnostics.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for square in Square::all() {
            match self.piece_at(square) {
                Some(piece) => {
                    hasher.update([
                        1,
                        piece.kind as u8,
                        piece.color as u8,
                        piece.has_moved as u8,
                    ]);
                    hasher.update(piece.id.0.to_be_bytes());
                }
                None => hasher.update([0]),
            }
        }
        hasher.finalize().into()
    }

    /// Short hex prefix of [`fingerprint`](Self::fingerprint) for log lines
    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint()[..6]
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }

    fn slot_mut(&mut self, square: Square) -> &mut Option<Piece> {
        &mut self.squares[square.row() as usize][square.col() as usize]
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..8u8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8u8 {
                let symbol = Square::new(row, col)
                    .and_then(|square| self.piece_at(square))
                    .map(|piece| piece.kind.symbol(piece.color))
                    .unwrap_or('.');
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  abcdefgh")
    }
}

/// The 32 pieces of the standard array, ids 0..32
///
/// White first (pawns, then back rank), then Black in the same order. The
/// authority replays this list as spawn messages at game start.
pub fn standard_setup() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);
    for color in [PieceColor::White, PieceColor::Black] {
        for col in 0..8u8 {
            pieces.push((PieceType::Pawn, color, color.pawn_rank(), col));
        }
        for (col, kind) in BACK_RANK.iter().enumerate() {
            pieces.push((*kind, color, color.back_rank(), col as u8));
        }
    }

    pieces
        .into_iter()
        .enumerate()
        .filter_map(|(id, (kind, color, row, col))| {
            Square::new(row, col).map(|square| Piece::new(PieceId(id as u32), kind, color, square))
        })
        .collect()
}
