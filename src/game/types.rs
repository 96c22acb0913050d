//! Type definitions for chess game logic
//!
//! Provides the coordinate and piece types the rule engine and state machine
//! work with. Wire-level enums (`PieceColor`, `PieceType`, `PromotionPiece`)
//! live in the `shared` crate and are re-exported here.

use serde::{Deserialize, Serialize};
use shared::WireSquare;

pub use shared::{PieceColor, PieceType, PromotionPiece};

/// Board square position (row, col)
///
/// Row 0 is White's back rank, row 7 is Black's. Column 0 is file 'a'.
/// A `Square` is always on the board: every constructor rejects coordinates
/// outside `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Create a square, returning `None` when the coordinate is off the board
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netchess::game::types::Square;
    /// assert!(Square::new(1, 4).is_some()); // e2
    /// assert!(Square::new(8, 0).is_none());
    /// ```
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Signed-coordinate constructor used by the move generators
    pub fn from_signed(row: i8, col: i8) -> Option<Self> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Validate a coordinate received from the network
    pub fn from_wire((row, col): WireSquare) -> Option<Self> {
        Square::new(row, col)
    }

    pub fn to_wire(self) -> WireSquare {
        (self.row, self.col)
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// Square displaced by `(dr, dc)`, or `None` if that leaves the board
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Square::from_signed(self.row as i8 + dr, self.col as i8 + dc)
    }

    /// Index into a row-major 64 element array
    pub fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Create a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?;
        let rank = chars.next()?.to_digit(10)?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Square::new(rank as u8 - 1, file as u8 - b'a')
    }

    /// Iterate over all 64 squares in row-major order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

/// Stable identity of a piece across moves
///
/// Allocated by the authority during setup and derived deterministically for
/// promotions, so every participant refers to the same piece by the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece on the logical board
///
/// Mutated in place when it moves; removed from the board when captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceType,
    pub color: PieceColor,
    pub position: Square,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceType, color: PieceColor, position: Square) -> Self {
        Self {
            id,
            kind,
            color,
            position,
            has_moved: false,
        }
    }
}
