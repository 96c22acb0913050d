//! Types shared between the chess client library and the relay server
//!
//! Everything in this crate crosses the wire, so it stays free of game logic:
//! piece identity enums, the promotion choice, and the message protocol in
//! [`protocol`].

use serde::{Deserialize, Serialize};

pub mod protocol;

/// Board coordinate as it travels on the wire: `(row, col)`, both in `0..8`.
///
/// Receivers must validate the range before using it; see
/// `netchess::game::types::Square::from_wire`.
pub type WireSquare = (u8, u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Row index of this color's back rank.
    pub fn back_rank(self) -> u8 {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 7,
        }
    }

    /// Row index of the rank where this color's pawns promote.
    pub fn promotion_rank(self) -> u8 {
        self.opponent().back_rank()
    }

    /// Row index where this color's pawns start.
    pub fn pawn_rank(self) -> u8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => 6,
        }
    }

    /// Row delta of a pawn step toward the opponent's back rank.
    pub fn forward(self) -> i8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }
}

impl std::fmt::Display for PieceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceColor::White => f.write_str("White"),
            PieceColor::Black => f.write_str("Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Single-letter symbol, uppercase for White and lowercase for Black.
    pub fn symbol(self, color: PieceColor) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match color {
            PieceColor::White => c.to_ascii_uppercase(),
            PieceColor::Black => c,
        }
    }
}

/// Pieces a pawn may be promoted to.
///
/// Kept separate from [`PieceType`] so that a promotion message can never name
/// a pawn or a king.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub fn piece_type(self) -> PieceType {
        match self {
            PromotionPiece::Queen => PieceType::Queen,
            PromotionPiece::Rook => PieceType::Rook,
            PromotionPiece::Bishop => PieceType::Bishop,
            PromotionPiece::Knight => PieceType::Knight,
        }
    }
}

impl TryFrom<PieceType> for PromotionPiece {
    type Error = PieceType;

    fn try_from(value: PieceType) -> Result<Self, Self::Error> {
        match value {
            PieceType::Queen => Ok(PromotionPiece::Queen),
            PieceType::Rook => Ok(PromotionPiece::Rook),
            PieceType::Bishop => Ok(PromotionPiece::Bishop),
            PieceType::Knight => Ok(PromotionPiece::Knight),
            other => Err(other),
        }
    }
}
