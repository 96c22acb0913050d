//! Error types for game module
//!
//! Every rejection the rule engine or state machine can produce. None of these
//! are fatal: callers log them and carry on as if the input never arrived.

use crate::game::types::{PieceColor, PieceId, Square};

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Coordinate outside the 8x8 board
    #[error("Invalid square ({row}, {col})")]
    InvalidSquare { row: u8, col: u8 },

    /// Piece not found at expected position
    #[error("Piece not found at {square}")]
    PieceNotFound { square: Square },

    /// Piece id does not exist on the board
    #[error("Unknown piece {id}")]
    UnknownPiece { id: PieceId },

    /// Piece of the side not on move
    #[error("It is not {color}'s turn")]
    NotYourTurn { color: PieceColor },

    /// Target square is not in the piece's legal-move set
    #[error("Illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// Moves are suspended until the pending promotion is resolved
    #[error("A pawn promotion is pending")]
    PromotionPending,

    /// Promotion received while nothing is pending
    #[error("No promotion is pending")]
    NoPendingPromotion,

    /// Promotion names a different square than the pending one
    #[error("Promotion square {square} does not match the pending promotion")]
    PromotionMismatch { square: Square },

    /// Square already holds a piece
    #[error("Square {square} is occupied")]
    SquareOccupied { square: Square },

    /// The game has ended; state is frozen
    #[error("The game is over")]
    GameOver,
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
