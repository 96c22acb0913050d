//! Events emitted by the game state machine
//!
//! `ChessGame` never talks to presentation directly. It queues `GameEvent`s
//! that the session drains after every applied message and forwards to the
//! injected [`GameView`](crate::game::view::GameView).

use crate::game::resources::GameOverState;
use crate::game::types::{PieceColor, PieceType, Square};
use serde::{Deserialize, Serialize};

/// Highlight flavour requested from the board presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightKind {
    /// Empty square the selected piece may move to
    Normal,
    /// Square holding an opposing piece the selection may capture
    Capture,
    /// Square of the selected piece itself
    Selected,
    /// King of the side in check
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ClearHighlights,
    Highlight {
        square: Square,
        kind: HighlightKind,
    },
    /// Running total of `color`'s pieces of `kind` that have been captured
    CapturedCountChanged {
        color: PieceColor,
        kind: PieceType,
        count: u32,
    },
    TurnChanged {
        turn: PieceColor,
    },
    Check {
        color: PieceColor,
        king: Square,
    },
    GameOver(GameOverState),
}
