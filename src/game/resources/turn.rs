//! Turn tracking and turn-phase state machine
//!
//! `TurnState` combines whose turn it is with where we are inside that turn.
//! The color flips only after a completed move; a pending promotion holds the
//! turn until the promotion is applied.

use crate::game::types::PieceColor;
use tracing::error;

/// Phase within the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnPhase {
    /// Waiting for the side to move to pick a piece
    #[default]
    AwaitingSelection,
    /// A piece is selected and its legal targets are highlighted
    AwaitingMoveConfirmation,
    /// A pawn reached the far rank; nothing moves until it is promoted
    PromotionPending,
    /// Terminal
    GameOver,
}

impl TurnPhase {
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            TurnPhase::AwaitingSelection | TurnPhase::AwaitingMoveConfirmation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    /// Color to move
    pub current: PieceColor,
    /// Completed moves since the start of the game
    pub ply: u32,
    /// Full-move number, incremented after Black moves
    pub move_number: u32,
    pub phase: TurnPhase,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            current: PieceColor::White,
            ply: 0,
            move_number: 1,
            phase: TurnPhase::AwaitingSelection,
        }
    }
}

impl TurnState {
    /// Move to `next` if the transition is allowed
    ///
    /// Returns `false` and leaves the phase untouched otherwise. `GameOver`
    /// is terminal.
    pub fn transition_to(&mut self, next: TurnPhase) -> bool {
        let valid = match (self.phase, next) {
            (TurnPhase::GameOver, _) => false,
            (_, TurnPhase::GameOver) => true,
            (TurnPhase::AwaitingSelection, TurnPhase::AwaitingMoveConfirmation) => true,
            (TurnPhase::AwaitingMoveConfirmation, TurnPhase::AwaitingMoveConfirmation) => true,
            (TurnPhase::AwaitingMoveConfirmation, TurnPhase::AwaitingSelection) => true,
            (TurnPhase::AwaitingSelection, TurnPhase::AwaitingSelection) => true,
            (TurnPhase::AwaitingSelection, TurnPhase::PromotionPending) => true,
            (TurnPhase::AwaitingMoveConfirmation, TurnPhase::PromotionPending) => true,
            (TurnPhase::PromotionPending, TurnPhase::AwaitingSelection) => true,
            _ => false,
        };

        if !valid {
            error!(
                "[TURN_STATE] Invalid turn state transition: {:?} -> {:?}",
                self.phase, next
            );
            return false;
        }

        self.phase = next;
        true
    }

    /// Hand the move to the other side after a completed move
    pub fn switch_turn(&mut self) {
        self.current = match self.current {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => {
                self.move_number += 1;
                PieceColor::White
            }
        };
        self.ply += 1;
        self.phase = TurnPhase::AwaitingSelection;
    }

    /// Status line shown to the participant playing `local`
    pub fn status_text(&self, local: PieceColor) -> String {
        turn_status_text(self.current, local)
    }
}

/// "Your turn (White)" or "Opponent's turn (Black)"
pub fn turn_status_text(turn: PieceColor, local: PieceColor) -> String {
    if turn == local {
        format!("Your turn ({turn})")
    } else {
        format!("Opponent's turn ({turn})")
    }
}
