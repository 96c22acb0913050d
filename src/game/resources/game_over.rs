//! Game over state tracking and result management
//!
//! A game ends in one of two ways: checkmate, detected after a completed
//! move, or forfeit, forced by the presence layer when a participant leaves.
//! Draws are not detected.

use crate::game::types::PieceColor;
use serde::{Deserialize, Serialize};

/// The game's end state
///
/// Starts as `Playing`. Every other state is terminal: once set, the board is
/// frozen and no further moves or promotions are accepted.
///
/// ```text
/// Playing → WhiteWon / BlackWon / WhiteWonByForfeit / BlackWonByForfeit
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverState {
    #[default]
    Playing,
    /// Black is checkmated
    WhiteWon,
    /// White is checkmated
    BlackWon,
    /// Black left the session
    WhiteWonByForfeit,
    /// White left the session
    BlackWonByForfeit,
}

impl GameOverState {
    /// Result of `loser` being checkmated
    pub fn checkmate(loser: PieceColor) -> Self {
        match loser {
            PieceColor::White => GameOverState::BlackWon,
            PieceColor::Black => GameOverState::WhiteWon,
        }
    }

    /// Result of `loser` leaving the session
    pub fn forfeit(loser: PieceColor) -> Self {
        match loser {
            PieceColor::White => GameOverState::BlackWonByForfeit,
            PieceColor::Black => GameOverState::WhiteWonByForfeit,
        }
    }

    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameOverState::Playing)
    }

    pub fn is_forfeit(&self) -> bool {
        matches!(
            self,
            GameOverState::WhiteWonByForfeit | GameOverState::BlackWonByForfeit
        )
    }

    pub fn winner(&self) -> Option<PieceColor> {
        match self {
            GameOverState::WhiteWon | GameOverState::WhiteWonByForfeit => Some(PieceColor::White),
            GameOverState::BlackWon | GameOverState::BlackWonByForfeit => Some(PieceColor::Black),
            GameOverState::Playing => None,
        }
    }

    /// Human-readable description of the result
    pub fn message(&self) -> &'static str {
        match self {
            GameOverState::Playing => "Game in progress",
            GameOverState::WhiteWon => "White wins by checkmate!",
            GameOverState::BlackWon => "Black wins by checkmate!",
            GameOverState::WhiteWonByForfeit => "White wins, Black left the game",
            GameOverState::BlackWonByForfeit => "Black wins, White left the game",
        }
    }

    /// Result as seen from the participant playing `local`
    pub fn outcome_for(&self, local: PieceColor) -> &'static str {
        match self.winner() {
            None => "Game in progress",
            Some(winner) if winner == local => "You win!",
            Some(_) => "You lose!",
        }
    }
}

impl std::fmt::Display for GameOverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
