//! Chess rules module - Pure game logic without networking or presentation
//!
//! # Module Structure
//!
//! - `board_state` - 8x8 logical board and the standard starting array
//! - `piece_moves` - Pseudo-legal movement rules for each piece type
//! - `legality` - Legal-move filter, check and checkmate detection
//!
//! Not implemented: castling, en passant, and draw detection (stalemate,
//! repetition, fifty-move rule).

pub mod board_state;
pub mod legality;
pub mod piece_moves;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use board_state::{standard_setup, BoardState};
pub use legality::{has_any_legal_move, is_checkmate, is_in_check, is_legal_move, legal_moves};
pub use piece_moves::{is_promotion_square, pseudo_legal_moves};
