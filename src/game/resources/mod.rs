//! Game state owned by the state machine
//!
//! - [`TurnState`] / [`TurnPhase`] - whose turn it is and where we are in it
//! - [`PendingPromotion`] - pawn waiting for a promotion choice
//! - [`CapturedPieces`] - per color and kind capture tally
//! - [`GameOverState`] - checkmate and forfeit results

pub mod captured;
pub mod game_over;
pub mod promotion;
pub mod turn;

pub use captured::CapturedPieces;
pub use game_over::GameOverState;
pub use promotion::{PendingPromotion, PromotionRequest};
pub use turn::{turn_status_text, TurnPhase, TurnState};
