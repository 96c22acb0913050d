//! Chess game logic - rules, state machine and session
//!
//! Headless: nothing here draws, polls input or owns a socket. Presentation
//! and transport are collaborators injected into [`session::GameSession`].
//!
//! # Module Organization
//!
//! - `types` - Square, PieceId and Piece
//! - `rules` - Pure chess logic (pseudo-legal moves, legality, check, checkmate)
//! - `resources` - Turn, promotion, capture tally and game-over state
//! - `controller` - `ChessGame`, the deterministic turn/game state machine
//! - `events` - Events the state machine queues for presentation
//! - `view` - `GameView` presentation collaborator
//! - `session` - `GameSession`, one participant's wiring of all of the above
//! - `error` - `GameError`

pub mod controller;
pub mod error;
pub mod events;
pub mod resources;
pub mod rules;
pub mod session;
pub mod types;
pub mod view;

pub use controller::{ChessGame, MoveOutcome};
pub use error::{GameError, GameResult};
pub use events::{GameEvent, HighlightKind};
pub use session::GameSession;
pub use view::{GameView, LogView, NullView};
