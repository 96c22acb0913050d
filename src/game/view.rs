//! Presentation collaborator interface
//!
//! Rendering, highlight prefabs and UI panels live outside the core. The
//! session talks to them only through [`GameView`], injected at construction.
//! Every method has a no-op default so a view implements only what it shows.

use crate::game::events::{GameEvent, HighlightKind};
use crate::game::resources::{turn_status_text, GameOverState};
use crate::game::types::{PieceColor, PieceType, Square};
use tracing::info;

/// Opaque presentation handle for a square's world position
///
/// The core obtains it from the view and hands it straight back; it never
/// interprets the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(pub u64);

pub trait GameView {
    fn square_anchor(&self, square: Square) -> AnchorHandle {
        AnchorHandle(square.index() as u64)
    }

    fn highlight(&mut self, _square: Square, _anchor: AnchorHandle, _kind: HighlightKind) {}

    fn clear_highlights(&mut self) {}

    fn captured_count_changed(&mut self, _color: PieceColor, _kind: PieceType, _count: u32) {}

    /// Ask the local player which piece their pawn becomes
    fn promotion_requested(&mut self, _color: PieceColor) {}

    fn turn_changed(&mut self, _turn: PieceColor, _status: &str) {}

    fn session_started(&mut self, _local: PieceColor, _authority: bool) {}

    fn game_over(&mut self, _result: GameOverState, _outcome: &str) {}
}

/// Forward one state-machine event to the view
pub fn dispatch(view: &mut dyn GameView, event: &GameEvent, local: PieceColor) {
    match event {
        GameEvent::ClearHighlights => view.clear_highlights(),
        GameEvent::Highlight { square, kind } => {
            let anchor = view.square_anchor(*square);
            view.highlight(*square, anchor, *kind);
        }
        GameEvent::CapturedCountChanged { color, kind, count } => {
            view.captured_count_changed(*color, *kind, *count)
        }
        GameEvent::TurnChanged { turn } => {
            view.turn_changed(*turn, &turn_status_text(*turn, local))
        }
        GameEvent::Check { king, .. } => {
            let anchor = view.square_anchor(*king);
            view.highlight(*king, anchor, HighlightKind::Check);
        }
        GameEvent::GameOver(result) => view.game_over(*result, result.outcome_for(local)),
    }
}

/// View that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl GameView for NullView {}

/// Headless view that reports presentation calls through `tracing`
#[derive(Debug, Clone)]
pub struct LogView {
    label: String,
}

impl LogView {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl GameView for LogView {
    fn captured_count_changed(&mut self, color: PieceColor, kind: PieceType, count: u32) {
        info!("[VIEW] {}: captured {} {:?}: {}", self.label, color, kind, count);
    }

    fn promotion_requested(&mut self, color: PieceColor) {
        info!("[VIEW] {}: choose a promotion piece for {}", self.label, color);
    }

    fn turn_changed(&mut self, _turn: PieceColor, status: &str) {
        info!("[VIEW] {}: {}", self.label, status);
    }

    fn session_started(&mut self, local: PieceColor, authority: bool) {
        info!(
            "[VIEW] {}: playing {}{}",
            self.label,
            local,
            if authority { " (authority)" } else { "" }
        );
    }

    fn game_over(&mut self, result: GameOverState, outcome: &str) {
        info!("[VIEW] {}: {} {}", self.label, result, outcome);
    }
}
