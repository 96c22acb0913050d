//! Game Flow Integration Tests
//!
//! Two participants sharing a `LocalHub`, driven only through the input
//! interface. Covers:
//! - Authority setup and mirrored boards
//! - Turn gating of input
//! - Checkmate and promotion across mirrors
//! - Presence (leaving and opponent departure)

use netchess::game::resources::GameOverState;
use netchess::game::types::{PieceColor, PieceType, PromotionPiece, Square};
use netchess::game::{GameSession, GameView, HighlightKind};
use netchess::game::view::AnchorHandle;
use netchess::networking::LocalHub;
use parking_lot::Mutex;
use std::sync::Arc;

/// What a participant's view was asked to show
#[derive(Default)]
struct Seen {
    highlights: Vec<(Square, HighlightKind)>,
    promotion_prompts: Vec<PieceColor>,
    statuses: Vec<String>,
    outcomes: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedView(Arc<Mutex<Seen>>);

impl GameView for SharedView {
    fn highlight(&mut self, square: Square, _anchor: AnchorHandle, kind: HighlightKind) {
        self.0.lock().highlights.push((square, kind));
    }

    fn clear_highlights(&mut self) {
        self.0.lock().highlights.clear();
    }

    fn promotion_requested(&mut self, color: PieceColor) {
        self.0.lock().promotion_prompts.push(color);
    }

    fn turn_changed(&mut self, _turn: PieceColor, status: &str) {
        self.0.lock().statuses.push(status.to_string());
    }

    fn game_over(&mut self, _result: GameOverState, outcome: &str) {
        self.0.lock().outcomes.push(outcome.to_string());
    }
}

struct Table {
    _hub: LocalHub,
    white: GameSession,
    black: GameSession,
    white_seen: SharedView,
    black_seen: SharedView,
}

/// Two started sessions with the standard setup replicated to both
fn new_table() -> Table {
    let hub = LocalHub::new();
    let white_seen = SharedView::default();
    let black_seen = SharedView::default();
    let mut white = GameSession::new(
        Box::new(hub.join(true)),
        Box::new(white_seen.clone()),
        PieceColor::White,
        true,
    );
    let mut black = GameSession::new(
        Box::new(hub.join(false)),
        Box::new(black_seen.clone()),
        PieceColor::Black,
        false,
    );
    white.start().unwrap();
    black.start().unwrap();

    let mut table = Table {
        _hub: hub,
        white,
        black,
        white_seen,
        black_seen,
    };
    table.settle();
    table
}

impl Table {
    fn settle(&mut self) {
        while self.white.pump() + self.black.pump() > 0 {}
    }

    fn session(&mut self, color: PieceColor) -> &mut GameSession {
        match color {
            PieceColor::White => &mut self.white,
            PieceColor::Black => &mut self.black,
        }
    }

    /// Click the piece on `from`, then the `to` tile, then deliver everything
    fn play(&mut self, color: PieceColor, from: &str, to: &str) {
        let from = sq(from);
        let session = self.session(color);
        let piece = session
            .game()
            .board()
            .piece_at(from)
            .unwrap_or_else(|| panic!("no piece on {from}"))
            .id;
        session.piece_clicked(piece);
        session.tile_clicked(sq(to));
        self.settle();
    }

    fn assert_mirrored(&self) {
        assert_eq!(
            self.white.game().board().fingerprint(),
            self.black.game().board().fingerprint(),
            "participants disagree on the board"
        );
        assert_eq!(self.white.game().current_turn(), self.black.game().current_turn());
    }
}

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

// ============================================================================
// Setup
// ============================================================================

#[test]
fn test_authority_setup_reaches_both_participants() {
    let table = new_table();

    assert_eq!(table.white.game().board().piece_count(), 32);
    assert_eq!(table.black.game().board().piece_count(), 32);
    assert_eq!(table.white.replicator().ledger().alive_count(), 32);
    assert_eq!(table.black.replicator().ledger().alive_count(), 32);
    table.assert_mirrored();

    assert!(table.white.is_authority());
    assert!(!table.black.is_authority());
    assert_eq!(table.white.status_text(), "Your turn (White)");
    assert_eq!(table.black.status_text(), "Opponent's turn (White)");
}

// ============================================================================
// Input Gating
// ============================================================================

#[test]
fn test_selection_highlights_targets() {
    let mut table = new_table();
    let knight = table.white.game().board().piece_at(sq("g1")).unwrap().id;

    table.white.piece_clicked(knight);

    let selection = table.white.selection().expect("knight should be selected");
    assert_eq!(selection.from, sq("g1"));
    assert_eq!(selection.targets.len(), 2);

    let seen = table.white_seen.0.lock();
    assert!(seen.highlights.contains(&(sq("g1"), HighlightKind::Selected)));
    assert!(seen.highlights.contains(&(sq("f3"), HighlightKind::Normal)));
    assert!(seen.highlights.contains(&(sq("h3"), HighlightKind::Normal)));
}

#[test]
fn test_moves_are_applied_only_through_the_ordered_stream() {
    let mut table = new_table();
    let pawn = table.white.game().board().piece_at(sq("e2")).unwrap().id;

    table.white.piece_clicked(pawn);
    table.white.tile_clicked(sq("e4"));
    assert!(
        table.white.game().board().piece_at(sq("e2")).is_some(),
        "sender must wait for the echoed move"
    );

    table.settle();
    assert!(table.white.game().board().piece_at(sq("e4")).is_some());
    assert!(table.black.game().board().piece_at(sq("e4")).is_some());
    assert_eq!(table.white.game().current_turn(), PieceColor::Black);
    table.assert_mirrored();
}

#[test]
fn test_out_of_turn_clicks_are_ignored() {
    let mut table = new_table();
    let pawn = table.black.game().board().piece_at(sq("e7")).unwrap().id;

    table.black.piece_clicked(pawn);
    assert!(table.black.selection().is_none());

    table.black.tile_clicked(sq("e5"));
    table.settle();
    assert!(table.black.game().board().piece_at(sq("e7")).is_some());
    assert_eq!(table.black.game().current_turn(), PieceColor::White);
}

#[test]
fn test_clicking_a_non_target_clears_selection() {
    let mut table = new_table();
    let pawn = table.white.game().board().piece_at(sq("d2")).unwrap().id;

    table.white.piece_clicked(pawn);
    table.white.tile_clicked(sq("d5"));
    table.settle();

    assert!(table.white.selection().is_none());
    assert!(table.white.game().board().piece_at(sq("d2")).is_some());
    assert_eq!(table.white.game().turn().ply, 0);
}

// ============================================================================
// Full Games
// ============================================================================

#[test]
fn test_fools_mate_ends_the_game_on_both_sides() {
    let mut table = new_table();

    table.play(PieceColor::White, "f2", "f3");
    table.play(PieceColor::Black, "e7", "e5");
    table.play(PieceColor::White, "g2", "g4");
    table.play(PieceColor::Black, "d8", "h4");

    table.assert_mirrored();
    assert_eq!(table.white.game().game_over(), GameOverState::BlackWon);
    assert_eq!(table.black.game().game_over(), GameOverState::BlackWon);
    assert_eq!(table.white.status_text(), "You lose!");
    assert_eq!(table.black.status_text(), "You win!");
    assert_eq!(table.white_seen.0.lock().outcomes, vec!["You lose!".to_string()]);
    assert_eq!(table.black_seen.0.lock().outcomes, vec!["You win!".to_string()]);

    // Input after the end is ignored
    let pawn = table.white.game().board().piece_at(sq("a2")).unwrap().id;
    table.white.piece_clicked(pawn);
    assert!(table.white.selection().is_none());
}

#[test]
fn test_capture_is_mirrored_and_counted() {
    let mut table = new_table();

    table.play(PieceColor::White, "e2", "e4");
    table.play(PieceColor::Black, "d7", "d5");
    table.play(PieceColor::White, "e4", "d5");

    table.assert_mirrored();
    for session in [&table.white, &table.black] {
        assert_eq!(session.game().board().piece_count(), 31);
        assert_eq!(session.game().captured().count(PieceColor::Black, PieceType::Pawn), 1);
        assert_eq!(session.replicator().ledger().alive_count(), 31);
    }
}

#[test]
fn test_promotion_prompts_only_the_mover() {
    let mut table = new_table();

    table.play(PieceColor::White, "a2", "a4");
    table.play(PieceColor::Black, "b7", "b5");
    table.play(PieceColor::White, "a4", "b5");
    table.play(PieceColor::Black, "a7", "a6");
    table.play(PieceColor::White, "b5", "a6");
    table.play(PieceColor::Black, "c8", "b7");
    table.play(PieceColor::White, "a6", "b7");
    table.play(PieceColor::Black, "h7", "h6");
    table.play(PieceColor::White, "b7", "a8");

    assert!(table.white.awaiting_promotion_choice());
    assert!(!table.black.awaiting_promotion_choice());
    assert_eq!(table.white_seen.0.lock().promotion_prompts, vec![PieceColor::White]);
    assert!(table.black_seen.0.lock().promotion_prompts.is_empty());
    assert!(table.black.game().pending_promotion().is_active());

    // Nobody moves while the choice is outstanding
    let pawn = table.black.game().board().piece_at(sq("g7")).unwrap().id;
    table.black.piece_clicked(pawn);
    assert!(table.black.selection().is_none());

    table.white.promotion_chosen(PromotionPiece::Queen);
    table.settle();

    table.assert_mirrored();
    for session in [&table.white, &table.black] {
        let queen = session.game().board().piece_at(sq("a8")).unwrap();
        assert_eq!(queen.kind, PieceType::Queen);
        assert_eq!(queen.color, PieceColor::White);
        assert!(!session.game().pending_promotion().is_active());
        assert_eq!(session.game().current_turn(), PieceColor::Black);
    }
    assert_eq!(
        table.white.game().board().piece_at(sq("a8")).unwrap().id,
        table.black.game().board().piece_at(sq("a8")).unwrap().id,
        "promoted piece must get the same id everywhere"
    );
    assert!(!table.white.awaiting_promotion_choice());
}

// ============================================================================
// Presence
// ============================================================================

#[test]
fn test_leaving_loses_and_opponent_wins() {
    let mut table = new_table();
    table.play(PieceColor::White, "e2", "e4");

    table.black.leave();
    assert_eq!(table.black.status_text(), "You lose!");
    assert_eq!(table.black.game().game_over(), GameOverState::WhiteWonByForfeit);

    table.settle();
    assert_eq!(table.white.status_text(), "You win!");
    assert!(table.white.game().game_over().is_forfeit());
    assert_eq!(table.white_seen.0.lock().outcomes, vec!["You win!".to_string()]);
}

#[test]
fn test_departure_after_checkmate_keeps_the_result() {
    let mut table = new_table();
    table.play(PieceColor::White, "f2", "f3");
    table.play(PieceColor::Black, "e7", "e5");
    table.play(PieceColor::White, "g2", "g4");
    table.play(PieceColor::Black, "d8", "h4");

    table.black.leave();
    table.settle();

    assert_eq!(table.white.game().game_over(), GameOverState::BlackWon);
    assert_eq!(table.white.status_text(), "You lose!");
}

#[test]
fn test_status_follows_turns() {
    let mut table = new_table();
    table.play(PieceColor::White, "e2", "e4");

    assert_eq!(table.white.status_text(), "Opponent's turn (Black)");
    assert_eq!(table.black.status_text(), "Your turn (Black)");
    assert_eq!(
        table.black_seen.0.lock().statuses.last().map(String::as_str),
        Some("Your turn (Black)")
    );
}
