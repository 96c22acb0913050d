//! Captured pieces tally
//!
//! Counts captured pieces per (color, kind) so the capture-count display can
//! be told the running total after each capture. Kings are never counted:
//! checkmate ends the game before a king could be taken.
//!
//! # Material Values
//!
//! Standard piece values in pawns:
//! - Pawn: 1
//! - Knight/Bishop: 3
//! - Rook: 5
//! - Queen: 9
//!
//! Positive advantage means White is ahead, negative means Black is ahead.

use crate::game::types::{PieceColor, PieceType};

/// Per-color, per-kind capture counters
///
/// Indexed by the color of the piece that was *lost*, so
/// `count(Black, Queen)` is how many black queens White has taken.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapturedPieces {
    counts: [[u32; 6]; 2],
}

impl CapturedPieces {
    /// Record a capture and return the new count for that (color, kind)
    ///
    /// Returns `None` for a king, which is exempt from the tally.
    ///
    /// ```rust
    /// use netchess::game::resources::CapturedPieces;
    /// use netchess::game::types::{PieceColor, PieceType};
    ///
    /// let mut captured = CapturedPieces::default();
    /// assert_eq!(captured.add_capture(PieceColor::Black, PieceType::Pawn), Some(1));
    /// assert_eq!(captured.add_capture(PieceColor::Black, PieceType::King), None);
    /// ```
    pub fn add_capture(&mut self, captured_color: PieceColor, kind: PieceType) -> Option<u32> {
        if kind == PieceType::King {
            return None;
        }
        let slot = &mut self.counts[color_index(captured_color)][kind as usize];
        *slot += 1;
        Some(*slot)
    }

    pub fn count(&self, captured_color: PieceColor, kind: PieceType) -> u32 {
        self.counts[color_index(captured_color)][kind as usize]
    }

    /// Total number of `captured_color` pieces taken so far
    pub fn total(&self, captured_color: PieceColor) -> u32 {
        self.counts[color_index(captured_color)].iter().sum()
    }

    /// Material difference in pawn units, positive when White is ahead
    pub fn material_advantage(&self) -> i32 {
        self.material_lost(PieceColor::Black) - self.material_lost(PieceColor::White)
    }

    fn material_lost(&self, color: PieceColor) -> i32 {
        PieceType::ALL
            .iter()
            .map(|&kind| self.count(color, kind) as i32 * piece_value(kind))
            .sum()
    }

    pub fn clear(&mut self) {
        self.counts = [[0; 6]; 2];
    }
}

fn color_index(color: PieceColor) -> usize {
    match color {
        PieceColor::White => 0,
        PieceColor::Black => 1,
    }
}

fn piece_value(kind: PieceType) -> i32 {
    match kind {
        PieceType::Pawn => 1,
        PieceType::Knight => 3,
        PieceType::Bishop => 3,
        PieceType::Rook => 5,
        PieceType::Queen => 9,
        PieceType::King => 0,
    }
}
