//! Pawn promotion tracking
//!
//! When a pawn reaches the far rank the game suspends: the turn does not
//! advance and no move is accepted from either side until a promotion for
//! that square arrives. There is no timeout.

use crate::game::types::{PieceColor, PieceId, Square};

/// The pawn waiting to be promoted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionRequest {
    pub pawn: PieceId,
    pub square: Square,
    pub color: PieceColor,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingPromotion {
    request: Option<PromotionRequest>,
}

impl PendingPromotion {
    pub fn start(&mut self, pawn: PieceId, square: Square, color: PieceColor) {
        self.request = Some(PromotionRequest { pawn, square, color });
    }

    /// Clear and return the pending request
    pub fn take(&mut self) -> Option<PromotionRequest> {
        self.request.take()
    }

    pub fn clear(&mut self) {
        self.request = None;
    }

    pub fn is_active(&self) -> bool {
        self.request.is_some()
    }

    pub fn request(&self) -> Option<&PromotionRequest> {
        self.request.as_ref()
    }
}
