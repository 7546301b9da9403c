//! Core engine for an 8×8 block-placement puzzle.
//!
//! This crate owns the value types exchanged with planners and front ends:
//!
//! - [`Board`] — 8×8 occupancy grid with value semantics (every
//!   transformation returns a new board)
//! - [`Piece`] — a polyomino trimmed to its minimal bounding box
//! - [`canonical_pieces`] — the process-wide catalog of piece shapes
//! - [`PlacementResult`] — outcome of [`Board::place`], including the
//!   pre-clear board and the cleared-line descriptors that animation-facing
//!   consumers need
//!
//! Placement is all-or-nothing: a single out-of-bounds or overlapping cell
//! rejects the whole placement with [`PlacementError`].

pub use self::core::*;

pub mod core;

/// Why a placement was rejected. Both variants mean "try another cell",
/// never a fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("placement lands outside the board")]
    OutOfBounds,
    #[display("placement overlaps an occupied cell")]
    Overlap,
}
