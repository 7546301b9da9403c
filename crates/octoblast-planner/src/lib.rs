//! Move-sequence planner for the 8×8 block-placement puzzle.
//!
//! Given a board and a batch of three pieces, the planner chooses an
//! ordering and a position for each piece that maximizes long-run board
//! health: line clears now, survivability later.
//!
//! # Architecture
//!
//! ```text
//! Trio Selection (rank candidate sequences)        selector
//!     ↓ uses
//! Rollout Evaluation (estimate future value)       rollout
//!     ↓ uses
//! Sequence Search (enumerate batch orderings)      search
//!     ↓ uses
//! Board Scoring (score one resulting board)        scorer, board_metrics
//! ```
//!
//! [`BoardScorer`] computes a weighted sum of board sub-metrics
//! ([`BoardMetrics`]). [`generate_sequences`] explores piece orderings and
//! positions breadth-first with a greedy short-circuit and an exploration
//! cap. [`rollout()`] estimates a board's future potential by greedily
//! playing random catalog pieces. [`TrioPlanner::best_trio`] combines
//! immediate line clears with averaged rollouts and returns the winning
//! [`Sequence`], or `None` when no legal full assignment exists.
//!
//! Everything here is pure, synchronous and CPU-bound; boards are `Copy`
//! values, so candidate ranking parallelizes freely. Randomness enters only
//! through the `rng` arguments, which makes planning reproducible under a
//! seeded generator.

pub use self::{board_metrics::*, rollout::*, scorer::*, search::*, selector::*};

pub mod board_metrics;
pub mod rollout;
pub mod scorer;
pub mod search;
pub mod selector;

use octoblast_engine::BOARD_SIZE;

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const SIDE: i32 = BOARD_SIZE as i32;
