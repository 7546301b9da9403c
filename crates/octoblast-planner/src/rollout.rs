use octoblast_engine::{Board, canonical_pieces};
use rand::{Rng, seq::IndexedRandom as _};

use crate::{scorer::BoardScorer, search::BATCH_SIZE};

/// Rounds of future batches simulated beyond the current one.
pub const FUTURE_ROUNDS: usize = 2;

/// Single-piece placements simulated per rollout.
pub const ROLLOUT_DEPTH: usize = FUTURE_ROUNDS * BATCH_SIZE;

/// Reward per line cleared during the simulation.
const LINE_VALUE: f64 = 5000.0;

/// Estimates a board's future potential with one stochastic forward
/// simulation.
///
/// Draws [`ROLLOUT_DEPTH`] pieces uniformly at random from the canonical
/// catalog; each is placed greedily at its best-scoring position and its
/// score and cleared-line count are accumulated. The simulation stops early
/// when a drawn piece has no legal placement, modelling game over. Returns
/// the accumulated score plus a 5000-point bonus per cleared line.
///
/// Stochastic by construction: results vary with `rng`, so thread a seeded
/// generator for reproducible runs. Termination is always bounded by the
/// fixed depth.
#[expect(clippy::cast_precision_loss)]
pub fn rollout<R>(board: Board, scorer: &BoardScorer, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let mut board = board;
    let mut score = 0.0;
    let mut cleared_lines = 0_usize;
    for _ in 0..ROLLOUT_DEPTH {
        let piece = *canonical_pieces()
            .choose(rng)
            .expect("piece catalog is never empty");
        let Some(placement) = scorer.best_placement(board, piece) else {
            break;
        };
        board = placement.result.board();
        score += placement.score;
        cleared_lines += placement.result.cleared_lines().len();
    }
    score + cleared_lines as f64 * LINE_VALUE
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_rollout_is_deterministic_for_a_fixed_seed() {
        let board = Board::from_ascii(
            "
            ........
            ........
            ........
            ...##...
            ...##...
            ........
            ........
            ########
            ",
        );
        let scorer = BoardScorer::new();
        let a = rollout(board, &scorer, &mut Pcg32::seed_from_u64(42));
        let b = rollout(board, &scorer, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rollout_on_full_board_is_zero() {
        // The first drawn piece fits nowhere, so nothing accumulates
        let full = Board::from_ascii(
            "
            ########
            ########
            ########
            ########
            ########
            ########
            ########
            ########
            ",
        );
        let scorer = BoardScorer::new();
        assert_eq!(rollout(full, &scorer, &mut Pcg32::seed_from_u64(7)), 0.0);
    }

    #[test]
    fn test_rollout_is_finite() {
        let scorer = BoardScorer::new();
        for seed in 0..4 {
            let value = rollout(Board::EMPTY, &scorer, &mut Pcg32::seed_from_u64(seed));
            assert!(value.is_finite());
        }
    }
}
