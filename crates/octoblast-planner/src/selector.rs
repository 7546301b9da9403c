use octoblast_engine::{Board, Piece};
use octoblast_stats::descriptive::DescriptiveStats;
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use rayon::prelude::*;

use crate::{
    rollout::rollout,
    scorer::{BoardScorer, ScoreWeights},
    search::{BATCH_SIZE, Sequence, generate_sequences},
};

/// Independent rollouts averaged per candidate sequence.
pub const ROLLOUTS: usize = 25;

/// Reward per line cleared inside the candidate sequence itself. Dwarfs any
/// rollout estimate, so immediate clears always outrank speculative ones.
const LINE_CLEAR_REWARD: f64 = 1_000_000.0;

/// Plans whole batches: searches for candidate sequences and ranks them by
/// immediate line clears plus estimated future value.
#[derive(Debug, Clone, Default)]
pub struct TrioPlanner {
    scorer: BoardScorer,
}

impl TrioPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            scorer: BoardScorer::with_weights(weights),
        }
    }

    #[must_use]
    pub fn scorer(&self) -> &BoardScorer {
        &self.scorer
    }

    /// Picks the best placement sequence for the batch.
    ///
    /// Runs the sequence search, then ranks every candidate by a
    /// 1,000,000-point reward per line cleared across its moves plus the
    /// mean of [`ROLLOUTS`] independent rollouts seeded from the candidate's
    /// final board. The highest combined score wins; ties resolve to the
    /// earliest-generated candidate.
    ///
    /// Returns `None` when the search finds no legal full assignment —
    /// callers must treat that as game over for this board and batch.
    ///
    /// Candidates are ranked in parallel. Per-candidate rollout seeds are
    /// drawn from `rng` before the parallel phase, so the outcome is a pure
    /// function of the starting seed.
    pub fn best_trio<R>(
        &self,
        board: Board,
        batch: &[Piece; BATCH_SIZE],
        rng: &mut R,
    ) -> Option<Sequence>
    where
        R: Rng + ?Sized,
    {
        let candidates = generate_sequences(board, batch, &self.scorer);
        if candidates.is_empty() {
            return None;
        }
        log::debug!("ranking {} candidate sequences", candidates.len());

        let seeds: Vec<u64> = (0..candidates.len()).map(|_| rng.random()).collect();
        let scores: Vec<f64> = candidates
            .par_iter()
            .zip(seeds)
            .map(|(candidate, seed)| self.rank(candidate, seed))
            .collect();

        let mut best: Option<(usize, f64)> = None;
        for (index, &score) in scores.iter().enumerate() {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        let (index, _) = best?;
        candidates.into_iter().nth(index)
    }

    #[expect(clippy::cast_precision_loss)]
    fn rank(&self, candidate: &Sequence, seed: u64) -> f64 {
        let immediate = candidate.total_cleared_lines() as f64 * LINE_CLEAR_REWARD;
        let final_board = candidate.final_board();
        let mut rng = Pcg32::seed_from_u64(seed);
        let rollouts = (0..ROLLOUTS).map(|_| rollout(final_board, &self.scorer, &mut rng));
        let stats = DescriptiveStats::new(rollouts).expect("rollout count is nonzero");
        immediate + stats.mean
    }
}

/// Plans the batch with default score weights. The primary planning entry
/// point.
pub fn best_trio<R>(board: Board, batch: &[Piece; BATCH_SIZE], rng: &mut R) -> Option<Sequence>
where
    R: Rng + ?Sized,
{
    TrioPlanner::new().best_trio(board, batch, rng)
}

#[cfg(test)]
mod tests {
    use octoblast_engine::{ClearedLine, canonical_pieces};

    use super::*;

    #[test]
    fn test_full_board_has_no_legal_sequence() {
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
        let batch = [
            canonical_pieces()[0],
            canonical_pieces()[1],
            canonical_pieces()[2],
        ];
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(best_trio(full, &batch, &mut rng), None);
    }

    #[test]
    fn test_forced_gap_fill_clears_row_zero_first() {
        // Row 0 is one cell short and the only free space is the vertical
        // strip under its gap, so the winning sequence must start by filling
        // the gap, which clears rows 0..2 and column 7 at once
        let board = Board::from_ascii(
            "
            #######.
            #######.
            #######.
            ########
            ########
            ########
            ########
            ########
            ",
        );
        let batch = [
            Piece::from_ascii("#/#/#"),
            Piece::from_ascii("###"),
            Piece::from_ascii("###"),
        ];
        let mut rng = Pcg32::seed_from_u64(99);
        let sequence = best_trio(board, &batch, &mut rng).unwrap();

        assert_eq!(sequence.len(), BATCH_SIZE);
        let first = &sequence.moves()[0];
        assert_eq!(first.batch_index(), 0);
        assert_eq!((first.row(), first.col()), (0, 7));
        assert!(first.result().cleared_lines().contains(&ClearedLine::row(0)));
        assert!(sequence.total_cleared_lines() >= 4);
    }

    #[test]
    fn test_planning_is_deterministic_for_a_fixed_seed() {
        let board = Board::from_ascii(
            "
            ########
            ########
            ########
            ########
            ########
            ##....##
            ##....##
            ##....##
            ",
        );
        let batch = [
            Piece::from_ascii("##/##"),
            Piece::from_ascii("#/#"),
            Piece::from_ascii("###"),
        ];
        let a = best_trio(board, &batch, &mut Pcg32::seed_from_u64(5));
        let b = best_trio(board, &batch, &mut Pcg32::seed_from_u64(5));
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn test_open_board_places_all_three_bars() {
        let batch = [
            Piece::from_ascii("#####"),
            Piece::from_ascii("#####"),
            Piece::from_ascii("#####"),
        ];
        let mut rng = Pcg32::seed_from_u64(2024);
        let sequence = best_trio(Board::EMPTY, &batch, &mut rng).unwrap();

        assert_eq!(sequence.len(), BATCH_SIZE);
        // Replay the plan from the empty board to confirm it is legal
        let mut board = Board::EMPTY;
        for mv in sequence.moves() {
            let result = board.place(mv.piece(), mv.row(), mv.col()).unwrap();
            assert_eq!(&result, mv.result());
            board = result.board();
        }
        assert_eq!(board, sequence.final_board());
    }
}
