use octoblast_engine::{Board, Piece, PlacementResult};

use crate::{SIDE, board_metrics::BoardMetrics};

/// Weights of the board-scoring terms.
///
/// The defaults are tuned so that line clears dominate every other term by
/// orders of magnitude; a placement that clears more lines always outscores
/// an otherwise comparable one that clears fewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Reward per line cleared by the placement under evaluation.
    pub lines: f64,
    /// Penalty factor on [`BoardMetrics::centre_penalty`].
    pub centrality: f64,
    /// Penalty per hole.
    pub holes: f64,
    /// Reward factor on [`BoardMetrics::adjacency_score`].
    pub adjacency: f64,
    /// Penalty factor on [`BoardMetrics::surface_bumpiness`].
    pub smoothness: f64,
    /// Reward factor on [`BoardMetrics::rectangle_bonus`].
    pub rectangles: f64,
}

impl ScoreWeights {
    pub const DEFAULT: Self = Self {
        lines: 50_000.0,
        centrality: 2.0,
        holes: 250.0,
        adjacency: 0.7,
        smoothness: 15.0,
        rectangles: 0.5,
    };
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The six weighted terms of one board evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub line_reward: f64,
    pub centrality_penalty: f64,
    pub hole_penalty: f64,
    pub adjacency_reward: f64,
    pub smoothness_penalty: f64,
    pub rectangle_reward: f64,
}

impl ScoreComponents {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(metrics: &BoardMetrics, lines_cleared: usize, weights: &ScoreWeights) -> Self {
        Self {
            line_reward: weights.lines * lines_cleared as f64,
            centrality_penalty: weights.centrality * metrics.centre_penalty(),
            hole_penalty: weights.holes * f64::from(metrics.hole_count()),
            adjacency_reward: weights.adjacency * f64::from(metrics.adjacency_score()),
            smoothness_penalty: weights.smoothness * f64::from(metrics.surface_bumpiness()),
            rectangle_reward: weights.rectangles * metrics.rectangle_bonus(),
        }
    }

    /// Rewards minus penalties.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.line_reward - self.centrality_penalty - self.hole_penalty + self.adjacency_reward
            - self.smoothness_penalty
            + self.rectangle_reward
    }
}

/// One legal placement together with its resulting board score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPlacement {
    pub score: f64,
    pub row: i32,
    pub col: i32,
    pub result: PlacementResult,
}

/// Scores boards as a weighted linear combination of sub-metrics.
///
/// Scores are always recomputed from the board under evaluation; nothing is
/// cached across boards.
#[derive(Debug, Clone, Default)]
pub struct BoardScorer {
    weights: ScoreWeights,
}

impl BoardScorer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    #[must_use]
    pub fn components(&self, board: Board, lines_cleared: usize) -> ScoreComponents {
        ScoreComponents::compute(&BoardMetrics::from_board(board), lines_cleared, &self.weights)
    }

    /// Scores a board, given how many lines the placement that produced it
    /// cleared. Higher is better. Pure arithmetic; cannot fail.
    #[must_use]
    pub fn score(&self, board: Board, lines_cleared: usize) -> f64 {
        self.components(board, lines_cleared).total()
    }

    /// Evaluates every legal placement of `piece` on `board` and returns the
    /// best-scoring one, scanning cells row-major. The first placement wins
    /// ties. `None` when the piece fits nowhere.
    #[must_use]
    pub fn best_placement(&self, board: Board, piece: Piece) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;
        for row in 0..SIDE {
            for col in 0..SIDE {
                let Ok(result) = board.place(piece, row, col) else {
                    continue;
                };
                let score = self.score(result.board(), result.cleared_lines().len());
                if best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(ScoredPlacement {
                        score,
                        row,
                        col,
                        result,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_scores_zero() {
        let scorer = BoardScorer::new();
        assert_eq!(scorer.score(Board::EMPTY, 0), 0.0);
    }

    #[test]
    fn test_line_reward_dominates() {
        let scorer = BoardScorer::new();
        let board = Board::from_ascii(
            "
            ........
            ........
            ........
            ...##...
            ...##...
            ........
            ........
            ........
            ",
        );
        let none = scorer.score(board, 0);
        let one = scorer.score(board, 1);
        let two = scorer.score(board, 2);
        assert_eq!(one - none, 50_000.0);
        assert_eq!(two - one, 50_000.0);
        assert!(two > one && one > none);
    }

    #[test]
    fn test_components_match_total() {
        let scorer = BoardScorer::new();
        let board = Board::from_ascii(
            "
            #.......
            ........
            #.......
            ........
            ...##...
            ...##...
            ........
            ........
            ",
        );
        let components = scorer.components(board, 1);
        assert_eq!(components.line_reward, 50_000.0);
        assert!(components.hole_penalty > 0.0);
        assert_eq!(components.total(), scorer.score(board, 1));
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoreWeights {
            lines: 1.0,
            centrality: 0.0,
            holes: 0.0,
            adjacency: 0.0,
            smoothness: 0.0,
            rectangles: 0.0,
        };
        let scorer = BoardScorer::with_weights(weights);
        assert_eq!(scorer.score(Board::EMPTY, 3), 3.0);
    }

    #[test]
    fn test_best_placement_on_full_board() {
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
        let piece = octoblast_engine::Piece::from_ascii("#");
        assert!(scorer.best_placement(full, piece).is_none());
    }

    #[test]
    fn test_best_placement_prefers_line_clear() {
        // Filling the row-0 gap clears a line; anywhere else does not
        let board = Board::from_ascii(
            "
            #######.
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        let scorer = BoardScorer::new();
        let bar = octoblast_engine::Piece::from_ascii("#/#/#");
        let placement = scorer.best_placement(board, bar).unwrap();
        assert_eq!((placement.row, placement.col), (0, 7));
        assert_eq!(placement.result.cleared_lines().len(), 1);
    }
}
