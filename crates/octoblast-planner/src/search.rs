use std::collections::VecDeque;

use arrayvec::ArrayVec;
use octoblast_engine::{Board, Piece, PlacementResult};
use serde::Serialize;

use crate::{SIDE, scorer::BoardScorer};

/// Number of pieces offered per batch.
pub const BATCH_SIZE: usize = 3;

/// Exploration cap: once completed sequences plus queued partial states
/// reach this bound, expansion stops enqueuing and the queue drains.
pub const SEQUENCE_CAP: usize = 500;

/// Lines cleared by one placement that make it "clearly good" and worth a
/// greedy short-circuit.
const CLEARLY_GOOD_LINES: usize = 3;

/// One step of a planned sequence: which batch piece goes where, and what
/// the board looked like afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Move {
    batch_index: usize,
    piece: Piece,
    row: i32,
    col: i32,
    result: PlacementResult,
}

impl Move {
    /// Index of the piece within the original batch.
    #[must_use]
    pub fn batch_index(&self) -> usize {
        self.batch_index
    }

    #[must_use]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[must_use]
    pub fn col(&self) -> i32 {
        self.col
    }

    #[must_use]
    pub fn result(&self) -> &PlacementResult {
        &self.result
    }
}

/// A complete, ordered assignment of every batch piece to a board position.
///
/// Each move's placement applies to the previous move's post-clear board.
/// Immutable once emitted by the search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    moves: Vec<Move>,
}

impl Sequence {
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The board after the last move's clears, i.e. where the game continues.
    #[must_use]
    pub fn final_board(&self) -> Board {
        self.moves
            .last()
            .expect("a sequence always contains at least one move")
            .result()
            .board()
    }

    /// Lines cleared summed across all moves.
    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.moves
            .iter()
            .map(|mv| mv.result().cleared_lines().len())
            .sum()
    }
}

#[derive(Debug, Clone)]
struct PartialPlan {
    board: Board,
    moves: Vec<Move>,
    remaining: ArrayVec<(usize, Piece), BATCH_SIZE>,
}

/// Enumerates candidate placement sequences for the batch, breadth-first
/// over partial assignments.
///
/// Expansion tries every remaining piece at every cell in row-major order.
/// Two policies compete per expansion:
///
/// 1. A placement clearing three or more lines triggers a greedy completion
///    of the remaining pieces; if every one of them can be placed at its
///    best-scoring position, that single sequence is returned immediately
///    and the rest of the search is abandoned.
/// 2. Otherwise the child state is enqueued, until completed sequences plus
///    queued states reach [`SEQUENCE_CAP`].
///
/// An empty result means no legal full assignment exists. Results depend on
/// the iteration order over pieces and cells; that order dependence is an
/// accepted performance/quality tradeoff.
#[must_use]
pub fn generate_sequences(
    board: Board,
    batch: &[Piece; BATCH_SIZE],
    scorer: &BoardScorer,
) -> Vec<Sequence> {
    let remaining: ArrayVec<(usize, Piece), BATCH_SIZE> =
        batch.iter().copied().enumerate().collect();
    let mut queue = VecDeque::new();
    queue.push_back(PartialPlan {
        board,
        moves: Vec::new(),
        remaining,
    });
    let mut completed: Vec<Sequence> = Vec::new();

    while completed.len() < SEQUENCE_CAP {
        let Some(plan) = queue.pop_front() else {
            break;
        };
        if plan.remaining.is_empty() {
            completed.push(Sequence { moves: plan.moves });
            continue;
        }

        'expand: for slot in 0..plan.remaining.len() {
            let (batch_index, piece) = plan.remaining[slot];
            for row in 0..SIDE {
                for col in 0..SIDE {
                    let Ok(result) = plan.board.place(piece, row, col) else {
                        continue;
                    };

                    if result.cleared_lines().len() >= CLEARLY_GOOD_LINES {
                        log::debug!(
                            "placement clears {} lines, attempting greedy completion",
                            result.cleared_lines().len()
                        );
                        if let Some(sequence) =
                            complete_greedily(&plan, slot, row, col, result.clone(), scorer)
                        {
                            log::debug!("greedy completion succeeded, short-circuiting search");
                            return vec![sequence];
                        }
                    }

                    let mut remaining = plan.remaining.clone();
                    remaining.remove(slot);
                    let mut moves = plan.moves.clone();
                    let next_board = result.board();
                    moves.push(Move {
                        batch_index,
                        piece,
                        row,
                        col,
                        result,
                    });
                    queue.push_back(PartialPlan {
                        board: next_board,
                        moves,
                        remaining,
                    });
                    if queue.len() + completed.len() >= SEQUENCE_CAP {
                        log::debug!("exploration cap ({SEQUENCE_CAP}) reached");
                        break 'expand;
                    }
                }
            }
        }
    }

    log::debug!("search finished with {} complete sequences", completed.len());
    completed
}

/// Extends a partial plan with the clearly-good placement, then places each
/// still-remaining piece at its single best-scoring position. `None` when
/// any remaining piece fits nowhere.
fn complete_greedily(
    plan: &PartialPlan,
    slot: usize,
    row: i32,
    col: i32,
    result: PlacementResult,
    scorer: &BoardScorer,
) -> Option<Sequence> {
    let (batch_index, piece) = plan.remaining[slot];
    let mut moves = plan.moves.clone();
    let mut board = result.board();
    moves.push(Move {
        batch_index,
        piece,
        row,
        col,
        result,
    });

    for (other_slot, &(batch_index, piece)) in plan.remaining.iter().enumerate() {
        if other_slot == slot {
            continue;
        }
        let placement = scorer.best_placement(board, piece)?;
        board = placement.result.board();
        moves.push(Move {
            batch_index,
            piece,
            row: placement.row,
            col: placement.col,
            result: placement.result,
        });
    }
    Some(Sequence { moves })
}
