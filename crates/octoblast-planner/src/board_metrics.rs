use std::cell::OnceCell;

use octoblast_engine::{BOARD_SIZE, Board};

/// Points contributed by each occupied 4-neighbour of an occupied cell.
const ADJACENT_POINTS: u32 = 5;
/// Side-length range of rectangles considered by the rectangle bonus.
const RECT_MIN_SIDE: usize = 2;
const RECT_MAX_SIDE: usize = 5;

/// Lazily-computed sub-metrics of one board.
///
/// Each metric is computed on first access and cached for the lifetime of
/// this value; a `BoardMetrics` is always built fresh per board, never
/// reused across boards.
#[derive(Debug)]
pub struct BoardMetrics {
    board: Board,
    column_heights: OnceCell<[u8; BOARD_SIZE]>,
    hole_count: OnceCell<u32>,
    centre_penalty: OnceCell<f64>,
    adjacency_score: OnceCell<u32>,
    surface_bumpiness: OnceCell<u32>,
    rectangle_bonus: OnceCell<f64>,
}

impl BoardMetrics {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            hole_count: OnceCell::new(),
            centre_penalty: OnceCell::new(),
            adjacency_score: OnceCell::new(),
            surface_bumpiness: OnceCell::new(),
            rectangle_bonus: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    /// Height of each column: board side minus the topmost occupied row,
    /// 0 for an empty column.
    #[must_use]
    pub fn column_heights(&self) -> &[u8; BOARD_SIZE] {
        self.column_heights.get_or_init(|| {
            let mut heights = [0; BOARD_SIZE];
            for (col, height) in heights.iter_mut().enumerate() {
                let top = (0..BOARD_SIZE).find(|&row| self.board.is_occupied(row, col));
                if let Some(top) = top {
                    *height = u8::try_from(BOARD_SIZE - top).unwrap();
                }
            }
            heights
        })
    }

    /// Number of empty cells with at least one occupied cell above them in
    /// the same column.
    #[must_use]
    pub fn hole_count(&self) -> u32 {
        *self.hole_count.get_or_init(|| {
            let mut holes = 0;
            for col in 0..BOARD_SIZE {
                let mut seen_occupied = false;
                for row in 0..BOARD_SIZE {
                    if self.board.is_occupied(row, col) {
                        seen_occupied = true;
                    } else if seen_occupied {
                        holes += 1;
                    }
                }
            }
            holes
        })
    }

    /// Sum over occupied cells of `1 + |row − centre| + |col − centre|`,
    /// the Manhattan distance from the board centre. Edge and corner cells
    /// cost the most.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn centre_penalty(&self) -> f64 {
        *self.centre_penalty.get_or_init(|| {
            let centre = (BOARD_SIZE as f64 - 1.0) / 2.0;
            let mut penalty = 0.0;
            for row in 0..BOARD_SIZE {
                for col in 0..BOARD_SIZE {
                    if self.board.is_occupied(row, col) {
                        penalty += 1.0 + (row as f64 - centre).abs() + (col as f64 - centre).abs();
                    }
                }
            }
            penalty
        })
    }

    /// Compactness reward: 5 points for every occupied 4-neighbour of every
    /// occupied cell, so each adjacent pair counts from both sides.
    #[must_use]
    pub fn adjacency_score(&self) -> u32 {
        *self.adjacency_score.get_or_init(|| {
            let mut score = 0;
            for row in 0..BOARD_SIZE {
                for col in 0..BOARD_SIZE {
                    if !self.board.is_occupied(row, col) {
                        continue;
                    }
                    if row > 0 && self.board.is_occupied(row - 1, col) {
                        score += ADJACENT_POINTS;
                    }
                    if row < BOARD_SIZE - 1 && self.board.is_occupied(row + 1, col) {
                        score += ADJACENT_POINTS;
                    }
                    if col > 0 && self.board.is_occupied(row, col - 1) {
                        score += ADJACENT_POINTS;
                    }
                    if col < BOARD_SIZE - 1 && self.board.is_occupied(row, col + 1) {
                        score += ADJACENT_POINTS;
                    }
                }
            }
            score
        })
    }

    /// Skyline jaggedness: sum of height differences between adjacent
    /// columns.
    #[must_use]
    pub fn surface_bumpiness(&self) -> u32 {
        *self.surface_bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|pair| u32::from(pair[0].abs_diff(pair[1])))
                .sum()
        })
    }

    /// Reward for dense rectangular regions.
    ///
    /// Scans every fully-occupied axis-aligned rectangle whose top-left
    /// anchor cell is occupied and whose sides are between 2 and 5: each
    /// contributes `area^1.5`, squares add `20 × area`, and exact 3×3
    /// squares add a flat 300. Overlapping rectangles all count; the
    /// over-counting is intentional and rewards regions that set up clean
    /// multi-line clears.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn rectangle_bonus(&self) -> f64 {
        *self.rectangle_bonus.get_or_init(|| {
            let mut bonus = 0.0;
            for start_row in 0..BOARD_SIZE {
                for start_col in 0..BOARD_SIZE {
                    if !self.board.is_occupied(start_row, start_col) {
                        continue;
                    }
                    for height in RECT_MIN_SIDE..=RECT_MAX_SIDE {
                        for width in RECT_MIN_SIDE..=RECT_MAX_SIDE {
                            if start_row + height > BOARD_SIZE || start_col + width > BOARD_SIZE {
                                continue;
                            }
                            if !self.is_filled_rect(start_row, start_col, height, width) {
                                continue;
                            }
                            let area = (height * width) as f64;
                            bonus += area.powf(1.5);
                            if height == width {
                                bonus += area * 20.0;
                            }
                            if height == 3 && width == 3 {
                                bonus += 300.0;
                            }
                        }
                    }
                }
            }
            bonus
        })
    }

    fn is_filled_rect(&self, start_row: usize, start_col: usize, height: usize, width: usize) -> bool {
        (start_row..start_row + height)
            .all(|row| (start_col..start_col + width).all(|col| self.board.is_occupied(row, col)))
    }
}
