use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::PlacementError;

use super::piece::{MAX_PIECE_DIM, Piece};

/// Side length of the square board.
pub const BOARD_SIZE: usize = 8;

/// Upper bound on cells a single placement can occupy.
pub const MAX_PIECE_CELLS: usize = MAX_PIECE_DIM * MAX_PIECE_DIM;

/// Upper bound on lines a single placement can clear (every row plus every
/// column).
pub const MAX_CLEARED_LINES: usize = 2 * BOARD_SIZE;

// One bit per cell; the board side exactly fills a u8 row.
const _: () = assert!(BOARD_SIZE == u8::BITS as usize);
const FULL_ROW: u8 = u8::MAX;

/// Whether a cleared line was a row or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Row,
    Col,
}

/// Descriptor of one cleared line, so consumers can tell row clears from
/// column clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClearedLine {
    pub kind: LineKind,
    pub index: usize,
}

impl ClearedLine {
    #[must_use]
    pub const fn row(index: usize) -> Self {
        Self {
            kind: LineKind::Row,
            index,
        }
    }

    #[must_use]
    pub const fn col(index: usize) -> Self {
        Self {
            kind: LineKind::Col,
            index,
        }
    }
}

/// 8×8 occupancy board.
///
/// Each row is stored as a byte with one bit per cell (bit `N` is column
/// `N`). The board is a plain `Copy` value: [`Board::place`] and
/// [`Board::clear_lines`] return new boards instead of mutating shared
/// state, so search branches and rollouts can never race on one.
///
/// # Coordinate System
///
/// - `(0, 0)` is the top-left cell
/// - Rows increase downward, columns increase rightward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [u8; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [0; BOARD_SIZE],
    };

    /// Creates a board from an occupancy matrix.
    #[must_use]
    pub fn from_cells(cells: &[[bool; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut rows = [0_u8; BOARD_SIZE];
        for (row, bits) in rows.iter_mut().enumerate() {
            for (col, &occupied) in cells[row].iter().enumerate() {
                if occupied {
                    *bits |= 1 << col;
                }
            }
        }
        Self { rows }
    }

    /// Returns the board as an occupancy matrix.
    #[must_use]
    pub fn cells(&self) -> [[bool; BOARD_SIZE]; BOARD_SIZE] {
        let mut cells = [[false; BOARD_SIZE]; BOARD_SIZE];
        for (row, cells_row) in cells.iter_mut().enumerate() {
            for (col, cell) in cells_row.iter_mut().enumerate() {
                *cell = self.is_occupied(row, col);
            }
        }
        cells
    }

    /// Creates a board from ASCII art (`'#'` occupied, `'.'` empty, one line
    /// per row, top to bottom). Intended for tests and file input.
    ///
    /// # Panics
    ///
    /// Panics when the art is not an 8×8 grid of `'#'`/`'.'` cells.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        art.parse().expect("invalid board ASCII art")
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        (self.rows[row] >> col) & 1 != 0
    }

    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        let count = self.rows.iter().map(|row| row.count_ones()).sum::<u32>();
        usize::try_from(count).unwrap()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.rows.iter().all(|&row| row == FULL_ROW)
    }

    /// Places a piece with its bounding-box top-left at `(row, col)`.
    ///
    /// The target coordinates may be arbitrary integers; a placement whose
    /// cells land outside the board or on occupied cells is rejected as a
    /// whole. Partial writes happen on a scratch copy, so callers never
    /// observe them. On success, full rows and columns of the
    /// post-placement board are detected in a single pass and cleared
    /// simultaneously.
    pub fn place(&self, piece: Piece, row: i32, col: i32) -> Result<PlacementResult, PlacementError> {
        let mut scratch = *self;
        let mut placed_cells = ArrayVec::new();
        for (piece_row, piece_col) in piece.cells() {
            let target_row = row + i32::from(piece_row);
            let target_col = col + i32::from(piece_col);
            let (Ok(target_row), Ok(target_col)) =
                (usize::try_from(target_row), usize::try_from(target_col))
            else {
                return Err(PlacementError::OutOfBounds);
            };
            if target_row >= BOARD_SIZE || target_col >= BOARD_SIZE {
                return Err(PlacementError::OutOfBounds);
            }
            if scratch.is_occupied(target_row, target_col) {
                return Err(PlacementError::Overlap);
            }
            scratch.rows[target_row] |= 1 << target_col;
            placed_cells.push((target_row, target_col));
        }

        let cleared = scratch.find_full_lines();
        let board = scratch.clear_lines(&cleared);
        Ok(PlacementResult {
            before_clear: scratch,
            board,
            cleared,
            placed_cells,
        })
    }

    /// Finds every full row and full column, rows first, by ascending index.
    #[must_use]
    pub fn find_full_lines(&self) -> ArrayVec<ClearedLine, MAX_CLEARED_LINES> {
        let mut lines = ArrayVec::new();
        for (index, &row) in self.rows.iter().enumerate() {
            if row == FULL_ROW {
                lines.push(ClearedLine::row(index));
            }
        }
        let full_cols = self.rows.iter().fold(FULL_ROW, |acc, &row| acc & row);
        for index in 0..BOARD_SIZE {
            if (full_cols >> index) & 1 != 0 {
                lines.push(ClearedLine::col(index));
            }
        }
        lines
    }

    /// Returns a board with every cell of the given lines emptied.
    #[must_use]
    pub fn clear_lines(&self, lines: &[ClearedLine]) -> Self {
        let mut board = *self;
        for line in lines {
            match line.kind {
                LineKind::Row => board.rows[line.index] = 0,
                LineKind::Col => {
                    for row in &mut board.rows {
                        *row &= !(1 << line.index);
                    }
                }
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            if row > 0 {
                f.write_char('\n')?;
            }
            for col in 0..BOARD_SIZE {
                f.write_char(if self.is_occupied(row, col) { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board must have exactly {BOARD_SIZE} rows, found {_0}")]
    RowCount(#[error(not(source))] usize),
    #[display("board rows must have exactly {BOARD_SIZE} cells, found {_0}")]
    RowWidth(#[error(not(source))] usize),
    #[display("invalid cell character {_0:?}")]
    InvalidCell(#[error(not(source))] char),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != BOARD_SIZE {
            return Err(ParseBoardError::RowCount(lines.len()));
        }

        let mut rows = [0_u8; BOARD_SIZE];
        for (bits, line) in rows.iter_mut().zip(&lines) {
            let width = line.chars().count();
            if width != BOARD_SIZE {
                return Err(ParseBoardError::RowWidth(width));
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '#' => *bits |= 1 << col,
                    '.' => {}
                    _ => return Err(ParseBoardError::InvalidCell(ch)),
                }
            }
        }
        Ok(Self { rows })
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: comma-separated hex rows, top to bottom; bit N is column N
        // (e.g. the empty board is "00,00,00,00,00,00,00,00")
        let mut hex = String::with_capacity(BOARD_SIZE * 3);
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                hex.push(',');
            }
            write!(&mut hex, "{row:02x}").unwrap();
        }
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != BOARD_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex rows, got {}",
                BOARD_SIZE,
                parts.len()
            )));
        }

        let mut rows = [0_u8; BOARD_SIZE];
        for (row, hex) in rows.iter_mut().zip(&parts) {
            *row = u8::from_str_radix(hex, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex row {hex:?} ({e})"))
            })?;
        }
        Ok(Self { rows })
    }
}

/// Outcome of a successful placement.
///
/// Keeps the post-placement board both before and after line clearing; the
/// pre-clear board is what animation-facing consumers highlight while the
/// cleared lines fade out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementResult {
    before_clear: Board,
    board: Board,
    cleared: ArrayVec<ClearedLine, MAX_CLEARED_LINES>,
    placed_cells: ArrayVec<(usize, usize), MAX_PIECE_CELLS>,
}

impl PlacementResult {
    /// The board with the piece filled in, before any lines were cleared.
    #[must_use]
    pub fn board_before_clear(&self) -> Board {
        self.before_clear
    }

    /// The board after clearing, i.e. the state the game continues from.
    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn cleared_lines(&self) -> &[ClearedLine] {
        &self.cleared
    }

    /// Coordinates newly occupied by the placed piece.
    #[must_use]
    pub fn placed_cells(&self) -> &[(usize, usize)] {
        &self.placed_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(board.occupied_cells(), 0);
        assert!(!board.is_full());
        assert!(board.find_full_lines().is_empty());
    }

    #[test]
    fn test_ascii_display_round_trip() {
        let art = "\
            ##......\n\
            #.......\n\
            ........\n\
            ........\n\
            ...##...\n\
            ...##...\n\
            ........\n\
            .......#";
        let board = Board::from_ascii(art);
        assert_eq!(board.to_string(), art);
        assert_eq!(Board::from_ascii(&board.to_string()), board);
        assert_eq!(board.occupied_cells(), 8);
    }

    #[test]
    fn test_cells_round_trip() {
        let board = Board::from_ascii(
            "
            #.......
            ........
            ........
            ....#...
            ........
            ........
            ........
            .......#
            ",
        );
        assert_eq!(Board::from_cells(&board.cells()), board);
    }

    #[test]
    fn test_place_adds_exactly_the_piece_cells() {
        let pieces = [
            Piece::from_ascii("###"),
            Piece::from_ascii("##/##"),
            Piece::from_ascii(".#./###"),
            Piece::from_ascii("#####"),
        ];
        for piece in pieces {
            let result = Board::EMPTY.place(piece, 2, 1).unwrap();
            assert_eq!(
                result.board_before_clear().occupied_cells(),
                piece.cell_count(),
                "{piece}"
            );
            assert_eq!(result.placed_cells().len(), piece.cell_count());
        }
    }

    #[test]
    fn test_place_rejects_out_of_bounds() {
        let bar = Piece::from_ascii("###");
        assert_eq!(
            Board::EMPTY.place(bar, -1, 0),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            Board::EMPTY.place(bar, 0, -2),
            Err(PlacementError::OutOfBounds)
        );
        // Cells (0,6)..(0,8): the last one is off the right edge
        assert_eq!(
            Board::EMPTY.place(bar, 0, 6),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            Board::EMPTY.place(bar, 8, 0),
            Err(PlacementError::OutOfBounds)
        );
    }

    #[test]
    fn test_place_rejects_overlap() {
        let square = Piece::from_ascii("##/##");
        let first = Board::EMPTY.place(square, 3, 3).unwrap();
        assert_eq!(
            first.board().place(square, 4, 4),
            Err(PlacementError::Overlap)
        );
        // Rejection leaves the original board untouched
        assert_eq!(first.board().occupied_cells(), 4);
    }

    #[test]
    fn test_row_clear() {
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
        let bar = Piece::from_ascii("#/#/#");
        let result = board.place(bar, 0, 7).unwrap();

        assert_eq!(result.cleared_lines(), &[ClearedLine::row(0)]);
        assert!(result.board_before_clear().is_occupied(0, 7));
        // Row 0 is empty after clearing, the rest of the bar survives
        assert!(!result.board().is_occupied(0, 7));
        assert!(result.board().is_occupied(1, 7));
        assert!(result.board().is_occupied(2, 7));
        assert_eq!(result.board().occupied_cells(), 2);
    }

    #[test]
    fn test_simultaneous_row_and_column_clear() {
        // Row 3 and column 4 are both one cell short at their intersection
        let mut cells = [[false; BOARD_SIZE]; BOARD_SIZE];
        for col in 0..BOARD_SIZE {
            cells[3][col] = true;
        }
        for row in 0..BOARD_SIZE {
            cells[row][4] = true;
        }
        cells[3][4] = false;
        let board = Board::from_cells(&cells);

        let result = board.place(Piece::from_ascii("#"), 3, 4).unwrap();
        assert_eq!(
            result.cleared_lines(),
            &[ClearedLine::row(3), ClearedLine::col(4)]
        );
        assert_eq!(result.board().occupied_cells(), 0);
    }

    #[test]
    fn test_multiple_rows_cleared_in_one_pass() {
        // Rows 0 and 1 are both completed by one vertical domino; both are
        // judged against the pre-clear board
        let board = Board::from_ascii(
            "
            #######.
            #######.
            ........
            ........
            ........
            ........
            ........
            ........
            ",
        );
        let result = board.place(Piece::from_ascii("#/#"), 0, 7).unwrap();
        assert_eq!(
            result.cleared_lines(),
            &[ClearedLine::row(0), ClearedLine::row(1)]
        );
        assert_eq!(result.board().occupied_cells(), 0);
    }

    #[test]
    fn test_partial_lines_are_never_cleared() {
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
        let result = board.place(Piece::from_ascii("#"), 1, 0).unwrap();
        assert!(result.cleared_lines().is_empty());
        assert_eq!(result.board(), result.board_before_clear());
    }

    #[test]
    fn test_place_is_pure() {
        let board = Board::EMPTY;
        let piece = Piece::from_ascii("##/##");
        let a = board.place(piece, 0, 0).unwrap();
        let b = board.place(piece, 0, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(board.occupied_cells(), 0);
    }

    #[test]
    fn test_serialization() {
        let serialized = serde_json::to_string(&Board::EMPTY).unwrap();
        assert_eq!(serialized, "\"00,00,00,00,00,00,00,00\"");

        let board = Board::from_ascii(
            "
            ##......
            ........
            ........
            ........
            ........
            ........
            ........
            #######.
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, "\"03,00,00,00,00,00,00,7f\"");
        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
    }

    #[test]
    fn test_deserialization_rejects_malformed_input() {
        assert!(serde_json::from_str::<Board>("\"00\"").is_err());
        assert!(serde_json::from_str::<Board>("\"zz,00,00,00,00,00,00,00\"").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "........".parse::<Board>(),
            Err(ParseBoardError::RowCount(1))
        ));
        let short_row = "........\n........\n........\n........\n........\n........\n........\n....";
        assert!(matches!(
            short_row.parse::<Board>(),
            Err(ParseBoardError::RowWidth(4))
        ));
    }
}
