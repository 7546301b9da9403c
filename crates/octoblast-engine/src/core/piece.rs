use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Maximum side length of a piece's bounding box.
pub const MAX_PIECE_DIM: usize = 5;

/// A polyomino trimmed to its minimal bounding box.
///
/// Every border row and column of the bounding box contains at least one
/// occupied cell, so two pieces are the same shape iff they compare equal.
/// Pieces are immutable values; rotation and mirroring return new instances.
///
/// # Coordinate System
///
/// - `(0, 0)` is the top-left cell of the bounding box
/// - Rows increase downward, columns increase rightward
///
/// # Example
///
/// ```
/// use octoblast_engine::Piece;
///
/// let corner = Piece::from_ascii("#.\n##");
/// assert_eq!(corner.cell_count(), 3);
/// assert_eq!(corner.rotated().rotated().rotated().rotated(), corner);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    width: u8,
    height: u8,
    rows: [u8; MAX_PIECE_DIM],
}

impl Piece {
    /// Trims an arbitrary occupancy grid to its tightest bounding box.
    ///
    /// Returns `None` when the grid contains no occupied cell. Rows may be
    /// ragged; missing cells are treated as empty.
    ///
    /// # Panics
    ///
    /// Panics if the trimmed shape exceeds the
    /// [`MAX_PIECE_DIM`]×[`MAX_PIECE_DIM`] bounding box.
    pub fn from_grid<R>(grid: &[R]) -> Option<Self>
    where
        R: AsRef<[bool]>,
    {
        Self::trimmed(grid).expect("trimmed piece must fit the maximum bounding box")
    }

    fn trimmed<R>(grid: &[R]) -> Result<Option<Self>, ParsePieceError>
    where
        R: AsRef<[bool]>,
    {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (row, cells) in grid.iter().enumerate() {
            for (col, &occupied) in cells.as_ref().iter().enumerate() {
                if !occupied {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (row, row, col, col),
                    Some((min_row, max_row, min_col, max_col)) => (
                        min_row.min(row),
                        max_row.max(row),
                        min_col.min(col),
                        max_col.max(col),
                    ),
                });
            }
        }
        let Some((min_row, max_row, min_col, max_col)) = bounds else {
            return Ok(None);
        };

        let height = max_row - min_row + 1;
        let width = max_col - min_col + 1;
        if height > MAX_PIECE_DIM || width > MAX_PIECE_DIM {
            return Err(ParsePieceError::TooLarge);
        }

        let mut rows = [0_u8; MAX_PIECE_DIM];
        for (row, bits) in rows.iter_mut().enumerate().take(height) {
            for col in 0..width {
                let occupied = grid[min_row + row]
                    .as_ref()
                    .get(min_col + col)
                    .copied()
                    .unwrap_or(false);
                if occupied {
                    *bits |= 1 << col;
                }
            }
        }
        Ok(Some(Self {
            width: u8::try_from(width).unwrap(),
            height: u8::try_from(height).unwrap(),
            rows,
        }))
    }

    /// Creates a piece from ASCII art (`'#'` occupied, `'.'` empty, rows
    /// separated by newlines or `'/'`). Intended for tests and fixed shape
    /// tables.
    ///
    /// # Panics
    ///
    /// Panics when the art is empty or malformed.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        art.parse().expect("invalid piece ASCII art")
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Checks whether the bounding-box cell at `(row, col)` is occupied.
    #[must_use]
    pub fn is_cell(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && (self.rows[row] >> col) & 1 != 0
    }

    /// Iterates over the occupied `(row, col)` offsets within the bounding box.
    pub fn cells(self) -> impl Iterator<Item = (u8, u8)> {
        (0..self.height).flat_map(move |row| {
            (0..self.width)
                .filter(move |col| (self.rows[usize::from(row)] >> col) & 1 != 0)
                .map(move |col| (row, col))
        })
    }

    #[must_use]
    pub fn cell_count(self) -> usize {
        self.cells().count()
    }

    /// Returns the piece rotated 90° clockwise.
    #[must_use]
    pub fn rotated(self) -> Self {
        let mut rows = [0_u8; MAX_PIECE_DIM];
        for (row, col) in self.cells() {
            rows[usize::from(col)] |= 1 << (self.height - 1 - row);
        }
        Self {
            width: self.height,
            height: self.width,
            rows,
        }
    }

    /// Returns the piece mirrored left-to-right.
    #[must_use]
    pub fn mirrored_horizontal(self) -> Self {
        let mut rows = [0_u8; MAX_PIECE_DIM];
        for (row, col) in self.cells() {
            rows[usize::from(row)] |= 1 << (self.width - 1 - col);
        }
        Self { rows, ..self }
    }

    /// Returns the piece mirrored top-to-bottom.
    #[must_use]
    pub fn mirrored_vertical(self) -> Self {
        let mut rows = [0_u8; MAX_PIECE_DIM];
        for (row, col) in self.cells() {
            rows[usize::from(self.height - 1 - row)] |= 1 << col;
        }
        Self { rows, ..self }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height() {
            if row > 0 {
                f.write_char('\n')?;
            }
            for col in 0..self.width() {
                f.write_char(if self.is_cell(row, col) { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceError {
    #[display("piece must contain at least one occupied cell")]
    Empty,
    #[display("piece rows must all have the same width")]
    RaggedRows,
    #[display("piece does not fit in a {MAX_PIECE_DIM}x{MAX_PIECE_DIM} bounding box")]
    TooLarge,
    #[display("invalid cell character {_0:?}")]
    InvalidCell(#[error(not(source))] char),
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut grid: Vec<Vec<bool>> = Vec::new();
        for line in s.split(['/', '\n']) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                match ch {
                    '#' => row.push(true),
                    '.' => row.push(false),
                    _ => return Err(ParsePieceError::InvalidCell(ch)),
                }
            }
            grid.push(row);
        }
        if let Some(first) = grid.first() {
            if grid.iter().any(|row| row.len() != first.len()) {
                return Err(ParsePieceError::RaggedRows);
            }
        }
        Self::trimmed(&grid)?.ok_or(ParsePieceError::Empty)
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: '#'/'.' rows joined by '/' (e.g. "##./.##")
        let mut s = String::with_capacity(self.height() * (self.width() + 1));
        for row in 0..self.height() {
            if row > 0 {
                s.push('/');
            }
            for col in 0..self.width() {
                s.push(if self.is_cell(row, col) { '#' } else { '.' });
            }
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_trims_to_bounding_box() {
        let grid = [
            [false, false, false],
            [false, true, false],
            [false, false, false],
        ];
        let piece = Piece::from_grid(&grid).unwrap();
        assert_eq!(piece.width(), 1);
        assert_eq!(piece.height(), 1);
        assert_eq!(piece.cell_count(), 1);
        assert!(piece.is_cell(0, 0));
    }

    #[test]
    fn test_from_grid_empty_returns_none() {
        let grid = [[false; 4]; 4];
        assert_eq!(Piece::from_grid(&grid), None);
    }

    #[test]
    fn test_from_ascii_is_already_trimmed() {
        let padded = Piece::from_ascii(
            "
            ...
            .#.
            .##
            ",
        );
        let tight = Piece::from_ascii("#.\n##");
        assert_eq!(padded, tight);
    }

    #[test]
    fn test_cells_iterate_row_major() {
        let piece = Piece::from_ascii(".#.\n###");
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(piece.cell_count(), 4);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        // L-shape: rotating clockwise turns columns into rows
        let piece = Piece::from_ascii("#.\n#.\n##");
        let rotated = piece.rotated();
        assert_eq!(rotated, Piece::from_ascii("###\n#.."));
        assert_eq!(rotated.width(), 3);
        assert_eq!(rotated.height(), 2);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for art in ["#####", "##/.#", ".#./###", "#../#../###"] {
            let piece = Piece::from_ascii(art);
            let back = piece.rotated().rotated().rotated().rotated();
            assert_eq!(back, piece, "{art}");
        }
    }

    #[test]
    fn test_mirrors_are_involutions() {
        for art in ["##./.##", "#./#./##", "###"] {
            let piece = Piece::from_ascii(art);
            assert_eq!(piece.mirrored_horizontal().mirrored_horizontal(), piece);
            assert_eq!(piece.mirrored_vertical().mirrored_vertical(), piece);
        }
    }

    #[test]
    fn test_mirror_horizontal() {
        let piece = Piece::from_ascii("##.\n.##");
        assert_eq!(piece.mirrored_horizontal(), Piece::from_ascii(".##\n##."));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Piece>(), Err(ParsePieceError::Empty));
        assert_eq!("...".parse::<Piece>(), Err(ParsePieceError::Empty));
        assert_eq!("##\n#".parse::<Piece>(), Err(ParsePieceError::RaggedRows));
        assert_eq!("######".parse::<Piece>(), Err(ParsePieceError::TooLarge));
        assert_eq!("#x".parse::<Piece>(), Err(ParsePieceError::InvalidCell('x')));
    }

    #[test]
    fn test_display_round_trip() {
        let piece = Piece::from_ascii(".#.\n###");
        assert_eq!(piece.to_string(), ".#.\n###");
        assert_eq!(Piece::from_ascii(&piece.to_string()), piece);
    }

    #[test]
    fn test_serialization() {
        let piece = Piece::from_ascii("##.\n.##");
        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"##./.##\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_deserialization_rejects_malformed_input() {
        assert!(serde_json::from_str::<Piece>("\"\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"##/#\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"#?#\"").is_err());
    }
}
