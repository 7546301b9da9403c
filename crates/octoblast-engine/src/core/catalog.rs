use std::sync::LazyLock;

use super::piece::Piece;

/// Base polyomino designs, one per shape family. Rotations and mirrors are
/// derived, so each family is listed in a single orientation.
const BASE_SHAPES: [&str; 11] = [
    "#####",
    "####",
    "###",
    "##/##",
    "###/###/###",
    "###/###",
    ".#./###",
    "#./#./##",
    "##/.#",
    "#../#../###",
    "##./.##",
];

static CANONICAL_PIECES: LazyLock<Vec<Piece>> = LazyLock::new(|| {
    let mut pieces = Vec::new();
    for art in BASE_SHAPES {
        let base = Piece::from_ascii(art);
        for variant in symmetry_variants(base) {
            if !pieces.contains(&variant) {
                pieces.push(variant);
            }
        }
    }
    pieces
});

/// The canonical piece set: every rotation and mirror of the base designs,
/// de-duplicated by structural equality, in a stable order.
///
/// Built once per process and shared read-only by all searches.
#[must_use]
pub fn canonical_pieces() -> &'static [Piece] {
    &CANONICAL_PIECES
}

/// The 12 symmetry variants of a shape: 4 quarter-turn rotations plus the
/// horizontal and vertical mirror of each rotation. Includes the identity
/// and usually many duplicates for symmetric shapes.
fn symmetry_variants(base: Piece) -> [Piece; 12] {
    let quarter = base.rotated();
    let half = quarter.rotated();
    let three_quarter = half.rotated();
    [
        base,
        quarter,
        half,
        three_quarter,
        base.mirrored_horizontal(),
        quarter.mirrored_horizontal(),
        half.mirrored_horizontal(),
        three_quarter.mirrored_horizontal(),
        base.mirrored_vertical(),
        quarter.mirrored_vertical(),
        half.mirrored_vertical(),
        three_quarter.mirrored_vertical(),
    ]
}
