use crate::*;

/// Explosion threshold for the cell at `(row, col)` on a `rows` x `cols` grid.
///
/// Corners take 2 chips, other border cells 3 and interior cells 4, which is the number of
/// orthogonal neighbors the cell has. Grids narrower than 2 on either axis are rejected by
/// [`GameConfig::new`] and never reach this function.
pub const fn critical_mass((row, col): Coord2, (rows, cols): Coord2) -> ChipCount {
    debug_assert!(rows >= 2 && cols >= 2);
    let row_edge = row == 0 || row == rows.saturating_sub(1);
    let col_edge = col == 0 || col == cols.saturating_sub(1);
    match (row_edge, col_edge) {
        (true, true) => 2,
        (true, false) | (false, true) => 3,
        (false, false) => 4,
    }
}
