use alloc::vec::Vec;
use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The grid of cells owned by one session.
///
/// Stored as a single row-major buffer. Only the session (through the scheduler) mutates it;
/// everything else reads by value or through [`BoardSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            cells: Array2::default(nd_index(config.size())),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        GameConfig::new_unchecked(rows, cols).total_cells()
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[nd_index(coords)]
    }

    pub fn critical_mass_at(&self, coords: Coord2) -> ChipCount {
        critical_mass(coords, self.size())
    }

    pub fn is_critical(&self, coords: Coord2) -> bool {
        self.cell_at(coords).count >= self.critical_mass_at(coords)
    }

    /// Cells in row-major order together with their coordinates.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    /// In-bounds orthogonal neighbors in up, left, right, down order.
    pub fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        orthogonal_neighbors(coords, self.size())
    }

    pub fn total_chips(&self) -> ChipCount {
        self.cells.iter().map(|cell| cell.count).sum()
    }

    pub fn occupied_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| !cell.is_empty()).count() as CellCount
    }

    /// Whether no cell is at or above its critical mass.
    pub fn is_stable(&self) -> bool {
        self.unstable_cells().next().is_none()
    }

    pub fn unstable_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_cells()
            .filter(|&(coords, cell)| cell.count >= self.critical_mass_at(coords))
            .map(|(coords, _)| coords)
    }

    /// Whether every cell is either empty and unowned, or owned with at least one chip.
    pub fn is_consistent(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_consistent())
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let (rows, cols) = self.size();
        BoardSnapshot {
            rows,
            cols,
            cells: self.cells.iter().copied().collect(),
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[nd_index(coords)]
    }

    /// Builds a board from rows of `(count, owner)` pairs, bypassing the stability rules so
    /// tests can stage arbitrary positions.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&[(ChipCount, Option<u8>)]]) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        let cells: Vec<Cell> = rows
            .iter()
            .flat_map(|row| {
                assert_eq!(row.len(), width, "ragged test board");
                row.iter().map(|&(count, owner)| Cell {
                    count,
                    owner: owner.map(PlayerId),
                })
            })
            .collect();
        Self {
            cells: Array2::from_shape_vec((height, width), cells).unwrap(),
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd_index(coords)]
    }
}

fn nd_index((row, col): Coord2) -> [usize; 2] {
    [row.into(), col.into()]
}

pub(crate) fn orthogonal_neighbors(
    (row, col): Coord2,
    (rows, cols): Coord2,
) -> impl Iterator<Item = Coord2> {
    [
        row.checked_sub(1).map(|up| (up, col)),
        col.checked_sub(1).map(|left| (row, left)),
        (col + 1 < cols).then_some((row, col + 1)),
        (row + 1 < rows).then_some((row + 1, col)),
    ]
    .into_iter()
    .flatten()
}

/// Read-only copy of a board handed to callers for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: Coord,
    pub cols: Coord,
    /// Row-major, `rows * cols` entries.
    pub cells: Vec<Cell>,
}

impl BoardSnapshot {
    pub fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub fn cell_at(&self, (row, col): Coord2) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            self.cells
                .get(usize::from(row) * usize::from(self.cols) + usize::from(col))
                .copied()
        } else {
            None
        }
    }

    pub fn total_chips(&self) -> ChipCount {
        self.cells.iter().map(|cell| cell.count).sum()
    }
}
