//! Conversions from engine types into wire views.

use chain_reaction_core::{BoardSnapshot, Cell, ExplosionReport};
use chain_reaction_protocol::{BoardView, CellView};

pub fn board_view(snapshot: &BoardSnapshot) -> BoardView {
    BoardView {
        rows: snapshot.rows,
        cols: snapshot.cols,
        cells: snapshot.cells.iter().map(cell_view).collect(),
    }
}

pub fn cell_view(cell: &Cell) -> CellView {
    CellView {
        count: cell.count,
        owner: cell.owner.map(|owner| owner.0),
    }
}

pub fn wave_view(report: &ExplosionReport) -> Vec<Vec<[u8; 2]>> {
    report
        .waves
        .iter()
        .map(|wave| wave.iter().map(|&(row, col)| [row, col]).collect())
        .collect()
}
