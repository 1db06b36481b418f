use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;

use crate::*;

/// Everything one placed chip did to the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Cells that exploded at least once.
    pub exploded: BTreeSet<Coord2>,
    /// Cells whose count or owner changed, including the placed cell.
    pub touched: BTreeSet<Coord2>,
    /// How many times each exploded cell went off.
    pub explosion_counts: BTreeMap<Coord2, u32>,
    /// Explosions grouped by cascade depth, in the order they were resolved.
    pub waves: Vec<Vec<Coord2>>,
    /// The cascade could never settle and was stopped once every cell had exploded. The mover
    /// then owns every occupied cell, but the board keeps cells at or above critical mass.
    pub halted: bool,
}

impl ExplosionReport {
    pub fn explosions(&self) -> u32 {
        self.explosion_counts.values().sum()
    }

    pub fn explosions_at(&self, coords: Coord2) -> u32 {
        self.explosion_counts.get(&coords).copied().unwrap_or(0)
    }

    pub fn has_chain_reaction(&self) -> bool {
        !self.exploded.is_empty()
    }

    fn record_explosion(&mut self, coords: Coord2, depth: usize) {
        self.exploded.insert(coords);
        *self.explosion_counts.entry(coords).or_insert(0) += 1;
        if self.waves.len() <= depth {
            self.waves.resize_with(depth + 1, Vec::new);
        }
        self.waves[depth].push(coords);
    }
}

/// Cells waiting to be re-checked, tagged with their cascade depth.
type Pending = (Coord2, usize);

/// Pop order for the cascade.
pub(crate) trait Frontier {
    fn push(&mut self, item: Pending);
    fn pop(&mut self) -> Option<Pending>;
    fn is_empty(&self) -> bool;
}

impl Frontier for VecDeque<Pending> {
    fn push(&mut self, item: Pending) {
        self.push_back(item);
    }

    fn pop(&mut self) -> Option<Pending> {
        self.pop_front()
    }

    fn is_empty(&self) -> bool {
        VecDeque::is_empty(self)
    }
}

/// Places one chip for `player` at `coords` and resolves the resulting chain reaction.
///
/// Takes the board by value and hands back the resolved board, so a caller previewing a move
/// works on its own copy. The move must already be validated.
pub fn run_cascade(mut board: Board, player: PlayerId, coords: Coord2) -> (Board, ExplosionReport) {
    let report = cascade_in_place(&mut board, player, coords);
    (board, report)
}

pub(crate) fn cascade_in_place(board: &mut Board, player: PlayerId, coords: Coord2) -> ExplosionReport {
    cascade_with(board, player, coords, VecDeque::new())
}

/// Cascade driver generic over pop order. FIFO is the canonical order; tests also drive it
/// LIFO to compare outcomes.
pub(crate) fn cascade_with<F: Frontier>(
    board: &mut Board,
    player: PlayerId,
    coords: Coord2,
    mut pending: F,
) -> ExplosionReport {
    let mut report = ExplosionReport::default();
    let total_cells = usize::from(board.total_cells());

    let placed = board.cell_at(coords);
    *board.cell_mut(coords) = Cell::new(placed.count + 1, player);
    report.touched.insert(coords);
    pending.push((coords, 0));

    while let Some((coords, depth)) = pending.pop() {
        let cell = board.cell_at(coords);
        let threshold = board.critical_mass_at(coords);

        // queued cells may have been resolved by an earlier pop
        if cell.count < threshold {
            continue;
        }
        let Some(owner) = cell.owner else {
            debug_assert!(false, "chips without owner at {coords:?}");
            continue;
        };

        let remaining = cell.count - threshold;
        let after = if remaining == 0 {
            Cell::EMPTY
        } else {
            Cell::new(remaining, owner)
        };
        *board.cell_mut(coords) = after;
        report.record_explosion(coords, depth);
        log::trace!(
            "Explosion at {:?} by {}, depth: {}, remaining: {}",
            coords,
            owner,
            depth,
            remaining
        );

        if remaining >= threshold {
            pending.push((coords, depth + 1));
        }

        for neighbor in board.iter_neighbors(coords) {
            let next = board.cell_at(neighbor);
            *board.cell_mut(neighbor) = Cell::new(next.count + 1, owner);
            report.touched.insert(neighbor);
            if board.is_critical(neighbor) {
                pending.push((neighbor, depth + 1));
            }
        }

        // a cascade that settles always leaves some cell unexploded
        if report.exploded.len() == total_cells {
            debug_assert_eq!(OwnerTally::from_board(board).sole_owner(), Some(owner));
            log::debug!(
                "Cascade halted after {} explosions, every cell went off and {} owns the board",
                report.explosions(),
                owner
            );
            report.halted = true;
            break;
        }
    }

    report
}
