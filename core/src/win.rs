use smallvec::SmallVec;

use crate::*;

/// Occupied-cell counts per player, players with no cells omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerTally {
    counts: SmallVec<[(PlayerId, CellCount); 4]>,
}

impl OwnerTally {
    pub fn from_board(board: &Board) -> Self {
        let mut tally = Self::default();
        for (_, cell) in board.iter_cells() {
            if let Some(owner) = cell.owner {
                tally.add(owner);
            }
        }
        tally
    }

    pub fn count(&self, player: PlayerId) -> CellCount {
        self.counts
            .iter()
            .find(|&&(owner, _)| owner == player)
            .map_or(0, |&(_, count)| count)
    }

    pub fn occupied(&self) -> CellCount {
        self.counts.iter().map(|&(_, count)| count).sum()
    }

    /// The only player holding cells, if exactly one does.
    pub fn sole_owner(&self) -> Option<PlayerId> {
        match self.counts.as_slice() {
            [(owner, _)] => Some(*owner),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, CellCount)> + '_ {
        self.counts.iter().copied()
    }

    fn add(&mut self, player: PlayerId) {
        match self.counts.iter_mut().find(|(owner, _)| *owner == player) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((player, 1)),
        }
    }
}

/// Scores a settled board.
///
/// `started` is whether any move had been made before the one that produced `board`; the
/// opening move leaves a single owner on the board and must not count as a win.
pub fn detect_winner(board: &Board, started: bool) -> Option<PlayerId> {
    if !started {
        return None;
    }
    OwnerTally::from_board(board).sole_owner()
}
