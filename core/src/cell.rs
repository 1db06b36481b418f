use serde::{Deserialize, Serialize};

use crate::*;

/// Chips stacked on one grid cell and the player they belong to.
///
/// An empty cell has no owner and an owned cell holds at least one chip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub count: ChipCount,
    pub owner: Option<PlayerId>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        count: 0,
        owner: None,
    };

    pub const fn new(count: ChipCount, owner: PlayerId) -> Self {
        Self {
            count,
            owner: Some(owner),
        }
    }

    pub const fn is_empty(self) -> bool {
        self.count == 0
    }

    /// Whether the count/owner pairing is consistent.
    pub const fn is_consistent(self) -> bool {
        (self.count == 0) == self.owner.is_none()
    }

    pub fn is_owned_by(self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}
