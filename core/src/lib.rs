//! Chain reaction board engine.
//!
//! Players take turns adding a chip to an empty cell or one they already own. A cell holding
//! as many chips as it has orthogonal neighbors explodes, sending one chip to each neighbor
//! and converting it to the exploding player, which may in turn push neighbors over their own
//! threshold. [`GameSession`] drives a whole game; callers only ever see [`BoardSnapshot`]s.
#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use policy::*;
pub use scheduler::*;
pub use types::*;
pub use validator::*;
pub use win::*;

mod board;
mod cell;
mod engine;
mod error;
mod policy;
mod scheduler;
mod types;
mod validator;
mod win;

/// Board shape chosen when a session is created, fixed for the session's lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
}

impl GameConfig {
    /// Smallest side length for which every cell has a positive critical mass.
    pub const MIN_SIDE: Coord = 2;

    pub const fn new_unchecked(rows: Coord, cols: Coord) -> Self {
        Self { rows, cols }
    }

    pub fn new(rows: Coord, cols: Coord) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols);
        config.validate()?;
        Ok(config)
    }

    /// Configs can also arrive deserialized, so sessions re-check them.
    pub fn validate(&self) -> Result<()> {
        if self.rows < Self::MIN_SIDE || self.cols < Self::MIN_SIDE {
            Err(GameError::InvalidConfiguration)
        } else {
            Ok(())
        }
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        (self.rows as CellCount) * (self.cols as CellCount)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(6, 6)
    }
}
