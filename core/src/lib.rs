//! Playable state of a Minesweeper game.
//!
//! [`MineGrid`] knows where the mines are. [`RevealState`] wraps a shared grid and tracks what the
//! player has uncovered, flagged or questioned, flood-opens zero regions and detects the end of the
//! game. Rendering, input handling and timers live outside this crate.

use serde::{Deserialize, Serialize};

pub use error::*;
pub use grid::*;
pub use reveal::*;
pub use status::*;
pub use types::*;

mod error;
mod grid;
mod reveal;
mod status;
mod types;

/// Board dimensions and the number of mines to scatter on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GridConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Clamps both dimensions to at least one cell. The mine count is taken as is.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        Self::new_unchecked(rows, cols, mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    /// `false` only when the uncovered cell was a mine.
    pub const fn is_safe(self) -> bool {
        !matches!(self, Self::HitMine)
    }
}
