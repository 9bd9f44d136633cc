use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// The first three variants are the covered states a player can cycle through.
/// Everything else is uncovered: `Revealed` carries the adjacent mine count of a
/// safe cell, the remaining variants only appear once a game is lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Covered,
    Flagged,
    Questioned,
    Revealed(u8),
    /// The mine that was uncovered and lost the game.
    MineHit,
    /// A mine that was neither flagged nor triggered, shown after a loss.
    MineMissed,
    /// A flag placed on a safe cell, shown after a loss.
    GuessWrong,
}

impl CellStatus {
    pub const fn is_uncovered(self) -> bool {
        !self.is_covered()
    }

    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged | Self::Questioned)
    }

    /// Adjacent mine count of an opened safe cell.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            _ => None,
        }
    }
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::Covered
    }
}
