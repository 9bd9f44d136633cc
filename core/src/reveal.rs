use ndarray::{Array2, ArrayView2, Zip};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::*;

/// What the player sees of a [`MineGrid`].
///
/// Holds a handle to the grid rather than a copy, so a random grid populated by the caller after
/// construction is picked up on the next `uncover`. The grid is only mutated here by
/// [`RevealState::reset_display`].
#[derive(Clone, Debug)]
pub struct RevealState {
    grid: SharedMineGrid,
    status: Array2<CellStatus>,
    flagged_count: CellCount,
    opened_safe_count: CellCount,
    over: bool,
}

impl RevealState {
    pub fn new(grid: SharedMineGrid) -> Self {
        let size = grid.borrow().size();
        Self {
            grid,
            status: Array2::default(size.to_nd_index()),
            flagged_count: 0,
            opened_safe_count: 0,
            over: false,
        }
    }

    pub fn grid(&self) -> &SharedMineGrid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.status.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn status(&self, row: Coord, col: Coord) -> Result<CellStatus> {
        let coords = self.validate_coords(row, col)?;
        Ok(self.status[coords.to_nd_index()])
    }

    pub fn is_uncovered(&self, row: Coord, col: Coord) -> Result<bool> {
        Ok(self.status(row, col)?.is_uncovered())
    }

    /// Whole board, indexed by `[row, col]`.
    pub fn cells(&self) -> ArrayView2<'_, CellStatus> {
        self.status.view()
    }

    /// Mines minus flags, negative when the player placed more flags than there are mines.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.grid.borrow().mine_count()) - i64::from(self.flagged_count)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn opened_safe_count(&self) -> CellCount {
        self.opened_safe_count
    }

    /// Cycles a covered cell through flagged, questioned and back to covered.
    ///
    /// Still allowed once the game is over, uncovered cells just report no change.
    pub fn cycle_flag(&mut self, row: Coord, col: Coord) -> Result<MarkOutcome> {
        use CellStatus::*;
        use MarkOutcome::*;

        let coords = self.validate_coords(row, col)?;

        let index = coords.to_nd_index();
        Ok(match self.status[index] {
            Covered => {
                self.status[index] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.status[index] = Questioned;
                self.flagged_count -= 1;
                Changed
            }
            Questioned => {
                self.status[index] = Covered;
                Changed
            }
            _ => NoChange,
        })
    }

    /// Opens a cell, flooding outwards when it has no adjacent mines.
    ///
    /// Uncovering a mine ends the game even when the cell is flagged. A flagged safe cell is left
    /// alone and reported as [`RevealOutcome::NoChange`].
    pub fn uncover(&mut self, row: Coord, col: Coord) -> Result<RevealOutcome> {
        let coords = self.validate_coords(row, col)?;
        self.check_not_over()?;

        let shared = Rc::clone(&self.grid);
        let grid = shared.borrow();
        self.check_same_size(&grid)?;

        if grid[coords] {
            log::debug!("Uncovered mine at {:?}", coords);
            self.status[coords.to_nd_index()] = CellStatus::MineHit;
            self.end_game(&grid, false);
            return Ok(RevealOutcome::HitMine);
        }

        Ok(self.flood_uncover(&grid, coords))
    }

    /// Back to an untouched board. Also clears the grid, so a random grid has to be populated again.
    ///
    /// The board is rebuilt to the grid's current size, which recovers from a grid that was
    /// swapped behind the handle.
    pub fn reset_display(&mut self) {
        let size = self.grid.borrow().size();
        if size == self.size() {
            self.status.fill(CellStatus::Covered);
        } else {
            log::debug!("Grid resized from {:?} to {:?}, rebuilding board", self.size(), size);
            self.status = Array2::default(size.to_nd_index());
        }
        self.flagged_count = 0;
        self.opened_safe_count = 0;
        self.over = false;
        self.grid.borrow_mut().clear_all();
        log::debug!("Board reset");
    }

    fn flood_uncover(&mut self, grid: &MineGrid, start: Coord2) -> RevealOutcome {
        use CellStatus::*;

        let mut opened: CellCount = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            // flags block the flood, questions do not
            if !matches!(self.status[coords.to_nd_index()], Covered | Questioned) {
                continue;
            }

            let adjacent = grid.count_adjacent(coords);
            self.status[coords.to_nd_index()] = Revealed(adjacent);
            self.opened_safe_count += 1;
            opened += 1;
            log::trace!("Opened {:?}, adjacent mines: {}", coords, adjacent);

            if self.opened_safe_count == grid.safe_cell_count() {
                self.end_game(grid, true);
                return RevealOutcome::Won;
            }

            if adjacent == 0 {
                to_visit.extend(grid.iter_neighbors(coords).filter(|&pos| {
                    matches!(self.status[pos.to_nd_index()], Covered | Questioned)
                }));
            }
        }

        log::debug!("Uncovered {} cells starting at {:?}", opened, start);
        if opened > 0 {
            RevealOutcome::Revealed
        } else {
            RevealOutcome::NoChange
        }
    }

    fn end_game(&mut self, grid: &MineGrid, won: bool) {
        self.over = true;
        log::debug!(
            "Game over, {} with {} of {} safe cells open",
            if won { "won" } else { "lost" },
            self.opened_safe_count,
            grid.safe_cell_count()
        );
        self.reveal_mines(grid, won);
    }

    /// Winning flags every mine still hidden. Losing shows them and marks wrong flags.
    fn reveal_mines(&mut self, grid: &MineGrid, won: bool) {
        use CellStatus::*;

        let mut auto_flagged: CellCount = 0;
        Zip::from(&mut self.status)
            .and(grid.mine_mask())
            .for_each(|status, &is_mine| {
                *status = match (*status, is_mine, won) {
                    (Covered | Questioned, true, true) => {
                        auto_flagged += 1;
                        Flagged
                    }
                    (Covered | Questioned, true, false) => MineMissed,
                    (Flagged, false, false) => GuessWrong,
                    (unchanged, _, _) => unchanged,
                };
            });
        self.flagged_count += auto_flagged;
    }

    fn validate_coords(&self, row: Coord, col: Coord) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if row < rows && col < cols {
            Ok((row, col))
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }

    fn check_same_size(&self, grid: &MineGrid) -> Result<()> {
        if grid.size() == self.size() {
            Ok(())
        } else {
            log::warn!(
                "Grid is {:?} but board is {:?}, reset the board before playing",
                grid.size(),
                self.size()
            );
            Err(GameError::GridMismatch)
        }
    }

    fn check_not_over(&self) -> Result<()> {
        if self.over {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
