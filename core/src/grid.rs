use ndarray::{Array2, ArrayView2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use crate::*;

/// Handle through which a caller and a [`RevealState`] share one grid.
///
/// Only one side should mutate at a time: the reveal state borrows the grid for the duration of a
/// single `uncover` or `reset_display` call, so callers must not hold a `borrow_mut` across those.
///
/// Keep the dimensions fixed while a game runs. A grid of another size swapped in behind the handle
/// makes `uncover` fail with [`GameError::GridMismatch`] until the board is reset.
pub type SharedMineGrid = Rc<RefCell<MineGrid>>;

/// Where the mines are.
///
/// A grid built from explicit data always holds `mine_count` mines. A grid built from dimensions
/// starts empty and only holds `mine_count` mines after [`MineGrid::populate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SerializedMineGrid")]
pub struct MineGrid {
    mines: Array2<bool>,
    mine_count: CellCount,
}

/// Unchecked wire form, turned into a [`MineGrid`] only through [`TryFrom`].
#[derive(Deserialize)]
struct SerializedMineGrid {
    mines: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<SerializedMineGrid> for MineGrid {
    type Error = GameError;

    /// The stored count must match the mask, unless the mask is empty (an unpopulated or reset grid).
    fn try_from(serialized: SerializedMineGrid) -> Result<Self> {
        let mut grid = Self::from_mine_mask(serialized.mines)?;
        match grid.mine_count {
            0 => grid.mine_count = serialized.mine_count,
            count if count == serialized.mine_count => {}
            _ => return Err(GameError::MineCountMismatch),
        }
        Ok(grid)
    }
}

impl MineGrid {
    /// Copies a row-major layout, every row must have the same non-zero length.
    pub fn from_layout<R: AsRef<[bool]>>(layout: &[R]) -> Result<Self> {
        let rows = layout.len();
        let cols = layout.first().map_or(0, |row| row.as_ref().len());
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidShape);
        }
        if layout.iter().any(|row| row.as_ref().len() != cols) {
            return Err(GameError::InvalidShape);
        }

        let mine_mask = Array2::from_shape_fn((rows, cols), |(row, col)| layout[row].as_ref()[col]);
        Self::from_mine_mask(mine_mask)
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidShape);
        }
        if Coord::try_from(rows).is_err() || Coord::try_from(cols).is_err() {
            return Err(GameError::InvalidDimension);
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Ok(Self {
            mines: mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new_empty(size.0, size.1, 0)?;

        for &(row, col) in mine_coords {
            grid.validate_coords(row, col)?;
            grid[(row, col)] = true;
        }
        grid.mine_count = grid.mines.iter().filter(|&&is_mine| is_mine).count() as CellCount;

        Ok(grid)
    }

    /// Empty grid that will hold `mine_count` mines once populated.
    ///
    /// `mine_count` is not checked here, keeping it below a third of the cells is up to the caller.
    pub fn new_empty(rows: Coord, cols: Coord, mine_count: CellCount) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimension);
        }

        Ok(Self {
            mines: Array2::default((rows, cols).to_nd_index()),
            mine_count,
        })
    }

    pub fn from_config(config: GridConfig) -> Result<Self> {
        Self::new_empty(config.rows, config.cols, config.mines)
    }

    pub fn into_shared(self) -> SharedMineGrid {
        Rc::new(RefCell::new(self))
    }

    /// Clears the grid and scatters `mine_count` mines at random, never at `(avoid_row, avoid_col)`.
    pub fn populate(&mut self, avoid_row: Coord, avoid_col: Coord) -> Result<()> {
        self.populate_with_rng(avoid_row, avoid_col, &mut rand::rng())
    }

    /// Same as [`MineGrid::populate`] with a caller-provided generator.
    ///
    /// Cells are sampled uniformly and retried until enough mines land. Only the exact avoided
    /// cell is excluded, its row and column stay eligible.
    pub fn populate_with_rng<R: Rng + ?Sized>(
        &mut self,
        avoid_row: Coord,
        avoid_col: Coord,
        rng: &mut R,
    ) -> Result<()> {
        self.validate_coords(avoid_row, avoid_col)?;

        let total_cells = self.total_cells();
        if self.mine_count >= total_cells {
            log::warn!(
                "Cannot place {} mines around a safe cell, grid only has {} cells",
                self.mine_count,
                total_cells
            );
            return Err(GameError::TooManyMines);
        }

        self.clear_all();

        let (rows, cols) = self.size();
        let mut placed: CellCount = 0;
        while placed < self.mine_count {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if coords != (avoid_row, avoid_col) && !self[coords] {
                self[coords] = true;
                placed += 1;
            }
        }

        log::debug!(
            "Populated {} mines on {}x{} grid avoiding ({}, {})",
            placed,
            rows,
            cols,
            avoid_row,
            avoid_col
        );
        Ok(())
    }

    /// Removes every mine, `mine_count` and dimensions are kept.
    pub fn clear_all(&mut self) {
        self.mines.fill(false);
    }

    pub fn in_range(&self, row: Coord, col: Coord) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn validate_coords(&self, row: Coord, col: Coord) -> Result<Coord2> {
        if self.in_range(row, col) {
            Ok((row, col))
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }

    pub fn has_mine(&self, row: Coord, col: Coord) -> Result<bool> {
        let coords = self.validate_coords(row, col)?;
        Ok(self[coords])
    }

    /// Number of mines in the up to eight surrounding cells, not counting the cell itself.
    pub fn adjacent_mine_count(&self, row: Coord, col: Coord) -> Result<u8> {
        let coords = self.validate_coords(row, col)?;
        Ok(self.count_adjacent(coords))
    }

    pub(crate) fn count_adjacent(&self, coords: Coord2) -> u8 {
        // at most eight neighbors
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mines.iter_neighbors(coords)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mines.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.rows(), self.cols())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    /// Mine map indexed by `[row, col]`.
    pub fn mine_mask(&self) -> ArrayView2<'_, bool> {
        self.mines.view()
    }

    pub fn config(&self) -> GridConfig {
        GridConfig::new_unchecked(self.rows(), self.cols(), self.mine_count)
    }
}

impl Index<Coord2> for MineGrid {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for MineGrid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.mines[coords.to_nd_index()]
    }
}

/// Debug dump: dimensions, target mine count and the full mine map.
impl fmt::Display for MineGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MineGrid rows: {}, cols: {}, mines: {}",
            self.rows(),
            self.cols(),
            self.mine_count
        )?;
        for row in self.mines.rows() {
            let mut first = true;
            for &is_mine in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{is_mine}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
