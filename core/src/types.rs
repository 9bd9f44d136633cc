use ndarray::Array2;

/// Single coordinate axis used for row/column counts and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        // dimensions are built from `Coord` values, so they always fit back
        let size = (rows as Coord, cols as Coord);
        NeighborIter::new(index, size)
    }
}

/// Neighbor offsets in row-major order, so neighbors come out top row first, left to right.
static NEIGHBOR_OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Shifts `coords` by `offset`, `None` when that leaves the `bounds` rectangle.
fn offset_within(coords: Coord2, offset: (i16, i16), bounds: Coord2) -> Option<Coord2> {
    let row = coords.0.checked_add_signed(offset.0).filter(|&row| row < bounds.0)?;
    let col = coords.1.checked_add_signed(offset.1).filter(|&col| col < bounds.1)?;
    Some((row, col))
}

/// Iterates the up-to-eight cells around a center, clipped at the grid edges.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    offsets: std::slice::Iter<'static, (i16, i16)>,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            offsets: NEIGHBOR_OFFSETS.iter(),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let (center, bounds) = (self.center, self.bounds);
        self.offsets.find_map(|&offset| offset_within(center, offset, bounds))
    }
}
