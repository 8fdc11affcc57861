//! Square toroidal grid of cell states.

use symgrid_core::{CellCounts, CellState, Position};

/// Moore neighborhood offsets as (dx, dy)
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// A row-major square grid with wrap-around edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// All-neutral grid. `size` must be at least 1.
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0);
        Self {
            size,
            cells: vec![CellState::Neutral; size * size],
        }
    }

    /// Build from row-major rows. Caller guarantees a non-empty square shape.
    pub(crate) fn from_rows(rows: Vec<Vec<CellState>>) -> Self {
        let size = rows.len();
        let cells: Vec<CellState> = rows.into_iter().flatten().collect();
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Wrap a flat row-major buffer of `size * size` cells
    pub(crate) fn from_cells(size: usize, cells: Vec<CellState>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    pub(crate) fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> CellState,
    {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(f(x, y));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Get cell at position (with toroidal wrapping)
    pub fn get(&self, pos: Position) -> CellState {
        self.cells[self.pos_to_index(pos.wrap(self.size))]
    }

    /// Set cell at position (with toroidal wrapping)
    pub fn set(&mut self, pos: Position, state: CellState) {
        let index = self.pos_to_index(pos.wrap(self.size));
        self.cells[index] = state;
    }

    /// States of the 8 Moore neighbors. On a 1x1 or 2x2 grid some
    /// neighbors are the same cell seen through different edges.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = CellState> + '_ {
        MOORE_OFFSETS
            .iter()
            .map(move |&(dx, dy)| self.get(pos.add(dx, dy)))
    }

    pub fn counts(&self) -> CellCounts {
        CellCounts::tally(&self.cells)
    }

    /// Nested rows, `rows[y][x]`
    pub fn rows(&self) -> Vec<Vec<CellState>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.to_vec())
            .collect()
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (self.index_to_pos(i), cell))
    }

    fn pos_to_index(&self, wrapped: Position) -> usize {
        wrapped.y as usize * self.size + wrapped.x as usize
    }

    fn index_to_pos(&self, index: usize) -> Position {
        Position::new((index % self.size) as i64, (index / self.size) as i64)
    }
}
