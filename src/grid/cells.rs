use crate::foundation::error::{VeilError, VeilResult};

/// `(row, col)` position in a [`CellGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    /// Row index (top is 0).
    pub row: usize,
    /// Column index (left is 0).
    pub col: usize,
}

impl Cell {
    /// Create a cell position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Fixed-size infection matrix used by queue-driven propagation.
///
/// A cell flips to infected exactly once and never reverts. The grid is never resized; a new
/// surface size needs a new grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    infected: Vec<bool>,
    remaining: usize,
}

impl CellGrid {
    /// Allocate an all-uninfected grid.
    pub fn new(rows: usize, cols: usize) -> VeilResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(VeilError::validation(format!(
                "cell grid must be non-empty, got {rows}x{cols}"
            )));
        }
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| VeilError::validation("cell grid size overflows"))?;
        Ok(Self {
            rows,
            cols,
            infected: vec![false; len],
            remaining: len,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.infected.len()
    }

    /// Always `false`; grids are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.infected.is_empty()
    }

    /// Number of cells not yet infected.
    pub fn uninfected(&self) -> usize {
        self.remaining
    }

    /// Return `true` once every cell is infected.
    pub fn is_full(&self) -> bool {
        self.remaining == 0
    }

    /// Resolve `(row, col)` shifted by `(d_row, d_col)` if it stays in bounds.
    pub fn shifted(&self, cell: Cell, d_row: i32, d_col: i32) -> Option<Cell> {
        let row = cell.row.checked_add_signed(d_row as isize)?;
        let col = cell.col.checked_add_signed(d_col as isize)?;
        (row < self.rows && col < self.cols).then_some(Cell { row, col })
    }

    /// Return `true` if `cell` is infected. Out-of-range cells read as uninfected.
    pub fn is_infected(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.infected[i])
    }

    /// Infect `cell`. Returns `true` only on the uninfected -> infected transition.
    pub fn infect(&mut self, cell: Cell) -> bool {
        let Some(i) = self.index(cell) else {
            return false;
        };
        if self.infected[i] {
            return false;
        }
        self.infected[i] = true;
        self.remaining -= 1;
        true
    }

    /// Infect every remaining cell, returning the newly infected ones in row-major order.
    pub fn infect_all(&mut self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(self.remaining);
        for (i, v) in self.infected.iter_mut().enumerate() {
            if !*v {
                *v = true;
                out.push(Cell {
                    row: i / self.cols,
                    col: i % self.cols,
                });
            }
        }
        self.remaining = 0;
        out
    }

    /// Iterate infected cells in row-major order.
    pub fn infected_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.infected
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| Cell {
                row: i / self.cols,
                col: i % self.cols,
            })
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols).then(|| cell.row * self.cols + cell.col)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/cells.rs"]
mod tests;
