//! Grid coordinates.
//!
//! A `Position` is a (row, col) pair, 0-based, row-major. Bounds are
//! always checked against the board that owns the grid; a position by
//! itself carries no dimensions.
//!
//! ```
//! use chain_reaction::core::Position;
//!
//! let pos = Position::new(2, 3);
//! assert_eq!(pos.index(6), 15);
//! assert_eq!(Position::from_index(15, 6), pos);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Orthogonal neighbour offsets in visiting order: up, down, left, right.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A cell coordinate on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0 = top).
    pub row: usize,
    /// Column index (0 = left).
    pub col: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index for a grid with `cols` columns.
    #[must_use]
    pub const fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub const fn from_index(index: usize, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }

    /// Check whether this position lies inside a `rows` x `cols` grid.
    #[must_use]
    pub const fn in_bounds(self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// In-bounds orthogonal neighbours, visited up, down, left, right.
    #[must_use]
    pub fn neighbors(self, rows: usize, cols: usize) -> SmallVec<[Position; 4]> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| {
                let row = self.row.checked_add_signed(dr)?;
                let col = self.col.checked_add_signed(dc)?;
                let next = Position::new(row, col);
                next.in_bounds(rows, cols).then_some(next)
            })
            .collect()
    }

    /// Resolve a pixel coordinate to a cell by integer division.
    ///
    /// `x` selects the column and `y` the row; bounds are left to the
    /// caller. `cell_size` must be non-zero.
    #[must_use]
    pub const fn from_pixel(x: u32, y: u32, cell_size: u32) -> Self {
        Self {
            row: (y / cell_size) as usize,
            col: (x / cell_size) as usize,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}
