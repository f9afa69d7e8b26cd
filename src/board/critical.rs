//! Critical-mass policy.
//!
//! A cell explodes once it holds as many orbs as its critical mass:
//! 2 in the four corners, 3 along the other edge cells, 4 inside.
//! On any board of at least 2x2 this equals the number of in-bounds
//! neighbours, so an explosion hands out exactly the orbs it removes.

use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Where a cell sits relative to the board boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// One of the four corners.
    Corner,
    /// On the boundary but not a corner.
    Edge,
    /// Not on the boundary.
    Interior,
}

impl CellKind {
    /// Classify `pos` on a `rows` x `cols` board.
    #[must_use]
    pub const fn classify(pos: Position, rows: usize, cols: usize) -> Self {
        let top_or_bottom = pos.row == 0 || pos.row + 1 == rows;
        let left_or_right = pos.col == 0 || pos.col + 1 == cols;
        match (top_or_bottom, left_or_right) {
            (true, true) => CellKind::Corner,
            (true, false) | (false, true) => CellKind::Edge,
            (false, false) => CellKind::Interior,
        }
    }

    /// Explosion threshold for this kind of cell.
    #[must_use]
    pub const fn critical_mass(self) -> u32 {
        match self {
            CellKind::Corner => 2,
            CellKind::Edge => 3,
            CellKind::Interior => 4,
        }
    }
}

/// Explosion threshold of `pos` on a `rows` x `cols` board.
///
/// ```
/// use chain_reaction::board::critical_mass;
/// use chain_reaction::core::Position;
///
/// assert_eq!(critical_mass(Position::new(0, 0), 9, 6), 2);
/// assert_eq!(critical_mass(Position::new(0, 3), 9, 6), 3);
/// assert_eq!(critical_mass(Position::new(4, 3), 9, 6), 4);
/// ```
#[must_use]
pub const fn critical_mass(pos: Position, rows: usize, cols: usize) -> u32 {
    CellKind::classify(pos, rows, cols).critical_mass()
}
