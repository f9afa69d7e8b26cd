//! Board state and the critical-mass policy.
//!
//! The board is pure data: placement, clearing and tallies, no I/O and no
//! notion of whose turn it is. The critical-mass policy is a pure function
//! of position and board shape.

mod critical;
mod grid;

pub use critical::{critical_mass, CellKind};
pub use grid::Board;
