//! The orb grid.
//!
//! Cells are stored row-major in an `im::Vector`, so cloning a board for a
//! renderer snapshot or the move history is O(1).

use std::ops::Index;

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::critical::critical_mass;
use crate::core::{BoardError, Cell, Color, ColorMap, Position};

/// A `rows` x `cols` grid of cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vector<Cell>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Both dimensions must be at least 2.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows < 2 || cols < 2 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: Vector::from(vec![Cell::Empty; rows * cols]),
        })
    }

    /// Build a board from row-major rows of cells.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(BoardError::InvalidDimensions {
                rows: height,
                cols: width,
            });
        }
        let mut board = Self::new(height, width)?;
        board.cells = rows.into_iter().flatten().collect();
        Ok(board)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check whether `pos` is on the board.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.rows, self.cols)
    }

    fn check(&self, pos: Position) -> Result<usize, BoardError> {
        if self.contains(pos) {
            Ok(pos.index(self.cols))
        } else {
            Err(BoardError::OutOfBounds {
                pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    // === Access ===

    /// Get the cell at `pos`.
    pub fn get(&self, pos: Position) -> Result<Cell, BoardError> {
        let index = self.check(pos)?;
        Ok(self.cells[index])
    }

    /// Overwrite the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<(), BoardError> {
        let index = self.check(pos)?;
        self.cells.set(index, cell);
        Ok(())
    }

    /// Overwrite a cell the caller already knows is on the board.
    pub(crate) fn put(&mut self, pos: Position, cell: Cell) {
        debug_assert!(self.contains(pos));
        self.cells.set(pos.index(self.cols), cell);
    }

    /// Add one orb of `color` at `pos` and return the resulting cell.
    ///
    /// An empty cell becomes `1<color>`; an occupied one gains an orb and
    /// takes `color` as owner. Rejecting placements on opponent cells is
    /// the rules' job, not the board's. A cell already holding `u32::MAX`
    /// orbs is left alone.
    pub fn place(&mut self, pos: Position, color: Color) -> Result<Cell, BoardError> {
        let index = self.check(pos)?;
        let cell = self.cells[index]
            .checked_plus_one(color)
            .ok_or(BoardError::CountOverflow { pos })?;
        self.cells.set(index, cell);
        Ok(cell)
    }

    /// Empty the cell at `pos`.
    pub fn clear(&mut self, pos: Position) -> Result<(), BoardError> {
        self.set(pos, Cell::Empty)
    }

    /// Reinitialise to an empty `rows` x `cols` board.
    pub fn reset(&mut self, rows: usize, cols: usize) -> Result<(), BoardError> {
        *self = Self::new(rows, cols)?;
        Ok(())
    }

    // === Geometry ===

    /// Explosion threshold at `pos`.
    #[must_use]
    pub fn critical_mass(&self, pos: Position) -> u32 {
        critical_mass(pos, self.rows, self.cols)
    }

    /// In-bounds orthogonal neighbours of `pos` (up, down, left, right).
    #[must_use]
    pub fn neighbors(&self, pos: Position) -> SmallVec<[Position; 4]> {
        pos.neighbors(self.rows, self.cols)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * cols).map(move |i| Position::from_index(i, cols))
    }

    /// Iterate over (Position, Cell) pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Position::from_index(i, cols), cell))
    }

    /// Cells of one row, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Cell> + '_ {
        let start = (row * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        self.cells.iter().skip(start).take(end - start).copied()
    }

    // === Tallies ===

    /// Orbs held by each colour.
    #[must_use]
    pub fn orb_counts(&self) -> ColorMap<u32> {
        let mut counts = ColorMap::with_value(0);
        for cell in &self.cells {
            if let Cell::Occupied { count, owner } = *cell {
                counts[owner] += count;
            }
        }
        counts
    }

    /// Orbs held by `color`.
    #[must_use]
    pub fn orb_count(&self, color: Color) -> u32 {
        self.orb_counts()[color]
    }

    /// Orbs on the board.
    #[must_use]
    pub fn total_orbs(&self) -> u32 {
        self.cells.iter().map(|cell| cell.count()).sum()
    }

    /// Cells owned by `color`.
    #[must_use]
    pub fn cells_owned(&self, color: Color) -> usize {
        self.cells.iter().filter(|cell| cell.is_owned_by(color)).count()
    }

    /// Check whether `pos` holds at least its critical mass.
    #[must_use]
    pub fn is_critical(&self, pos: Position) -> bool {
        self.get(pos)
            .is_ok_and(|cell| cell.count() >= self.critical_mass(pos))
    }

    /// Positions at or above critical mass, row-major.
    #[must_use]
    pub fn critical_cells(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.is_critical(pos)).collect()
    }

    /// True when no cell is at or above critical mass.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.positions().all(|pos| !self.is_critical(pos))
    }

    /// Positions whose cells differ from `other`, row-major.
    ///
    /// Returns `None` when the boards have different dimensions.
    #[must_use]
    pub fn diff(&self, other: &Board) -> Option<Vec<Position>> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(
            self.iter()
                .zip(other.cells.iter())
                .filter(|((_, mine), theirs)| mine != *theirs)
                .map(|((pos, _), _)| pos)
                .collect(),
        )
    }
}

impl Index<Position> for Board {
    type Output = Cell;

    /// Panics when `pos` is off the board.
    fn index(&self, pos: Position) -> &Self::Output {
        assert!(
            self.contains(pos),
            "position {pos} is outside the {}x{} board",
            self.rows,
            self.cols
        );
        &self.cells[pos.index(self.cols)]
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            let mut first = true;
            for cell in self.row(row) {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{cell}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(9, 6).unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let b = board();
        assert_eq!((b.rows(), b.cols()), (9, 6));
        assert_eq!(b.total_orbs(), 0);
        assert!(b.iter().all(|(_, cell)| cell.is_empty()));
        assert!(b.is_quiescent());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Board::new(1, 6),
            Err(BoardError::InvalidDimensions { rows: 1, cols: 6 })
        );
        assert!(Board::new(6, 0).is_err());
        assert!(Board::new(2, 2).is_ok());
    }

    #[test]
    fn test_place_same_color_increments() {
        let mut b = board();
        let pos = Position::new(3, 3);
        assert_eq!(b.place(pos, Color::Red).unwrap(), Cell::with_orbs(1, Color::Red));
        assert_eq!(b.place(pos, Color::Red).unwrap(), Cell::with_orbs(2, Color::Red));
        assert_eq!(b.orb_count(Color::Red), 2);
        assert_eq!(b.cells_owned(Color::Red), 1);
    }

    #[test]
    fn test_place_is_permissive_on_opponent_cell() {
        let mut b = board();
        let pos = Position::new(3, 3);
        b.place(pos, Color::Blue).unwrap();
        assert_eq!(b.place(pos, Color::Red).unwrap(), Cell::with_orbs(2, Color::Red));
    }

    #[test]
    fn test_place_on_full_cell() {
        let mut b = board();
        let pos = Position::new(4, 2);
        b.set(pos, Cell::with_orbs(u32::MAX, Color::Blue)).unwrap();
        assert_eq!(b.place(pos, Color::Blue), Err(BoardError::CountOverflow { pos }));
        assert_eq!(b[pos], Cell::with_orbs(u32::MAX, Color::Blue));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut b = board();
        let pos = Position::new(9, 0);
        let err = BoardError::OutOfBounds { pos, rows: 9, cols: 6 };
        assert_eq!(b.get(pos), Err(err.clone()));
        assert_eq!(b.place(pos, Color::Red), Err(err.clone()));
        assert_eq!(b.clear(pos), Err(err));
        assert!(!b.is_critical(pos));
    }

    #[test]
    #[should_panic(expected = "outside the 9x6 board")]
    fn test_index_out_of_bounds_panics() {
        let _ = board()[Position::new(0, 6)];
    }

    #[test]
    fn test_clear_and_reset() {
        let mut b = board();
        b.place(Position::new(0, 0), Color::Red).unwrap();
        b.place(Position::new(1, 1), Color::Blue).unwrap();

        b.clear(Position::new(0, 0)).unwrap();
        assert!(b[Position::new(0, 0)].is_empty());
        assert_eq!(b.total_orbs(), 1);

        b.reset(4, 5).unwrap();
        assert_eq!((b.rows(), b.cols()), (4, 5));
        assert_eq!(b.total_orbs(), 0);
    }

    #[test]
    fn test_critical_cells() {
        let mut b = board();
        b.set(Position::new(0, 0), Cell::with_orbs(2, Color::Red)).unwrap();
        b.set(Position::new(4, 4), Cell::with_orbs(3, Color::Red)).unwrap();
        b.set(Position::new(0, 2), Cell::with_orbs(3, Color::Blue)).unwrap();

        assert_eq!(b.critical_cells(), vec![Position::new(0, 0), Position::new(0, 2)]);
        assert!(!b.is_quiescent());
    }

    #[test]
    fn test_diff() {
        let a = board();
        let mut b = a.clone();
        assert_eq!(a.diff(&b), Some(vec![]));

        b.place(Position::new(2, 1), Color::Blue).unwrap();
        b.place(Position::new(5, 5), Color::Blue).unwrap();
        assert_eq!(a.diff(&b), Some(vec![Position::new(2, 1), Position::new(5, 5)]));

        assert_eq!(a.diff(&Board::new(6, 9).unwrap()), None);
    }

    #[test]
    fn test_from_rows() {
        let b = Board::from_rows(vec![
            vec![Cell::Empty, Cell::with_orbs(1, Color::Red)],
            vec![Cell::with_orbs(2, Color::Blue), Cell::Empty],
        ])
        .unwrap();
        assert_eq!(b[Position::new(0, 1)], Cell::with_orbs(1, Color::Red));
        assert_eq!(b[Position::new(1, 0)], Cell::with_orbs(2, Color::Blue));

        assert!(Board::from_rows(vec![vec![Cell::Empty; 2], vec![Cell::Empty; 3]]).is_err());
        assert!(Board::from_rows(vec![]).is_err());
    }

    #[test]
    fn test_display() {
        let mut b = Board::new(2, 3).unwrap();
        b.place(Position::new(0, 1), Color::Red).unwrap();
        b.place(Position::new(1, 2), Color::Blue).unwrap();
        b.place(Position::new(1, 2), Color::Blue).unwrap();
        assert_eq!(b.to_string(), "0 1R 0\n0 0 2B\n");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = board();
        let snapshot = a.clone();
        a.place(Position::new(0, 0), Color::Red).unwrap();
        assert_eq!(snapshot.total_orbs(), 0);
        assert_eq!(a.total_orbs(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut b = Board::new(3, 3).unwrap();
        b.place(Position::new(1, 1), Color::Blue).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
