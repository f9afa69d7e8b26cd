//! Core type bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::board;
use crate::core::{Color, Position};

/// Python wrapper for Position.
#[pyclass(name = "Position")]
#[derive(Clone, Copy, Debug)]
pub struct PyPosition(pub Position);

#[pymethods]
impl PyPosition {
    #[new]
    fn new(row: usize, col: usize) -> Self {
        Self(Position::new(row, col))
    }

    #[getter]
    fn row(&self) -> usize {
        self.0.row
    }

    #[getter]
    fn col(&self) -> usize {
        self.0.col
    }

    fn __repr__(&self) -> String {
        format!("Position({}, {})", self.0.row, self.0.col)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        (self.0.row as u64) << 32 | self.0.col as u64
    }
}

/// Explosion threshold of (`row`, `col`) on a `rows` x `cols` board.
#[pyfunction]
pub fn critical_mass(row: usize, col: usize, rows: usize, cols: usize) -> u32 {
    board::critical_mass(Position::new(row, col), rows, cols)
}

/// Accept `R`/`B` or `Red`/`Blue`, case-insensitively.
pub(crate) fn parse_color(text: &str) -> PyResult<Color> {
    match text.trim().to_ascii_lowercase().as_str() {
        "r" | "red" => Ok(Color::Red),
        "b" | "blue" => Ok(Color::Blue),
        other => Err(PyValueError::new_err(format!("unknown colour {other:?}"))),
    }
}
