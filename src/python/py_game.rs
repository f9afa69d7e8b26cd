//! Game bindings for Python.

use std::time::Duration;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::agent::RandomAgent;
use crate::core::{ExchangeConfig, GameConfig};
use crate::exchange::{format, ExchangeAgent, FileChannel, Header};
use crate::explosion::NoopObserver;
use crate::game::{GameMode, Session};

use super::py_core::{parse_color, PyPosition};

/// Python wrapper for a game session.
///
/// Holds boxed agents, so it stays on the thread that created it.
#[pyclass(unsendable, name = "ChainReaction")]
pub struct PyChainReaction {
    session: Session,
}

#[pymethods]
impl PyChainReaction {
    /// Create a new game.
    ///
    /// # Arguments
    /// - rows, cols: board shape (each at least 2)
    /// - cell_size: pixel edge used by `click`
    /// - mode: "Human vs Human", "Human vs AI", "AI vs AI" or hvh/hva/ava
    #[new]
    #[pyo3(signature = (rows = 9, cols = 6, cell_size = 60, mode = "hvh"))]
    fn new(rows: usize, cols: usize, cell_size: u32, mode: &str) -> PyResult<Self> {
        let mode: GameMode = mode
            .parse()
            .map_err(|err: crate::core::ConfigError| PyValueError::new_err(err.to_string()))?;
        let config = GameConfig::default()
            .with_dimensions(rows, cols)
            .with_cell_size(cell_size)
            .with_mode(mode);
        let session = Session::new(config).map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(Self { session })
    }

    /// Drive `color` with a seeded random agent.
    #[pyo3(signature = (color, seed = 0))]
    fn attach_random_agent(&mut self, color: &str, seed: u64) -> PyResult<()> {
        let color = parse_color(color)?;
        self.session.set_agent(color, Box::new(RandomAgent::new(seed)));
        Ok(())
    }

    /// Drive `color` with an external agent reading and writing `path`.
    #[pyo3(signature = (color, path = "gamestate.txt", poll_ms = 500, timeout_ms = None))]
    fn attach_file_agent(
        &mut self,
        color: &str,
        path: &str,
        poll_ms: u64,
        timeout_ms: Option<u64>,
    ) -> PyResult<()> {
        let color = parse_color(color)?;
        let poll = Duration::from_millis(poll_ms);
        let mut config = ExchangeConfig::default().with_path(path).with_polling(poll, poll);
        if let Some(ms) = timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
            .validate()
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        let channel = FileChannel::new(config.path.clone());
        self.session
            .set_agent(color, Box::new(ExchangeAgent::new(channel, config)));
        Ok(())
    }

    /// Handle a click at pixel (`x`, `y`).
    ///
    /// Returns the cell played, or None if the click was ignored.
    fn click(&mut self, x: u32, y: u32) -> Option<PyPosition> {
        self.session
            .click(x, y)
            .summary()
            .map(|summary| PyPosition(summary.position))
    }

    /// Play (`row`, `col`) for the colour to move. Returns False if ignored.
    fn place(&mut self, row: usize, col: usize) -> bool {
        self.session
            .human_move(crate::core::Position::new(row, col))
            .is_resolved()
    }

    /// Run agent turns until a human is to move or the game ends.
    ///
    /// Returns the number of turns played. On failure raises RuntimeError
    /// with args `(message, turns_played)`; those turns stay on the board.
    fn advance_agents(&mut self) -> PyResult<usize> {
        self.session
            .advance_agents(&mut NoopObserver)
            .map(|played| played.len())
            .map_err(|err| PyRuntimeError::new_err((err.source.to_string(), err.played.len())))
    }

    /// Board rows as exchange tokens ("0", "2R", ...).
    fn board(&self) -> Vec<Vec<String>> {
        let board = self.session.board();
        (0..board.rows())
            .map(|row| board.row(row).map(|cell| cell.to_string()).collect())
            .collect()
    }

    /// The board in exchange format under a "Human Move:" header.
    fn exchange_text(&self) -> String {
        format::write_board(Header::HumanMove, self.session.board())
    }

    /// Status line, e.g. "Red's Turn (Human)".
    fn status(&self) -> String {
        self.session.status().to_string()
    }

    /// Colour to move, "R" or "B".
    #[getter]
    fn current(&self) -> String {
        self.session.status().current.symbol().to_string()
    }

    /// Winning colour, once there is one.
    #[getter]
    fn winner(&self) -> Option<String> {
        self.session
            .status()
            .winner
            .map(|color| color.symbol().to_string())
    }

    /// Current turn number.
    #[getter]
    fn turn_number(&self) -> u32 {
        self.session.controller().turn_number()
    }

    /// Orbs of `color` on the board.
    fn orb_count(&self, color: &str) -> PyResult<u32> {
        Ok(self.session.board().orb_count(parse_color(color)?))
    }

    /// Start a new game in the same mode.
    fn reset(&mut self) {
        self.session.reset();
    }

    /// Switch mode and start a new game.
    fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        let mode: GameMode = mode
            .parse()
            .map_err(|err: crate::core::ConfigError| PyValueError::new_err(err.to_string()))?;
        self.session.set_mode(mode);
        Ok(())
    }

    fn __repr__(&self) -> String {
        let status = self.session.status();
        format!(
            "ChainReaction(mode={:?}, turn={}, status={:?})",
            self.session.controller().mode().label(),
            self.session.controller().turn_number(),
            status.to_string()
        )
    }
}
