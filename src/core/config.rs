//! Game configuration types.
//!
//! Games configure the engine at startup by providing:
//! - `GameConfig`: board shape, cell pixel size, starting colour, mode,
//!   cascade limits
//! - `ExchangeConfig`: where and how often to poll for an external agent
//!
//! Both use builder-style `with_*` methods on top of `Default`, which
//! reproduces the reference setup (9x6 board, 60 px cells, Red first,
//! Human vs Human, `gamestate.txt` polled every 500 ms).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::error::{BoardError, ConfigError};
use crate::game::GameMode;

/// Default board rows.
pub const DEFAULT_ROWS: usize = 9;
/// Default board columns.
pub const DEFAULT_COLS: usize = 6;
/// Default cell edge in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 60;
/// Default cascade safety valve.
pub const DEFAULT_MAX_WAVES: usize = 10_000;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board rows (at least 2).
    pub rows: usize,

    /// Board columns (at least 2).
    pub cols: usize,

    /// Cell edge in pixels, used to resolve clicks.
    pub cell_size: u32,

    /// Colour to move after a reset.
    pub starting_color: Color,

    /// Which seats are human and which are agents.
    pub mode: GameMode,

    /// Maximum waves a single cascade may run.
    pub max_waves: usize,

    /// Stop a cascade as soon as only the cascading colour remains.
    ///
    /// Such a board is already decided; with enough orbs it may also
    /// never settle.
    pub stop_when_decided: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_size: DEFAULT_CELL_SIZE,
            starting_color: Color::Red,
            mode: GameMode::HumanVsHuman,
            max_waves: DEFAULT_MAX_WAVES,
            stop_when_decided: true,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set board dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Set the cell size in pixels.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the starting colour.
    #[must_use]
    pub fn with_starting_color(mut self, color: Color) -> Self {
        self.starting_color = color;
        self
    }

    /// Set the game mode.
    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the cascade wave limit.
    #[must_use]
    pub fn with_max_waves(mut self, max_waves: usize) -> Self {
        self.max_waves = max_waves;
        self
    }

    /// Run cascades all the way to quiescence even once the board is decided.
    #[must_use]
    pub fn run_to_quiescence(mut self) -> Self {
        self.stop_when_decided = false;
        self
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(BoardError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            }
            .into());
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.max_waves == 0 {
            return Err(ConfigError::ZeroWaveLimit);
        }
        Ok(())
    }
}

/// Configuration for the file-based agent exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Shared state file.
    pub path: PathBuf,

    /// First delay between polls.
    pub poll_interval: Duration,

    /// Backoff ceiling; the delay doubles after each empty poll up to this.
    pub max_poll_interval: Duration,

    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("gamestate.txt"),
            poll_interval: Duration::from_millis(500),
            max_poll_interval: Duration::from_millis(500),
            timeout: None,
        }
    }
}

impl ExchangeConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the initial and maximum poll intervals.
    #[must_use]
    pub fn with_polling(mut self, initial: Duration, max: Duration) -> Self {
        self.poll_interval = initial;
        self.max_poll_interval = max;
        self
    }

    /// Set a timeout for each wait.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the polling parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() || self.max_poll_interval < self.poll_interval {
            return Err(ConfigError::PollInterval {
                initial: self.poll_interval,
                max: self.max_poll_interval,
            });
        }
        Ok(())
    }
}
