//! Error types.

use std::time::Duration;

use thiserror::Error;

use super::color::Color;
use super::position::Position;
use crate::game::{RejectReason, TurnSummary};

/// Board construction and access errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Coordinate outside the grid.
    #[error("position {pos} is outside the {rows}x{cols} board")]
    OutOfBounds {
        /// Offending position.
        pos: Position,
        /// Board rows.
        rows: usize,
        /// Board columns.
        cols: usize,
    },

    /// A cell's orb count would exceed `u32::MAX`.
    #[error("cell {pos} cannot hold another orb")]
    CountOverflow {
        /// Full cell.
        pos: Position,
    },

    /// Boards need at least two rows and two columns.
    #[error("invalid board dimensions {rows}x{cols} (minimum 2x2)")]
    InvalidDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },
}

/// Exchange-format parse errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No content at all.
    #[error("empty exchange content")]
    Empty,

    /// First line is not a known header.
    #[error("unknown header line {0:?}")]
    UnknownHeader(String),

    /// A cell token could not be parsed.
    #[error("bad cell token {token:?} at row {row}, column {col}")]
    BadToken {
        /// The token text.
        token: String,
        /// Row of the token.
        row: usize,
        /// Column of the token.
        col: usize,
    },

    /// Rows have differing lengths, or there are no rows.
    #[error("ragged or missing board rows")]
    Ragged,

    /// The parsed board has invalid dimensions.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Agent exchange protocol failures.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Channel I/O failed while writing a handoff.
    #[error("exchange channel I/O: {0}")]
    Io(#[from] std::io::Error),

    /// The agent's board does not have the expected shape.
    #[error("agent board is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    DimensionMismatch {
        /// Expected rows.
        rows: usize,
        /// Expected columns.
        cols: usize,
        /// Rows received.
        found_rows: usize,
        /// Columns received.
        found_cols: usize,
    },

    /// The agent's board differs from the handed-off board in zero or
    /// several cells.
    #[error("agent board differs in {changed} cells, expected exactly 1")]
    AmbiguousDiff {
        /// Number of differing cells.
        changed: usize,
    },

    /// The single changed cell is not a legal placement for the agent.
    #[error("agent placed at {pos}, which {color} cannot play")]
    IllegalPlacement {
        /// Changed cell.
        pos: Position,
        /// Agent colour.
        color: Color,
    },

    /// The agent's move could not be applied to the board.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// The wait was cancelled.
    #[error("wait for agent move cancelled")]
    Cancelled,

    /// No move arrived within the configured timeout.
    #[error("no agent move after {0:?}")]
    TimedOut(Duration),
}

/// Errors raised while obtaining a move from an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Exchange protocol failure.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The agent has no legal move to offer.
    #[error("{0} has no legal move")]
    NoLegalMove(Color),

    /// A seat configured for an agent has none attached.
    #[error("no agent attached for {0}")]
    Missing(Color),

    /// The turn controller refused the agent's move.
    #[error("agent move rejected: {0}")]
    Rejected(#[from] RejectReason),
}

impl AgentError {
    /// Check if the same agent turn may succeed when asked again.
    ///
    /// Protocol faults, I/O failures, timeouts and refused moves leave the
    /// game untouched and are worth retrying. A missing agent, a colour
    /// with no legal move and a cancelled wait are not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            AgentError::Exchange(ExchangeError::Cancelled) => false,
            AgentError::Exchange(_) | AgentError::Rejected(_) => true,
            AgentError::NoLegalMove(_) | AgentError::Missing(_) => false,
        }
    }
}

/// A run of agent turns that stopped on a failure.
///
/// Turns played before the failure stay on the board and are listed in
/// `played`.
#[derive(Debug, Error)]
#[error("{source} (after {} agent turns)", .played.len())]
pub struct AdvanceError {
    /// Turns completed before the failure.
    pub played: Vec<TurnSummary>,
    /// The failure.
    #[source]
    pub source: AgentError,
}

/// Configuration validation errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid board shape.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Cell size of zero pixels.
    #[error("cell size must be positive")]
    ZeroCellSize,

    /// A wave limit of zero would stop every cascade before it starts.
    #[error("max_waves must be positive")]
    ZeroWaveLimit,

    /// Poll interval of zero, or max interval below the initial one.
    #[error("invalid poll intervals: initial {initial:?}, max {max:?}")]
    PollInterval {
        /// Initial interval.
        initial: Duration,
        /// Maximum interval.
        max: Duration,
    },

    /// Unrecognised game mode label.
    #[error("unknown game mode {0:?}")]
    UnknownMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BoardError::OutOfBounds {
            pos: Position::new(9, 0),
            rows: 9,
            cols: 6,
        };
        assert_eq!(err.to_string(), "position (9, 0) is outside the 9x6 board");

        let err = ExchangeError::AmbiguousDiff { changed: 3 };
        assert_eq!(err.to_string(), "agent board differs in 3 cells, expected exactly 1");

        let err: AgentError = ExchangeError::Cancelled.into();
        assert_eq!(err.to_string(), "wait for agent move cancelled");

        let err = AdvanceError {
            played: Vec::new(),
            source: AgentError::Missing(Color::Blue),
        };
        assert_eq!(err.to_string(), "no agent attached for Blue (after 0 agent turns)");
    }

    #[test]
    fn test_protocol_faults_are_recoverable() {
        let recoverable: Vec<AgentError> = vec![
            ExchangeError::AmbiguousDiff { changed: 2 }.into(),
            ExchangeError::DimensionMismatch {
                rows: 9,
                cols: 6,
                found_rows: 3,
                found_cols: 3,
            }
            .into(),
            ExchangeError::IllegalPlacement {
                pos: Position::new(0, 0),
                color: Color::Blue,
            }
            .into(),
            ExchangeError::TimedOut(Duration::from_secs(1)).into(),
            RejectReason::OpponentCell(Position::new(0, 0)).into(),
        ];
        for err in &recoverable {
            assert!(err.is_recoverable(), "{err}");
        }

        let fatal = [
            AgentError::Exchange(ExchangeError::Cancelled),
            AgentError::Missing(Color::Red),
            AgentError::NoLegalMove(Color::Blue),
        ];
        for err in &fatal {
            assert!(!err.is_recoverable(), "{err}");
        }
    }
}
