//! The text format shared with an external agent.
//!
//! ```text
//! Human Move:
//! 0 0 1R 0 0 0
//! 0 2B 0 0 0 0
//! ...
//! ```
//!
//! The header names whose move was just written. Each following line is a
//! board row of space-separated tokens: `0` for an empty cell, otherwise
//! the orb count followed by `R` or `B`. Every line ends with `\n`.

use crate::board::Board;
use crate::core::{Cell, FormatError};

/// First line of the exchange text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Header {
    /// Written by the host: the human side has moved, the agent is up.
    HumanMove,
    /// Written by the agent: it has added its orb.
    AgentMove,
}

impl Header {
    /// The header line, without its newline.
    #[must_use]
    pub const fn line(self) -> &'static str {
        match self {
            Header::HumanMove => "Human Move:",
            Header::AgentMove => "AI Move:",
        }
    }

    /// Recognise a header line. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "Human Move:" => Some(Header::HumanMove),
            "AI Move:" => Some(Header::AgentMove),
            _ => None,
        }
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.line())
    }
}

/// A parsed exchange: who wrote it and the board they wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exchange {
    /// Header line.
    pub header: Header,
    /// Board rows.
    pub board: Board,
}

impl Exchange {
    /// Render as exchange text.
    #[must_use]
    pub fn to_text(&self) -> String {
        write_board(self.header, &self.board)
    }
}

/// Render `board` under `header`.
#[must_use]
pub fn write_board(header: Header, board: &Board) -> String {
    // "12R " is a generous per-cell estimate.
    let mut out = String::with_capacity(header.line().len() + 1 + board.rows() * board.cols() * 4);
    out.push_str(header.line());
    out.push('\n');
    out.push_str(&board.to_string());
    out
}

/// Parse exchange text.
///
/// Blank lines are ignored. Rows must all have the same number of tokens.
pub fn parse(text: &str) -> Result<Exchange, FormatError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let first = lines.next().ok_or(FormatError::Empty)?;
    let header =
        Header::parse(first).ok_or_else(|| FormatError::UnknownHeader(first.trim().to_string()))?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (row, line) in lines.enumerate() {
        let cells = line
            .split_whitespace()
            .enumerate()
            .map(|(col, token)| {
                Cell::from_token(token).ok_or_else(|| FormatError::BadToken {
                    token: token.to_string(),
                    row,
                    col,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    let width = rows.first().map_or(0, Vec::len);
    if width == 0 || rows.iter().any(|row| row.len() != width) {
        return Err(FormatError::Ragged);
    }
    let board = Board::from_rows(rows)?;
    Ok(Exchange { header, board })
}
