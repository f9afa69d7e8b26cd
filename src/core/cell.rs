//! Cell state.
//!
//! A cell is either empty or holds `count >= 1` orbs of a single colour.
//! The exchange token form is `0` for empty and `<count><symbol>` otherwise
//! (`2R`, `1B`).

use serde::{Deserialize, Serialize};

use super::color::Color;

/// State of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// No orbs.
    #[default]
    Empty,
    /// One or more orbs of `owner`'s colour.
    Occupied {
        /// Orb count, always at least 1.
        count: u32,
        /// Owning colour.
        owner: Color,
    },
}

impl Cell {
    /// Build a cell from a count, collapsing zero to `Empty`.
    #[must_use]
    pub const fn with_orbs(count: u32, owner: Color) -> Self {
        if count == 0 {
            Cell::Empty
        } else {
            Cell::Occupied { count, owner }
        }
    }

    /// Orb count (0 when empty).
    #[must_use]
    pub const fn count(self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied { count, .. } => count,
        }
    }

    /// Owning colour, if any.
    #[must_use]
    pub const fn owner(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Occupied { owner, .. } => Some(owner),
        }
    }

    /// Check if the cell is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Check if the cell holds orbs of `color`.
    #[must_use]
    pub fn is_owned_by(self, color: Color) -> bool {
        self.owner() == Some(color)
    }

    /// The cell after one more orb of `color` lands on it.
    ///
    /// Ownership is always overwritten; this is the capture rule. The
    /// count saturates at `u32::MAX`.
    #[must_use]
    pub const fn plus_one(self, color: Color) -> Self {
        Cell::Occupied {
            count: self.count().saturating_add(1),
            owner: color,
        }
    }

    /// Like [`Cell::plus_one`], `None` if the count is already `u32::MAX`.
    #[must_use]
    pub const fn checked_plus_one(self, color: Color) -> Option<Self> {
        match self.count().checked_add(1) {
            Some(count) => Some(Cell::Occupied { count, owner: color }),
            None => None,
        }
    }

    /// Parse an exchange token (`0`, `3R`).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        if token == "0" {
            return Some(Cell::Empty);
        }
        let symbol = token.chars().last()?;
        let owner = Color::from_symbol(symbol)?;
        let digits = &token[..token.len() - symbol.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let count: u32 = digits.parse().ok()?;
        (count > 0).then_some(Cell::Occupied { count, owner })
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => f.write_str("0"),
            Cell::Occupied { count, owner } => write!(f, "{}{}", count, owner.symbol()),
        }
    }
}
