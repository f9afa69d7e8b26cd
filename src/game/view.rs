//! Read-only views handed to a renderer.

use serde::{Deserialize, Serialize};

use super::controller::TurnPhase;
use super::mode::Seat;
use crate::board::Board;
use crate::core::Color;

/// What the status bar shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Colour to move.
    pub current: Color,
    /// Who controls that colour.
    pub seat: Seat,
    /// Turn phase.
    pub phase: TurnPhase,
    /// Winner, once the game is over.
    pub winner: Option<Color>,
}

impl Status {
    /// Check if the game has been won.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}

impl std::fmt::Display for Status {
    /// `Red's Turn (Human)`, `Blue's Turn (AI)` or `Red wins!`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.winner {
            Some(winner) => write!(f, "{winner} wins!"),
            None => write!(f, "{}'s Turn ({})", self.current, self.seat.label()),
        }
    }
}

/// Board and status at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The board.
    pub board: Board,
    /// Status line data.
    pub status: Status,
    /// Turn number being played.
    pub turn: u32,
}
