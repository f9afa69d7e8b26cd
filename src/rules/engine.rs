//! Rules engine trait and the Chain Reaction rules.
//!
//! The rules decide:
//! - Which cells a colour may place on
//! - When the game is over
//!
//! They never mutate the board; placement and cascades belong to the
//! board and the explosion engine.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{Color, Position};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(Color),
}

impl GameResult {
    /// The winning colour.
    #[must_use]
    pub const fn winner(self) -> Color {
        match self {
            GameResult::Winner(color) => color,
        }
    }

    /// Check if a colour won.
    #[must_use]
    pub fn is_winner(self, color: Color) -> bool {
        self.winner() == color
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `is_legal`: must reject out-of-bounds positions rather than panic
/// - `winner`: return `None` while the game continues
pub trait RulesEngine {
    /// Check if `color` may place an orb at `pos`.
    fn is_legal(&self, board: &Board, pos: Position, color: Color) -> bool;

    /// Check if the game is over.
    fn winner(&self, board: &Board) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Every cell `color` may place on, row-major.
    fn legal_moves(&self, board: &Board, color: Color) -> Vec<Position> {
        board
            .positions()
            .filter(|&pos| self.is_legal(board, pos, color))
            .collect()
    }
}

/// Standard two-colour Chain Reaction rules.
///
/// - A colour may place on an empty cell or one it already owns; opponent
///   cells can only be taken through explosions.
/// - Once more than one orb is on the board, a colour with no orbs left
///   has lost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainReactionRules;

impl ChainReactionRules {
    /// Create the rules.
    pub fn new() -> Self {
        Self
    }
}

impl RulesEngine for ChainReactionRules {
    fn is_legal(&self, board: &Board, pos: Position, color: Color) -> bool {
        board
            .get(pos)
            .is_ok_and(|cell| cell.is_empty() || cell.is_owned_by(color))
    }

    fn winner(&self, board: &Board) -> Option<GameResult> {
        let counts = board.orb_counts();
        let (red, blue) = (counts[Color::Red], counts[Color::Blue]);
        // The very first orb must not end the game.
        if red + blue <= 1 {
            return None;
        }
        match (red, blue) {
            (0, _) => Some(GameResult::Winner(Color::Blue)),
            (_, 0) => Some(GameResult::Winner(Color::Red)),
            _ => None,
        }
    }
}
