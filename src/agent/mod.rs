//! Move sources for agent seats.
//!
//! An `Agent` is anything that can name a cell for a colour given the
//! current board: the out-of-process agent behind
//! [`ExchangeAgent`](crate::exchange::ExchangeAgent), or the in-process
//! [`RandomAgent`] used to drive AI-vs-AI sessions and tests.

use crate::board::Board;
use crate::core::{AgentError, Color, GameRng, GameRngState, Position};
use crate::rules::{ChainReactionRules, RulesEngine};

/// A source of moves for one seat.
///
/// `next_move` may block (the exchange agent waits for another process);
/// the turn controller holds no other input while it does.
pub trait Agent {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Choose a cell for `color` on `board`.
    fn next_move(&mut self, board: &Board, color: Color) -> Result<Position, AgentError>;
}

/// Picks uniformly among the legal moves.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
    rules: ChainReactionRules,
}

impl RandomAgent {
    /// Create an agent with its own seeded stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_rng(GameRng::new(seed))
    }

    /// Create an agent drawing from `rng`.
    #[must_use]
    pub fn from_rng(rng: GameRng) -> Self {
        Self {
            rng,
            rules: ChainReactionRules::new(),
        }
    }

    /// Two agents on independent streams forked from one seed, Red first.
    #[must_use]
    pub fn pair(seed: u64) -> (Self, Self) {
        let mut root = GameRng::new(seed);
        let red = Self::from_rng(root.fork());
        let blue = Self::from_rng(root.fork());
        (red, blue)
    }

    /// Capture the agent's stream so a match can be resumed.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Resume an agent from a captured stream.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        Self::from_rng(GameRng::from_state(state))
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn next_move(&mut self, board: &Board, color: Color) -> Result<Position, AgentError> {
        let moves = self.rules.legal_moves(board, color);
        self.rng
            .choose(&moves)
            .ok_or(AgentError::NoLegalMove(color))
    }
}
