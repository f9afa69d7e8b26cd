//! A playable game: the turn controller plus whatever drives its agent seats.
//!
//! The session is what a UI talks to. Clicks arrive as pixel coordinates
//! and are resolved to cells; agent seats are advanced explicitly with
//! [`Session::advance_agents`], which blocks while an agent thinks. Both
//! take `&mut self`, so input can never interleave with an agent wait.

use tracing::{info, warn};

use super::controller::{MoveOutcome, TurnController, TurnSummary};
use super::mode::{GameMode, Seat};
use super::view::{Snapshot, Status};
use crate::agent::Agent;
use crate::board::Board;
use crate::core::{AdvanceError, AgentError, Color, ColorMap, ConfigError, GameConfig, Position};
use crate::explosion::{NoopObserver, WaveObserver};

/// A game with optional agents attached to each colour.
pub struct Session {
    controller: TurnController,
    agents: ColorMap<Option<Box<dyn Agent>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let agents: Vec<_> = self
            .agents
            .iter()
            .map(|(color, agent)| (color, agent.as_ref().map(|a| a.name().to_string())))
            .collect();
        f.debug_struct("Session")
            .field("controller", &self.controller)
            .field("agents", &agents)
            .finish()
    }
}

impl Session {
    /// Create a session with no agents attached.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: TurnController::new(config)?,
            agents: ColorMap::new(|_| None),
        })
    }

    /// Attach `agent` to `color`.
    #[must_use]
    pub fn with_agent(mut self, color: Color, agent: impl Agent + 'static) -> Self {
        self.set_agent(color, Box::new(agent));
        self
    }

    /// Attach `agent` to `color`, replacing any previous one.
    pub fn set_agent(&mut self, color: Color, agent: Box<dyn Agent>) {
        info!(%color, agent = agent.name(), "agent attached");
        self.agents[color] = Some(agent);
    }

    /// Detach and return the agent for `color`.
    pub fn take_agent(&mut self, color: Color) -> Option<Box<dyn Agent>> {
        self.agents[color].take()
    }

    /// The turn controller.
    #[must_use]
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        self.controller.board()
    }

    /// Status line data.
    #[must_use]
    pub fn status(&self) -> Status {
        self.controller.status()
    }

    /// Board and status for drawing.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.controller.snapshot()
    }

    /// Handle a click at pixel (`x`, `y`).
    pub fn click(&mut self, x: u32, y: u32) -> MoveOutcome {
        let pos = Position::from_pixel(x, y, self.controller.config().cell_size);
        self.human_move(pos)
    }

    /// Play `pos` for the colour to move, if a human controls it.
    pub fn human_move(&mut self, pos: Position) -> MoveOutcome {
        self.human_move_observed(pos, &mut NoopObserver)
    }

    /// Like [`human_move`](Self::human_move), reporting every wave.
    pub fn human_move_observed(
        &mut self,
        pos: Position,
        observer: &mut impl WaveObserver,
    ) -> MoveOutcome {
        self.controller.play_observed(pos, observer)
    }

    /// Play one agent turn if an agent seat is to move.
    ///
    /// Returns `Ok(None)` when a human is to move or the game is over.
    pub fn step_agent(
        &mut self,
        observer: &mut impl WaveObserver,
    ) -> Result<Option<TurnSummary>, AgentError> {
        if self.controller.is_over() || self.controller.seat_to_move() != Seat::Agent {
            return Ok(None);
        }
        let color = self.controller.current();
        let agent = self.agents[color]
            .as_mut()
            .ok_or(AgentError::Missing(color))?;
        match self.controller.run_agent_turn(&mut **agent, observer) {
            Ok(summary) => Ok(Some(summary)),
            Err(err) => {
                warn!(%color, agent = agent.name(), error = %err, "agent turn failed");
                Err(err)
            }
        }
    }

    /// Run agent turns until a human is to move or the game is over.
    ///
    /// Stops at the first failure; the failed turn leaves the board as it
    /// was, so the call can be retried. Turns played before the failure
    /// are carried in the error.
    pub fn advance_agents(
        &mut self,
        observer: &mut impl WaveObserver,
    ) -> Result<Vec<TurnSummary>, AdvanceError> {
        let mut played = Vec::new();
        loop {
            match self.step_agent(observer) {
                Ok(Some(summary)) => played.push(summary),
                Ok(None) => return Ok(played),
                Err(source) => return Err(AdvanceError { played, source }),
            }
        }
    }

    /// Switch mode and start a new game. Attached agents stay attached.
    pub fn set_mode(&mut self, mode: GameMode) {
        info!(%mode, "mode changed");
        self.controller.set_mode(mode);
    }

    /// Start a new game in the same mode.
    pub fn reset(&mut self) {
        self.controller.reset();
    }
}
