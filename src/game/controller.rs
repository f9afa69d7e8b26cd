//! Turn controller: the single owner of the board and whose turn it is.
//!
//! ## Phases
//!
//! ```text
//! AwaitingInput --legal move--> ExplodingInProgress --quiescent--> TurnComplete
//! TurnComplete --winner--> GameOver
//! TurnComplete --no winner--> AwaitingInput (other colour)
//! any phase --reset--> AwaitingInput (empty board, starting colour)
//! ```
//!
//! `TurnComplete` is transient: the controller leaves it before returning
//! from the call that completed the cascade.
//!
//! Moves are either resolved synchronously ([`TurnController::play`],
//! [`TurnController::submit`]) or wave by wave ([`TurnController::begin`]
//! followed by [`TurnController::step`]). While a cascade is in flight
//! every new move is rejected, never queued.

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::mode::{GameMode, Seat};
use super::view::{Snapshot, Status};
use crate::agent::Agent;
use crate::board::Board;
use crate::core::{AgentError, Color, ConfigError, GameConfig, Position};
use crate::explosion::{
    CascadeProgress, CascadeReport, ExplosionEngine, NoopObserver, WaveObserver, WaveReport,
};
use crate::rules::{ChainReactionRules, GameResult, RulesEngine};

/// Where the controller is within a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the colour to move.
    AwaitingInput,
    /// A cascade is being resolved.
    ExplodingInProgress,
    /// The cascade has settled; the win check is running.
    TurnComplete,
    /// A colour has won. Only `reset` leaves this phase.
    GameOver,
}

/// Why a move was refused. A refused move changes nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The cell is off the board.
    #[error("position {0} is off the board")]
    OutOfBounds(Position),

    /// The cell belongs to the other colour.
    #[error("cell {0} belongs to the opponent")]
    OpponentCell(Position),

    /// A cascade is still being resolved.
    #[error("a cascade is still resolving")]
    CascadeRunning,

    /// The game has been won.
    #[error("the game is over")]
    GameOver,

    /// The colour to move is played by an agent, not from input.
    #[error("{0} is played by an agent")]
    AgentToMove(Color),

    /// The move was made for the colour not on turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(Color),
}

/// Everything a completed turn changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnSummary {
    /// Colour that moved.
    pub mover: Color,
    /// Cell the orb was placed on.
    pub position: Position,
    /// How the cascade went.
    pub cascade: CascadeReport,
    /// Set when the move ended the game.
    pub result: Option<GameResult>,
    /// Colour to move next; `None` once the game is over.
    pub next: Option<Color>,
}

/// Result of offering a move to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was played and its cascade resolved.
    Resolved(TurnSummary),
    /// The move was ignored.
    Rejected(RejectReason),
}

impl MoveOutcome {
    /// Check if the move was played.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, MoveOutcome::Resolved(_))
    }

    /// Summary of a played move.
    #[must_use]
    pub fn summary(&self) -> Option<&TurnSummary> {
        match self {
            MoveOutcome::Resolved(summary) => Some(summary),
            MoveOutcome::Rejected(_) => None,
        }
    }

    /// Reason a move was ignored.
    #[must_use]
    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            MoveOutcome::Resolved(_) => None,
            MoveOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

impl From<Result<TurnSummary, RejectReason>> for MoveOutcome {
    fn from(result: Result<TurnSummary, RejectReason>) -> Self {
        match result {
            Ok(summary) => MoveOutcome::Resolved(summary),
            Err(reason) => MoveOutcome::Rejected(reason),
        }
    }
}

/// One entry in the move history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based turn number.
    pub turn: u32,
    /// Colour that moved.
    pub color: Color,
    /// Cell the orb was placed on.
    pub position: Position,
    /// Waves the cascade took.
    pub waves: usize,
}

/// Result of [`TurnController::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnStep {
    /// One wave resolved; more may follow.
    Wave(WaveReport),
    /// The cascade settled and the turn is complete.
    Complete(TurnSummary),
}

#[derive(Clone, Debug)]
struct InFlight {
    mover: Color,
    position: Position,
    progress: CascadeProgress,
}

/// Owns the board and drives turns.
#[derive(Clone, Debug)]
pub struct TurnController {
    config: GameConfig,
    rules: ChainReactionRules,
    engine: ExplosionEngine,
    blank: Board,
    board: Board,
    current: Color,
    phase: TurnPhase,
    result: Option<GameResult>,
    turn_number: u32,
    history: Vector<MoveRecord>,
    in_flight: Option<InFlight>,
}

impl TurnController {
    /// Create a controller with an empty board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let blank = Board::new(config.rows, config.cols)?;
        Ok(Self {
            rules: ChainReactionRules::new(),
            engine: ExplosionEngine::from_config(&config),
            board: blank.clone(),
            blank,
            current: config.starting_color,
            phase: TurnPhase::AwaitingInput,
            result: None,
            turn_number: 1,
            history: Vector::new(),
            in_flight: None,
            config,
        })
    }

    // === Accessors ===

    /// The configuration in force.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current game mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Colour to move (or, once the game is over, the colour that won).
    #[must_use]
    pub fn current(&self) -> Color {
        self.current
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Final result, once there is one.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Check if the game has been won.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// 1-based number of the turn being played.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Moves played since the last reset, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Who controls the colour to move.
    #[must_use]
    pub fn seat_to_move(&self) -> Seat {
        self.config.mode.seat(self.current)
    }

    /// Check if a click would be considered right now.
    #[must_use]
    pub fn accepts_human_input(&self) -> bool {
        self.phase == TurnPhase::AwaitingInput && self.seat_to_move() == Seat::Human
    }

    /// Status line for a renderer.
    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            current: self.current,
            seat: self.seat_to_move(),
            phase: self.phase,
            winner: self.result.map(GameResult::winner),
        }
    }

    /// Read-only copy of the board and status. O(1).
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            status: self.status(),
            turn: self.turn_number,
        }
    }

    // === Moves ===

    /// Play `pos` for the colour to move, from human input.
    pub fn play(&mut self, pos: Position) -> MoveOutcome {
        self.play_observed(pos, &mut NoopObserver)
    }

    /// Like [`play`](Self::play), reporting every wave to `observer`.
    pub fn play_observed(&mut self, pos: Position, observer: &mut impl WaveObserver) -> MoveOutcome {
        let outcome = self.check_phase().and_then(|()| {
            if self.seat_to_move() == Seat::Agent {
                return Err(RejectReason::AgentToMove(self.current));
            }
            self.submit(pos, self.current, observer)
        });
        MoveOutcome::from(outcome)
    }

    /// Play `pos` for `color` regardless of seat, resolving the whole
    /// cascade before returning.
    pub fn submit(
        &mut self,
        pos: Position,
        color: Color,
        observer: &mut impl WaveObserver,
    ) -> Result<TurnSummary, RejectReason> {
        self.begin(pos, color)?;
        loop {
            match self.step() {
                Some(TurnStep::Wave(report)) => observer.on_wave(&report, &self.board),
                Some(TurnStep::Complete(summary)) => return Ok(summary),
                // `begin` succeeded, so a cascade is in flight until `Complete`.
                None => return Err(RejectReason::CascadeRunning),
            }
        }
    }

    /// Place an orb of `color` at `pos` and start its cascade.
    ///
    /// The controller stays in `ExplodingInProgress` until [`step`](Self::step)
    /// reports `Complete`.
    pub fn begin(&mut self, pos: Position, color: Color) -> Result<(), RejectReason> {
        if let Err(reason) = self.check_move(pos, color) {
            debug!(%pos, %color, %reason, "move rejected");
            return Err(reason);
        }
        self.board
            .place(pos, color)
            .map_err(|_| RejectReason::OutOfBounds(pos))?;
        let seed = self.engine.ignite(&self.board, pos, color);
        debug!(turn = self.turn_number, %pos, %color, critical = !seed.is_empty(), "orb placed");

        self.phase = TurnPhase::ExplodingInProgress;
        self.in_flight = Some(InFlight {
            mover: color,
            position: pos,
            progress: CascadeProgress::new(seed),
        });
        Ok(())
    }

    /// Resolve one wave of the cascade in flight.
    ///
    /// Returns `None` when no cascade is in flight.
    pub fn step(&mut self) -> Option<TurnStep> {
        let InFlight {
            mover,
            position,
            progress,
        } = self.in_flight.take()?;

        let mut cascade = self.engine.resume(&mut self.board, progress);
        match cascade.next() {
            Some(report) => {
                let progress = cascade.suspend();
                self.in_flight = Some(InFlight {
                    mover,
                    position,
                    progress,
                });
                Some(TurnStep::Wave(report))
            }
            None => {
                let report = cascade.report();
                Some(TurnStep::Complete(self.complete(mover, position, report)))
            }
        }
    }

    /// Ask `agent` for the colour to move and play its answer.
    ///
    /// Blocks for as long as the agent does; no other move can be made
    /// meanwhile.
    pub fn run_agent_turn(
        &mut self,
        agent: &mut dyn Agent,
        observer: &mut impl WaveObserver,
    ) -> Result<TurnSummary, AgentError> {
        self.check_phase()?;
        let color = self.current;
        let pos = agent.next_move(&self.board, color)?;
        debug!(agent = agent.name(), %color, %pos, "agent chose move");
        Ok(self.submit(pos, color, observer)?)
    }

    // === Lifecycle ===

    /// Clear the board and hand the move to the starting colour.
    pub fn reset(&mut self) {
        self.board = self.blank.clone();
        self.current = self.config.starting_color;
        self.phase = TurnPhase::AwaitingInput;
        self.result = None;
        self.turn_number = 1;
        self.history = Vector::new();
        self.in_flight = None;
        debug!(mode = %self.config.mode, "game reset");
    }

    /// Switch mode and start a new game.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.config.mode = mode;
        self.reset();
    }

    // === Internals ===

    fn check_phase(&self) -> Result<(), RejectReason> {
        match self.phase {
            TurnPhase::GameOver => Err(RejectReason::GameOver),
            TurnPhase::ExplodingInProgress | TurnPhase::TurnComplete => {
                Err(RejectReason::CascadeRunning)
            }
            TurnPhase::AwaitingInput => Ok(()),
        }
    }

    fn check_move(&self, pos: Position, color: Color) -> Result<(), RejectReason> {
        self.check_phase()?;
        if color != self.current {
            return Err(RejectReason::NotYourTurn(color));
        }
        if !self.board.contains(pos) {
            return Err(RejectReason::OutOfBounds(pos));
        }
        if !self.rules.is_legal(&self.board, pos, color) {
            return Err(RejectReason::OpponentCell(pos));
        }
        Ok(())
    }

    fn complete(&mut self, mover: Color, position: Position, cascade: CascadeReport) -> TurnSummary {
        self.phase = TurnPhase::TurnComplete;
        self.history.push_back(MoveRecord {
            turn: self.turn_number,
            color: mover,
            position,
            waves: cascade.waves,
        });

        let result = self.rules.winner(&self.board);
        let next = match result {
            Some(result) => {
                info!(
                    winner = %result.winner(),
                    turn = self.turn_number,
                    orbs = self.board.total_orbs(),
                    "game over"
                );
                self.phase = TurnPhase::GameOver;
                self.result = Some(result);
                self.current = result.winner();
                None
            }
            None => {
                self.phase = TurnPhase::AwaitingInput;
                self.current = mover.opponent();
                self.turn_number += 1;
                Some(self.current)
            }
        };
        info!(
            %mover,
            %position,
            waves = cascade.waves,
            explosions = cascade.explosions,
            stop = ?cascade.stop,
            "turn resolved"
        );

        TurnSummary {
            mover,
            position,
            cascade,
            result,
            next,
        }
    }
}
