//! # chain-reaction
//!
//! A two-player Chain Reaction engine.
//!
//! Players alternately drop orbs on a grid. A cell holding as many orbs as
//! it has neighbours explodes, sending one orb to each neighbour and
//! painting it in the exploding colour; the explosions chain in waves until
//! the board settles. Once more than one orb is on the board, a colour with
//! no orbs left has lost.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: the board and the turn belong to a
//!    `TurnController`; nothing is global.
//!
//! 2. **Observable Waves**: cascades resolve one wave at a time, through an
//!    iterator or an observer callback, so a renderer can animate between
//!    waves without interrupting them.
//!
//! 3. **Seat-Agnostic Turns**: humans, in-process agents and agents in
//!    another process all feed the same controller.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: the board and move history live in
//!   `im` vectors, so snapshots clone in O(1).
//!
//! - **Text Exchange**: external agents read and write a plain-text board
//!   (`Human Move:` / `AI Move:`), polled with backoff and cancellable.
//!
//! ## Modules
//!
//! - `core`: colours, positions, cells, configuration, errors, RNG
//! - `board`: the grid and critical-mass policy
//! - `explosion`: wave-synchronized cascade resolution
//! - `rules`: legality and win detection
//! - `game`: turn controller, modes, sessions, renderer views
//! - `agent`: the `Agent` trait and a random baseline
//! - `exchange`: the text protocol for out-of-process agents

pub mod agent;
pub mod board;
pub mod core;
pub mod exchange;
pub mod explosion;
pub mod game;
pub mod rules;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::core::{
    AdvanceError, AgentError, BoardError, Cell, Color, ColorMap, ConfigError, ExchangeConfig, ExchangeError,
    FormatError, GameConfig, GameRng, GameRngState, Position,
};

pub use crate::board::{critical_mass, Board, CellKind};

pub use crate::explosion::{
    Cascade, CascadeProgress, CascadeReport, CascadeStop, ExplosionEngine, NoopObserver,
    WaveObserver, WaveReport, WaveSet,
};

pub use crate::rules::{ChainReactionRules, GameResult, RulesEngine};

pub use crate::game::{
    GameMode, MoveOutcome, MoveRecord, RejectReason, Seat, Session, Snapshot, Status,
    TurnController, TurnPhase, TurnStep, TurnSummary,
};

pub use crate::agent::{Agent, RandomAgent};

pub use crate::exchange::{
    AgentEndpoint, CancelToken, Exchange, ExchangeAgent, ExchangeChannel, FileChannel, Header,
    MemoryChannel,
};
