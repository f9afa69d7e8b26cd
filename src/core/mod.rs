//! Core engine types: colours, positions, cells, configuration, errors, RNG.
//!
//! These are the building blocks shared by the board, the explosion
//! engine, the turn controller and the exchange protocol.

pub mod cell;
pub mod color;
pub mod config;
pub mod error;
pub mod position;
pub mod rng;

pub use cell::Cell;
pub use color::{Color, ColorMap};
pub use config::{ExchangeConfig, GameConfig};
pub use error::{AdvanceError, AgentError, BoardError, ConfigError, ExchangeError, FormatError};
pub use position::Position;
pub use rng::{GameRng, GameRngState};
