//! Turn flow: modes, the turn controller, sessions and renderer views.
//!
//! - [`TurnController`] owns the board and enforces the move/cascade/win
//!   cycle
//! - [`Session`] adds agents and pixel-level input on top
//! - [`Status`] and [`Snapshot`] are what a renderer reads

mod controller;
mod mode;
mod session;
mod view;

pub use controller::{
    MoveOutcome, MoveRecord, RejectReason, TurnController, TurnPhase, TurnStep, TurnSummary,
};
pub use mode::{GameMode, Seat};
pub use session::Session;
pub use view::{Snapshot, Status};
