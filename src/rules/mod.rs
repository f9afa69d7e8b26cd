//! Rules engine trait for game implementations.
//!
//! `RulesEngine` answers two questions for the turn controller:
//! - Is a placement legal for a colour?
//! - Has someone won?
//!
//! `ChainReactionRules` is the standard two-colour rule set.

pub mod engine;

pub use engine::{ChainReactionRules, GameResult, RulesEngine};
