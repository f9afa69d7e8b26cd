//! Explosion engine: drives a board from "orb just added" to quiescence.
//!
//! ## Wave semantics
//!
//! - All cells in a wave detonate before any newly critical cell does.
//! - Within a wave, cells detonate in the order they were scheduled;
//!   neighbours are fed up, down, left, right.
//! - A cell left at or above critical mass after detonating fires again in
//!   the next wave; an entry whose cell was already spent is skipped.
//! - Total orbs are conserved by every wave.
//!
//! ## Example
//!
//! ```
//! use chain_reaction::board::Board;
//! use chain_reaction::core::{Color, Position};
//! use chain_reaction::explosion::{ExplosionEngine, NoopObserver};
//!
//! let mut board = Board::new(9, 6).unwrap();
//! board.place(Position::new(8, 5), Color::Blue).unwrap();
//! board.place(Position::new(0, 0), Color::Red).unwrap();
//! board.place(Position::new(0, 0), Color::Red).unwrap();
//!
//! let engine = ExplosionEngine::new();
//! let report = engine.resolve_from(&mut board, Position::new(0, 0), Color::Red, &mut NoopObserver);
//!
//! assert_eq!(report.waves, 1);
//! assert!(board[Position::new(0, 0)].is_empty());
//! assert_eq!(board.total_orbs(), 3);
//! ```

mod engine;
mod wave;

pub use engine::{
    Cascade, CascadeProgress, CascadeReport, CascadeStop, ExplosionEngine, NoopObserver,
    WaveObserver, WaveReport,
};
pub use wave::WaveSet;
