//! Wave-synchronized cascade resolution.
//!
//! A cascade starts from the cells pushed over their critical mass by a
//! placement and runs in waves: every cell scheduled for the current wave
//! detonates, in scheduling order, and cells its neighbours push over
//! threshold are collected for the next wave. Each detonation removes
//! exactly `critical_mass` orbs from the cell and hands one to each
//! in-bounds neighbour, overwriting the neighbour's colour (capture).
//!
//! [`Cascade`] resolves one wave per `next()` call so a renderer can redraw
//! between waves; [`ExplosionEngine::resolve`] drains it and reports every
//! wave to a [`WaveObserver`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::wave::WaveSet;
use crate::board::Board;
use crate::core::config::DEFAULT_MAX_WAVES;
use crate::core::{Cell, Color, GameConfig, Position};

/// Why a cascade stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeStop {
    /// No cell is left at or above critical mass.
    Quiescent,
    /// Only the cascading colour remains on a board with more than one orb.
    Decided,
    /// The configured wave limit was reached.
    WaveLimit,
}

/// One resolved wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveReport {
    /// 1-based wave number within the cascade.
    pub wave: usize,
    /// Cells that detonated, in order.
    pub detonated: Vec<(Position, Color)>,
    /// Cells scheduled for the following wave.
    pub scheduled: Vec<Position>,
}

/// Summary of a whole cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Waves resolved.
    pub waves: usize,
    /// Individual detonations across all waves.
    pub explosions: usize,
    /// Why the cascade stopped.
    pub stop: CascadeStop,
}

impl CascadeReport {
    /// Report for a placement that pushed nothing over threshold.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            waves: 0,
            explosions: 0,
            stop: CascadeStop::Quiescent,
        }
    }
}

/// Called after every wave with the board as that wave left it.
pub trait WaveObserver {
    /// Observe a resolved wave.
    fn on_wave(&mut self, report: &WaveReport, board: &Board);
}

/// Observer that ignores every wave.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl WaveObserver for NoopObserver {
    fn on_wave(&mut self, _report: &WaveReport, _board: &Board) {}
}

impl<F> WaveObserver for F
where
    F: FnMut(&WaveReport, &Board),
{
    fn on_wave(&mut self, report: &WaveReport, board: &Board) {
        self(report, board);
    }
}

/// Cascade resolver.
///
/// Stateless apart from its limits; one engine serves every turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionEngine {
    max_waves: usize,
    stop_when_decided: bool,
}

impl Default for ExplosionEngine {
    fn default() -> Self {
        Self {
            max_waves: DEFAULT_MAX_WAVES,
            stop_when_decided: true,
        }
    }
}

impl ExplosionEngine {
    /// Create an engine with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the limits from `config`.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            max_waves: config.max_waves,
            stop_when_decided: config.stop_when_decided,
        }
    }

    /// Set the wave limit.
    #[must_use]
    pub fn with_max_waves(mut self, max_waves: usize) -> Self {
        self.max_waves = max_waves;
        self
    }

    /// Keep resolving after the board is decided.
    #[must_use]
    pub fn run_to_quiescence(mut self) -> Self {
        self.stop_when_decided = false;
        self
    }

    /// The first wave for an orb of `color` just added at `pos`.
    ///
    /// Empty unless the cell is now at or above its critical mass.
    #[must_use]
    pub fn ignite(&self, board: &Board, pos: Position, color: Color) -> WaveSet {
        if board.is_critical(pos) {
            WaveSet::single(pos, color)
        } else {
            WaveSet::new()
        }
    }

    /// Start a cascade from `seed`. Nothing happens until it is iterated.
    pub fn cascade<'a>(&self, board: &'a mut Board, seed: WaveSet) -> Cascade<'a> {
        self.resume(board, CascadeProgress::new(seed))
    }

    /// Continue a cascade suspended with [`Cascade::suspend`].
    ///
    /// `board` must be the board the cascade was suspended from, unchanged.
    pub fn resume<'a>(&self, board: &'a mut Board, progress: CascadeProgress) -> Cascade<'a> {
        Cascade {
            board,
            progress,
            max_waves: self.max_waves,
            stop_when_decided: self.stop_when_decided,
        }
    }

    /// Resolve a cascade from `seed` to completion.
    pub fn resolve(
        &self,
        board: &mut Board,
        seed: WaveSet,
        observer: &mut impl WaveObserver,
    ) -> CascadeReport {
        let mut cascade = self.cascade(board, seed);
        while let Some(report) = cascade.next() {
            observer.on_wave(&report, cascade.board());
        }
        cascade.report()
    }

    /// Resolve whatever an orb of `color` placed at `pos` set off.
    pub fn resolve_from(
        &self,
        board: &mut Board,
        pos: Position,
        color: Color,
        observer: &mut impl WaveObserver,
    ) -> CascadeReport {
        let seed = self.ignite(board, pos, color);
        self.resolve(board, seed, observer)
    }

    /// Resolve every cell currently at or above critical mass.
    ///
    /// Seeds are taken row-major with each cell's own colour. A quiescent
    /// board is left untouched and reports zero waves.
    pub fn settle(&self, board: &mut Board, observer: &mut impl WaveObserver) -> CascadeReport {
        let mut seed = WaveSet::new();
        for pos in board.critical_cells() {
            if let Some(owner) = board[pos].owner() {
                seed.schedule(pos, owner);
            }
        }
        self.resolve(board, seed, observer)
    }
}

/// Cascade state detached from its board.
///
/// Lets a caller resolve a wave, hand the board to a renderer, and pick up
/// where it left off.
#[derive(Clone, Debug, Default)]
pub struct CascadeProgress {
    pending: WaveSet,
    waves: usize,
    explosions: usize,
    stop: Option<CascadeStop>,
}

impl CascadeProgress {
    /// Progress for a cascade that has not resolved any wave yet.
    #[must_use]
    pub fn new(seed: WaveSet) -> Self {
        Self {
            pending: seed,
            ..Self::default()
        }
    }

    /// Waves resolved so far.
    #[must_use]
    pub fn waves(&self) -> usize {
        self.waves
    }

    /// Check if the cascade has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stop.is_some()
    }
}

/// A cascade in progress. Each `next()` resolves exactly one wave.
#[derive(Debug)]
pub struct Cascade<'a> {
    board: &'a mut Board,
    progress: CascadeProgress,
    max_waves: usize,
    stop_when_decided: bool,
}

impl Cascade<'_> {
    /// The board as the last resolved wave left it.
    #[must_use]
    pub fn board(&self) -> &Board {
        self.board
    }

    /// Entries scheduled for the next wave.
    #[must_use]
    pub fn pending(&self) -> &WaveSet {
        &self.progress.pending
    }

    /// Check if the cascade has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }

    /// Summary so far. `stop` reads `Quiescent` until the cascade stops.
    #[must_use]
    pub fn report(&self) -> CascadeReport {
        CascadeReport {
            waves: self.progress.waves,
            explosions: self.progress.explosions,
            stop: self.progress.stop.unwrap_or(CascadeStop::Quiescent),
        }
    }

    /// Resolve all remaining waves.
    pub fn finish(mut self) -> CascadeReport {
        for _ in self.by_ref() {}
        self.report()
    }

    /// Release the board, keeping the cascade's progress.
    #[must_use]
    pub fn suspend(self) -> CascadeProgress {
        self.progress
    }

    fn detonate(&mut self, pos: Position, color: Color, scheduled: &mut Vec<Position>) -> bool {
        let cell = self.board[pos];
        let mass = self.board.critical_mass(pos);
        // Already spent earlier in this wave.
        if cell.count() < mass {
            return false;
        }
        let remainder = cell.count() - mass;
        self.board.put(pos, Cell::with_orbs(remainder, color));
        if remainder >= mass && self.progress.pending.schedule(pos, color) {
            scheduled.push(pos);
        }

        for next in self.board.neighbors(pos) {
            let captured = self.board[next].plus_one(color);
            self.board.put(next, captured);
            if captured.count() >= self.board.critical_mass(next)
                && self.progress.pending.schedule(next, color)
            {
                scheduled.push(next);
            }
        }
        true
    }

    fn is_decided(&self) -> bool {
        let counts = self.board.orb_counts();
        let total = counts[Color::Red] + counts[Color::Blue];
        total > 1 && (counts[Color::Red] == 0 || counts[Color::Blue] == 0)
    }
}

impl Iterator for Cascade<'_> {
    type Item = WaveReport;

    fn next(&mut self) -> Option<Self::Item> {
        if self.progress.stop.is_some() {
            return None;
        }
        if self.progress.pending.is_empty() {
            self.progress.stop = Some(CascadeStop::Quiescent);
            return None;
        }
        if self.progress.waves >= self.max_waves {
            warn!(
                waves = self.progress.waves,
                pending = self.progress.pending.len(),
                "cascade hit wave limit"
            );
            self.progress.stop = Some(CascadeStop::WaveLimit);
            return None;
        }

        let current = self.progress.pending.take();
        let mut detonated = Vec::with_capacity(current.len());
        let mut scheduled = Vec::new();
        for (pos, color) in current {
            if self.detonate(pos, color, &mut scheduled) {
                detonated.push((pos, color));
            }
        }
        if detonated.is_empty() {
            self.progress.stop = Some(CascadeStop::Quiescent);
            return None;
        }

        self.progress.waves += 1;
        self.progress.explosions += detonated.len();
        debug!(
            wave = self.progress.waves,
            detonated = detonated.len(),
            scheduled = scheduled.len(),
            "wave resolved"
        );

        if !self.progress.pending.is_empty() && self.stop_when_decided && self.is_decided() {
            debug!(wave = self.progress.waves, "board decided mid-cascade");
            self.progress.stop = Some(CascadeStop::Decided);
        }

        Some(WaveReport {
            wave: self.progress.waves,
            detonated,
            scheduled,
        })
    }
}
