//! The set of cells scheduled to detonate in the next wave.

use rustc_hash::FxHashSet;

use crate::core::{Color, Position};

/// Insertion-ordered, duplicate-free set of `(position, colour)` entries.
///
/// Scheduling the same pair twice within one wave is a no-op; the first
/// insertion fixes its place in the detonation order.
#[derive(Clone, Debug, Default)]
pub struct WaveSet {
    entries: Vec<(Position, Color)>,
    seen: FxHashSet<(Position, Color)>,
}

impl WaveSet {
    /// Create an empty wave.
    pub fn new() -> Self {
        Self::default()
    }

    /// A wave holding a single entry.
    #[must_use]
    pub fn single(pos: Position, color: Color) -> Self {
        let mut wave = Self::new();
        wave.schedule(pos, color);
        wave
    }

    /// Schedule an entry. Returns `false` if it was already scheduled.
    pub fn schedule(&mut self, pos: Position, color: Color) -> bool {
        if self.seen.insert((pos, color)) {
            self.entries.push((pos, color));
            true
        } else {
            false
        }
    }

    /// Check if an entry is scheduled.
    #[must_use]
    pub fn contains(&self, pos: Position, color: Color) -> bool {
        self.seen.contains(&(pos, color))
    }

    /// Number of scheduled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in detonation order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Color)> + '_ {
        self.entries.iter().copied()
    }

    /// Take the scheduled entries, leaving the set empty for the next wave.
    pub fn take(&mut self) -> Vec<(Position, Color)> {
        self.seen.clear();
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_is_idempotent() {
        let mut wave = WaveSet::new();
        assert!(wave.schedule(Position::new(1, 1), Color::Red));
        assert!(!wave.schedule(Position::new(1, 1), Color::Red));
        assert!(wave.schedule(Position::new(1, 1), Color::Blue));
        assert_eq!(wave.len(), 2);
        assert!(wave.contains(Position::new(1, 1), Color::Blue));
    }

    #[test]
    fn test_insertion_order() {
        let mut wave = WaveSet::new();
        for pos in [Position::new(3, 0), Position::new(0, 0), Position::new(2, 2)] {
            wave.schedule(pos, Color::Red);
        }
        let order: Vec<_> = wave.iter().map(|(pos, _)| pos).collect();
        assert_eq!(order, vec![Position::new(3, 0), Position::new(0, 0), Position::new(2, 2)]);
    }

    #[test]
    fn test_take_clears() {
        let mut wave = WaveSet::single(Position::new(0, 0), Color::Blue);
        let taken = wave.take();
        assert_eq!(taken, vec![(Position::new(0, 0), Color::Blue)]);
        assert!(wave.is_empty());
        assert!(wave.schedule(Position::new(0, 0), Color::Blue));
    }
}
