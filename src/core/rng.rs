//! Seeded randomness for agents.
//!
//! Every random choice in the crate goes through `GameRng`, so a match
//! between random agents replays exactly from its seed. One root stream
//! forks into a stream per seat, and a stream's position can be captured
//! and restored to resume a paused match.
//!
//! ```
//! use chain_reaction::core::GameRng;
//!
//! let mut root = GameRng::new(42);
//! let mut red = root.fork();
//! let mut blue = root.fork();
//!
//! let cells: Vec<usize> = (0..54).collect();
//! let mut again = GameRng::new(42).fork();
//! assert_eq!(red.choose(&cells), again.choose(&cells));
//! assert!(blue.choose(&cells).is_some());
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Golden-ratio increment spreading fork seeds apart.
const FORK_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    /// Create a stream from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    /// Derive the next child stream. The n-th fork of a seed is always the same.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(FORK_STRIDE)))
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick one element uniformly, `None` for an empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.inner).copied()
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            forks: self.forks,
        }
    }

    /// Resume a stream from a captured position.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            forks: state.forks,
        }
    }
}

/// Serializable stream position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Seed the stream started from.
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
    /// Forks taken so far.
    pub forks: u64,
}
