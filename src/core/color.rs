//! Player colours and per-colour data storage.
//!
//! ## Color
//!
//! The two orb colours. Red always moves first after a reset.
//!
//! ## ColorMap
//!
//! Fixed two-slot storage indexed by `Color`, used for orb tallies,
//! seats and agents.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Orb colour, one per player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Red (`R`), the default starting colour.
    #[default]
    Red,
    /// Blue (`B`).
    Blue,
}

impl Color {
    /// Both colours in turn order.
    pub const ALL: [Color; 2] = [Color::Red, Color::Blue];

    /// The other colour.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// Slot index (Red = 0, Blue = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    /// Single-character token used by the exchange format.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
        }
    }

    /// Parse an exchange-format colour token.
    #[must_use]
    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            'R' => Some(Color::Red),
            'B' => Some(Color::Blue),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-colour data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use chain_reaction::core::{Color, ColorMap};
///
/// let mut orbs: ColorMap<u32> = ColorMap::with_value(0);
/// orbs[Color::Blue] += 3;
///
/// assert_eq!(orbs[Color::Red], 0);
/// assert_eq!(orbs[Color::Blue], 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(Color) -> T) -> Self {
        Self {
            data: [factory(Color::Red), factory(Color::Blue)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a colour's entry.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a colour's entry.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}
