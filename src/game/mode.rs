//! Game modes and seats.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Color, ConfigError};

/// Who controls each colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Both colours take input from the UI.
    #[default]
    HumanVsHuman,
    /// Red is human, Blue is an agent.
    HumanVsAgent,
    /// Both colours are agents.
    AgentVsAgent,
}

/// Controller of one colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// Moves arrive as clicks.
    Human,
    /// Moves arrive from an [`Agent`](crate::agent::Agent).
    Agent,
}

impl Seat {
    /// Status-bar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Seat::Human => "Human",
            Seat::Agent => "AI",
        }
    }
}

impl GameMode {
    /// All modes in menu order.
    pub const ALL: [GameMode; 3] = [
        GameMode::HumanVsHuman,
        GameMode::HumanVsAgent,
        GameMode::AgentVsAgent,
    ];

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            GameMode::HumanVsHuman => "Human vs Human",
            GameMode::HumanVsAgent => "Human vs AI",
            GameMode::AgentVsAgent => "AI vs AI",
        }
    }

    /// Seat controlling `color` in this mode.
    #[must_use]
    pub const fn seat(self, color: Color) -> Seat {
        match (self, color) {
            (GameMode::HumanVsHuman, _) => Seat::Human,
            (GameMode::HumanVsAgent, Color::Red) => Seat::Human,
            (GameMode::HumanVsAgent, Color::Blue) => Seat::Agent,
            (GameMode::AgentVsAgent, _) => Seat::Agent,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    /// Accepts the menu labels and the short forms `hvh`, `hva`, `ava`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(trimmed))
            .or_else(|| match trimmed.to_ascii_lowercase().as_str() {
                "hvh" => Some(GameMode::HumanVsHuman),
                "hva" => Some(GameMode::HumanVsAgent),
                "ava" => Some(GameMode::AgentVsAgent),
                _ => None,
            })
            .ok_or_else(|| ConfigError::UnknownMode(trimmed.to_string()))
    }
}
