//! Host-facing configuration consumed when a world is constructed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Narrowest board accepted after validation.
pub const MIN_BOARD_WIDTH: u32 = 10;
/// Widest board accepted after validation.
pub const MAX_BOARD_WIDTH: u32 = 50;
/// Shortest board accepted after validation.
pub const MIN_BOARD_HEIGHT: u32 = 10;
/// Tallest board accepted after validation.
pub const MAX_BOARD_HEIGHT: u32 = 30;

const DEFAULT_BOARD_WIDTH: u32 = 20;
const DEFAULT_BOARD_HEIGHT: u32 = 15;

/// Pace at which the host loop advances the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// One tick every 200 milliseconds.
    Easy,
    /// One tick every 125 milliseconds.
    #[default]
    Normal,
    /// One tick every 80 milliseconds.
    Hard,
}

impl Difficulty {
    /// Wall-clock interval the host should wait between ticks.
    #[must_use]
    pub const fn tick_interval(self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(200),
            Self::Normal => Duration::from_millis(125),
            Self::Hard => Duration::from_millis(80),
        }
    }
}

/// Settings a host provides when building a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of board columns.
    pub board_width: u32,
    /// Number of board rows.
    pub board_height: u32,
    /// Tick cadence preset.
    pub difficulty: Difficulty,
    /// Seed for apple placement; `None` draws from ambient entropy.
    pub seed: Option<u64>,
    /// Whether the host lets a strategy steer the snake.
    pub enable_ai: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            difficulty: Difficulty::Normal,
            seed: None,
            enable_ai: false,
        }
    }
}

impl GameConfig {
    /// Returns a copy with the board dimensions clamped to the supported range.
    #[must_use]
    pub fn validated(&self) -> Self {
        Self {
            board_width: self.board_width.clamp(MIN_BOARD_WIDTH, MAX_BOARD_WIDTH),
            board_height: self.board_height.clamp(MIN_BOARD_HEIGHT, MAX_BOARD_HEIGHT),
            ..self.clone()
        }
    }

    /// Wall-clock interval between ticks for the configured difficulty.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.difficulty.tick_interval()
    }
}
