//! Layered settings: built-in defaults, an optional TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_snake_core::{Difficulty, GameConfig};
use serde::Deserialize;

/// Ticks a session runs before stopping when nothing else ends it.
pub(crate) const DEFAULT_MAX_TICKS: u64 = 10_000;

/// Everything the host loop needs to start a session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Engine configuration handed to the orchestrator.
    pub(crate) game: GameConfig,
    /// Host loop options.
    pub(crate) session: SessionSettings,
}

/// Host loop options that never reach the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct SessionSettings {
    /// Upper bound on ticks processed across all episodes.
    pub(crate) max_ticks: u64,
    /// Sleep for the difficulty's tick interval between ticks.
    pub(crate) realtime: bool,
    /// Number of times a finished episode is restarted.
    pub(crate) restarts: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            realtime: false,
            restarts: 0,
        }
    }
}

/// Values supplied on the command line; `None` keeps the file or default value.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) ai: bool,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) realtime: bool,
    pub(crate) restarts: Option<u32>,
}

impl Settings {
    /// Reads settings from `path`, or falls back to defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Parses settings from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let settings = toml::from_str(text)?;
        Ok(settings)
    }

    /// Layers command-line values over the loaded settings.
    #[must_use]
    pub(crate) fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(width) = overrides.width {
            self.game.board_width = width;
        }
        if let Some(height) = overrides.height {
            self.game.board_height = height;
        }
        if let Some(seed) = overrides.seed {
            self.game.seed = Some(seed);
        }
        if let Some(difficulty) = overrides.difficulty {
            self.game.difficulty = difficulty;
        }
        self.game.enable_ai |= overrides.ai;
        if let Some(max_ticks) = overrides.max_ticks {
            self.session.max_ticks = max_ticks;
        }
        self.session.realtime |= overrides.realtime;
        if let Some(restarts) = overrides.restarts {
            self.session.restarts = restarts;
        }
        self
    }
}
