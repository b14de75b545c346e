#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs grid snake sessions in the terminal.

mod session;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake_core::{Difficulty, Strategy};
use grid_snake_system_greedy_ai::GreedyAi;
use grid_snake_world::GameSnake;

use crate::settings::{Overrides, Settings};

/// Command-line arguments accepted by the grid snake binary.
#[derive(Debug, Parser)]
#[command(name = "grid-snake", about = "Tick-driven snake on a bounded grid")]
struct CliArgs {
    /// Board width in cells; clamped to the supported range.
    #[arg(long)]
    width: Option<u32>,
    /// Board height in cells; clamped to the supported range.
    #[arg(long)]
    height: Option<u32>,
    /// Seed for reproducible apple placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Tick pacing preset.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Let the greedy strategy steer the snake.
    #[arg(long)]
    ai: bool,
    /// Stop after this many ticks across all episodes.
    #[arg(long = "ticks")]
    max_ticks: Option<u64>,
    /// TOML file providing `[game]` and `[session]` settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sleep for the tick interval between ticks.
    #[arg(long)]
    realtime: bool,
    /// Restart after a game over up to this many times.
    #[arg(long)]
    restarts: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            seed: self.seed,
            difficulty: self.difficulty.map(Difficulty::from),
            ai: self.ai,
            max_ticks: self.max_ticks,
            realtime: self.realtime,
            restarts: self.restarts,
        }
    }
}

/// Entry point for the grid snake command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let settings = Settings::load(args.config.as_deref())?.with_overrides(args.overrides());
    let config = settings.game.validated();
    let mut game = GameSnake::new(&config).context("failed to create game")?;
    session::attach_printers(&mut game);

    let mut greedy = config.enable_ai.then(|| GreedyAi::new(config.seed));
    let strategy = greedy.as_mut().map(|ai| ai as &mut dyn Strategy);
    if let Some(ai) = strategy.as_deref() {
        log::info!("steering with {}", ai.name());
    }
    log::info!(
        "starting {}x{} board at {:?} difficulty",
        config.board_width,
        config.board_height,
        config.difficulty
    );

    let episodes = session::run(&mut game, strategy, settings.session, config.tick_interval());

    println!("summary:");
    for (index, episode) in episodes.iter().enumerate() {
        let status = if episode.finished { "over" } else { "stopped" };
        println!(
            "  episode {}: score {}, length {}, ticks {} ({status})",
            index + 1,
            episode.score,
            episode.length,
            episode.ticks
        );
    }
    let best = episodes.iter().map(|episode| episode.score).max().unwrap_or(0);
    println!("  best score {best} over {} episode(s)", episodes.len());
    Ok(())
}
