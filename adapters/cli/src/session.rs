//! Host loop that drives the orchestrator from the terminal.

use std::{thread, time::Duration};

use grid_snake_core::{Command, Event, EventKind, Strategy};
use grid_snake_world::{self as world, query, GameSnake};

use crate::settings::SessionSettings;

/// Outcome of a single episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Episode {
    pub(crate) score: u32,
    pub(crate) length: usize,
    pub(crate) ticks: u64,
    /// `false` when the tick budget ran out before the snake collided.
    pub(crate) finished: bool,
}

impl Episode {
    fn capture(game: &GameSnake) -> Self {
        Self {
            score: game.score(),
            length: query::snake(game).length(),
            ticks: game.tick_count(),
            finished: game.is_game_over(),
        }
    }
}

/// Subscribes terminal printers for the events worth narrating.
pub(crate) fn attach_printers(game: &mut GameSnake) {
    for kind in [EventKind::AppleEaten, EventKind::Collision, EventKind::GameOver] {
        let _ = game.event_bus_mut().subscribe(kind, |event: &Event| {
            if let Some(line) = describe(event) {
                println!("{line}");
            }
            Ok(())
        });
    }
}

/// Renders the narrated events as a single line.
pub(crate) fn describe(event: &Event) -> Option<String> {
    match event {
        Event::AppleEaten {
            position,
            score,
            length,
            tick,
        } => Some(format!(
            "[tick {tick}] apple eaten at ({}, {}), score {score}, length {length}",
            position.x(),
            position.y()
        )),
        Event::Collision {
            kind,
            position,
            tick,
        } => Some(format!(
            "[tick {tick}] {kind:?} collision at ({}, {})",
            position.x(),
            position.y()
        )),
        Event::GameOver {
            final_score,
            final_length,
            tick,
        } => Some(format!(
            "[tick {tick}] game over, score {final_score}, length {final_length}"
        )),
        _ => None,
    }
}

/// Runs episodes until the tick budget or the restart allowance is spent.
pub(crate) fn run(
    game: &mut GameSnake,
    mut strategy: Option<&mut dyn Strategy>,
    options: SessionSettings,
    interval: Duration,
) -> Vec<Episode> {
    let mut episodes = Vec::new();
    let mut restarts_left = options.restarts;
    let mut ticks = 0_u64;

    while ticks < options.max_ticks {
        if let Some(ai) = strategy.as_mut() {
            let state = game.current_state();
            if ai.can_analyze(state) {
                let direction = ai.next_move(state);
                world::apply(game, Command::Steer { direction });
            }
        }
        world::apply(game, Command::Tick);
        ticks += 1;

        if game.is_game_over() {
            episodes.push(Episode::capture(game));
            if restarts_left == 0 {
                return episodes;
            }
            restarts_left -= 1;
            world::apply(game, Command::Restart);
        }

        if options.realtime {
            thread::sleep(interval);
        }
    }

    if episodes.is_empty() || game.tick_count() > 0 {
        episodes.push(Episode::capture(game));
    }
    log::info!("tick budget of {} exhausted", options.max_ticks);
    episodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_snake_core::{CellCoord, CollisionKind};
    use grid_snake_system_greedy_ai::GreedyAi;

    fn options(max_ticks: u64, restarts: u32) -> SessionSettings {
        SessionSettings {
            max_ticks,
            realtime: false,
            restarts,
        }
    }

    #[test]
    fn unsteered_snake_runs_into_the_east_wall() {
        let mut game = GameSnake::with_dimensions(10, 10, Some(3)).expect("game");
        let episodes = run(&mut game, None, options(100, 0), Duration::ZERO);

        assert_eq!(episodes.len(), 1);
        assert!(episodes[0].finished);
        assert_eq!(episodes[0].ticks, 5);
    }

    #[test]
    fn restarts_start_new_episodes() {
        let mut game = GameSnake::with_dimensions(10, 10, Some(3)).expect("game");
        let episodes = run(&mut game, None, options(100, 2), Duration::ZERO);

        assert_eq!(episodes.len(), 3);
        assert!(episodes.iter().all(|episode| episode.finished && episode.ticks == 5));
    }

    #[test]
    fn tick_budget_ends_an_unfinished_episode() {
        let mut game = GameSnake::with_dimensions(10, 10, Some(3)).expect("game");
        let episodes = run(&mut game, None, options(3, 0), Duration::ZERO);

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].ticks, 3);
        assert!(!episodes[0].finished);
    }

    #[test]
    fn strategy_steers_the_snake() {
        let mut game = GameSnake::with_dimensions(12, 12, Some(31)).expect("game");
        let mut ai = GreedyAi::new(Some(31));
        let episodes = run(&mut game, Some(&mut ai), options(200, 0), Duration::ZERO);

        let total: u32 = episodes.iter().map(|episode| episode.score).sum();
        assert!(total > 0);
    }

    #[test]
    fn only_narrated_events_are_described() {
        let collision = Event::Collision {
            kind: CollisionKind::Wall,
            position: CellCoord::new(-1, 4),
            tick: 7,
        };
        assert_eq!(
            describe(&collision).as_deref(),
            Some("[tick 7] Wall collision at (-1, 4)")
        );
        assert_eq!(describe(&Event::Paused { tick: 2 }), None);
    }
}
