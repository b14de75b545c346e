use std::{cell::RefCell, rc::Rc};

use grid_snake_core::{Command, Direction, Event, EventKind, GameState};
use grid_snake_world::{self as world, query, GameSnake};

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = replay(0x1234_5678, scripted_commands());
    let second = replay(0x1234_5678, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(
        first
            .events
            .iter()
            .any(|event| event.kind() == EventKind::Restarted),
        "script should exercise a restart"
    );
}

#[test]
fn initial_apple_depends_on_seed_only() {
    let first = GameSnake::with_dimensions(20, 15, Some(99)).expect("game");
    let second = GameSnake::with_dimensions(20, 15, Some(99)).expect("game");
    assert_eq!(
        query::board(&first).apple_positions(),
        query::board(&second).apple_positions()
    );
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    final_state: GameState,
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut game = GameSnake::with_dimensions(10, 10, Some(seed)).expect("game");
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::ALL {
        let sink = Rc::clone(&log);
        let _ = game.event_bus_mut().subscribe(kind, move |event: &Event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
    }

    for command in commands {
        world::apply(&mut game, command);
    }

    let events = log.borrow().clone();
    ReplayOutcome {
        events,
        final_state: query::snapshot(&game),
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = Vec::new();
    let turns = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Right,
    ];

    for (index, direction) in turns.iter().enumerate() {
        commands.push(Command::Steer {
            direction: *direction,
        });
        for _ in 0..=index {
            commands.push(Command::Tick);
        }
    }

    commands.push(Command::Pause);
    commands.push(Command::Tick);
    commands.push(Command::Resume);
    commands.push(Command::Restart);

    for _ in 0..12 {
        commands.push(Command::Tick);
    }
    commands
}
