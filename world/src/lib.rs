#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the grid snake engine.
//!
//! [`GameSnake`] owns the mutable [`Board`] and [`Snake`], advances them one
//! tick at a time, and publishes every outcome on its [`EventBus`]. Observers
//! read immutable [`GameState`] snapshots; the orchestrator stays the only
//! mutator.

use grid_snake_core::{
    CellCoord, CollisionKind, Command, Direction, Event, GameConfig, GameState, Phase,
};
use thiserror::Error;

mod board;
mod bus;
mod snake;

pub use board::Board;
pub use bus::{EventBus, Handler, HandlerError, SubscriptionId};
pub use snake::Snake;

const SPAWN_DIRECTION: Direction = Direction::Right;
const RESTART_SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Reasons a board or snake cannot be constructed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A snake needs at least one segment.
    #[error("a snake requires at least one segment")]
    EmptySnake,
    /// Two consecutive segments do not share an edge.
    #[error("segment {index} at {cell:?} is not adjacent to its predecessor")]
    DisjointSegments {
        /// Position of the offending segment, counted from the head.
        index: usize,
        /// Cell occupied by the offending segment.
        cell: CellCoord,
    },
    /// A cell appears more than once in the segment list.
    #[error("segment {index} at {cell:?} repeats an earlier segment")]
    OverlappingSegments {
        /// Position of the repeated segment, counted from the head.
        index: usize,
        /// Cell occupied twice.
        cell: CellCoord,
    },
    /// Boards need at least one row and one column.
    #[error("board dimensions {width}x{height} leave no cells")]
    ZeroSizedBoard {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}

/// Tick-driven orchestrator for a single game.
#[derive(Debug)]
pub struct GameSnake {
    board: Board,
    snake: Snake,
    bus: EventBus,
    state: GameState,
    phase: Phase,
    score: u32,
    tick: u64,
    seed: Option<u64>,
    restarts: u64,
}

impl GameSnake {
    /// Creates a game from host configuration, clamping the board size first.
    pub fn new(config: &GameConfig) -> Result<Self, WorldError> {
        let config = config.validated();
        Self::with_dimensions(config.board_width, config.board_height, config.seed)
    }

    /// Creates a game on an unclamped board with the snake at its center.
    pub fn with_dimensions(width: u32, height: u32, seed: Option<u64>) -> Result<Self, WorldError> {
        let mut board = Board::new(width, height, seed)?;
        let snake = spawn_snake(&board);
        let _ = board.spawn_apple(&snake.segments());
        Ok(Self::assemble(board, snake, seed))
    }

    /// Creates a game from a prepared board and snake.
    ///
    /// No apple is added; the board is used exactly as provided. Restarts
    /// draw fresh boards from ambient entropy.
    #[must_use]
    pub fn from_parts(board: Board, snake: Snake) -> Self {
        Self::assemble(board, snake, None)
    }

    fn assemble(board: Board, snake: Snake, seed: Option<u64>) -> Self {
        let state = capture(&board, &snake, 0, 0, Phase::Running);
        Self {
            board,
            snake,
            bus: EventBus::new(),
            state,
            phase: Phase::Running,
            score: 0,
            tick: 0,
            seed,
            restarts: 0,
        }
    }

    /// Latest snapshot produced by a tick or a phase change.
    #[must_use]
    pub fn current_state(&self) -> &GameState {
        &self.state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether ticks and inputs are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Reports whether the episode ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Apples eaten during the episode.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Ticks processed during the episode.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Read-only access to the event bus.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Mutable access to the event bus for subscribing observers.
    pub fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Suspends ticking. Ignored unless the game is running.
    pub fn pause(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.transition(Phase::Paused);
        self.bus.publish(&Event::Paused { tick: self.tick });
    }

    /// Leaves the paused phase. Ignored unless the game is paused.
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.transition(Phase::Running);
        self.bus.publish(&Event::Resumed { tick: self.tick });
    }

    /// Forwards a direction to the snake while the game is running.
    pub fn process_input(&mut self, direction: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        self.snake.set_direction(direction);
    }

    /// Advances the game by one tick.
    ///
    /// Walls are checked before the body, and apples only after both, so a
    /// tick that ends the game never reports an eaten apple.
    pub fn process_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.tick = self.tick.saturating_add(1);
        self.snake.advance();
        let head = self.snake.head();

        if !self.board.contains(head) {
            self.end_episode(CollisionKind::Wall, head);
            return;
        }

        if self.snake.check_self_collision() {
            self.end_episode(CollisionKind::SelfHit, head);
            return;
        }

        if self.board.has_apple_at(head.x(), head.y()) {
            self.consume_apple(head);
        }

        self.state = capture(&self.board, &self.snake, self.score, self.tick, self.phase);
        log::trace!(
            "tick {} head {:?} length {}",
            self.tick,
            head,
            self.snake.length()
        );
        self.bus.publish(&Event::Tick {
            tick: self.tick,
            state: self.state.clone(),
        });
    }

    /// Starts a fresh episode from any phase.
    ///
    /// Subscriptions survive the restart; only the board, snake, score and
    /// tick count are replaced.
    pub fn restart(&mut self) {
        self.restarts = self.restarts.wrapping_add(1);
        let seed = self.seed.map(|seed| {
            seed.wrapping_add(self.restarts.wrapping_mul(RESTART_SEED_STRIDE))
        });

        self.board = self.board.emptied(seed);
        self.snake = spawn_snake(&self.board);
        let _ = self.board.spawn_apple(&self.snake.segments());
        self.score = 0;
        self.tick = 0;
        self.phase = Phase::Running;
        self.state = capture(&self.board, &self.snake, 0, 0, Phase::Running);

        log::debug!("restarted episode {}", self.restarts);
        self.bus.publish(&Event::Restarted { tick: self.tick });
    }

    fn transition(&mut self, phase: Phase) {
        log::debug!("phase {:?} -> {:?} at tick {}", self.phase, phase, self.tick);
        self.phase = phase;
        self.state = self.state.with_phase(phase);
    }

    fn end_episode(&mut self, kind: CollisionKind, position: CellCoord) {
        log::debug!(
            "{:?} collision at {:?} on tick {}, final score {}",
            kind,
            position,
            self.tick,
            self.score
        );
        self.phase = Phase::GameOver;
        self.state = capture(&self.board, &self.snake, self.score, self.tick, self.phase);

        self.bus.publish(&Event::Collision {
            kind,
            position,
            tick: self.tick,
        });
        self.bus.publish(&Event::GameOver {
            final_score: self.score,
            final_length: self.snake.length(),
            tick: self.tick,
        });
    }

    fn consume_apple(&mut self, head: CellCoord) {
        self.board.remove_apple(head.x(), head.y());
        self.score = self.score.saturating_add(1);
        self.snake.set_grow_flag(true);
        let spawned = self.board.spawn_apple(&self.snake.segments());

        self.bus.publish(&Event::AppleEaten {
            position: head,
            score: self.score,
            length: self.snake.length() + 1,
            tick: self.tick,
        });
        if let Some(position) = spawned {
            self.bus.publish(&Event::AppleSpawned {
                position,
                tick: self.tick,
            });
        }
        self.bus.publish(&Event::ScoreChanged {
            new_score: self.score,
            tick: self.tick,
        });
    }
}

/// Applies the provided command to the game.
pub fn apply(game: &mut GameSnake, command: Command) {
    match command {
        Command::Tick => game.process_tick(),
        Command::Steer { direction } => game.process_input(direction),
        Command::Pause => game.pause(),
        Command::Resume => game.resume(),
        Command::Restart => game.restart(),
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use super::{Board, GameSnake, Snake};
    use grid_snake_core::GameState;

    /// Provides read-only access to the live board.
    #[must_use]
    pub fn board(game: &GameSnake) -> &Board {
        &game.board
    }

    /// Provides read-only access to the live snake.
    #[must_use]
    pub fn snake(game: &GameSnake) -> &Snake {
        &game.snake
    }

    /// Captures a fresh snapshot of the live board and snake.
    #[must_use]
    pub fn snapshot(game: &GameSnake) -> GameState {
        super::capture(&game.board, &game.snake, game.score, game.tick, game.phase)
    }
}

fn spawn_snake(board: &Board) -> Snake {
    let x = i32::try_from(board.width() / 2).unwrap_or(i32::MAX);
    let y = i32::try_from(board.height() / 2).unwrap_or(i32::MAX);
    Snake::new(CellCoord::new(x, y), SPAWN_DIRECTION)
}

fn capture(board: &Board, snake: &Snake, score: u32, tick: u64, phase: Phase) -> GameState {
    GameState {
        board: board.snapshot(),
        snake: snake.snapshot(),
        score,
        tick,
        phase,
    }
}
