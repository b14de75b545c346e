#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the grid snake engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! pure systems and adapters. The world advances in discrete ticks and
//! broadcasts [`Event`] values describing what happened; observers and
//! strategies consume immutable [`GameState`] snapshots and never mutate the
//! board or the snake directly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

mod config;

pub use config::{
    Difficulty, GameConfig, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH,
};

/// Location of a single grid cell expressed as signed column and row coordinates.
///
/// Coordinates are signed so that a head that has left the board, such as
/// `(-1, 2)`, remains representable for collision reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell one step along the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub fn euclidean_distance_sq(self, other: CellCoord) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// Reports whether two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

/// Axis-aligned movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector `(dx, dy)` applied when stepping in this direction.
    ///
    /// This is the single movement table shared by the snake and by any
    /// strategy simulating a candidate move.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the exact opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` would reverse this direction by 180 degrees.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Lifecycle phase of a single episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Ticks advance the snake.
    Running,
    /// Ticks and inputs are ignored until resumed.
    Paused,
    /// Terminal phase for the episode; only a restart leaves it.
    GameOver,
}

/// Obstacle the snake's head ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    /// The head left the board.
    Wall,
    /// The head entered a cell occupied by its own body.
    SelfHit,
}

/// Commands that express every permissible mutation of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation by exactly one tick.
    Tick,
    /// Queues a direction for the next tick.
    Steer {
        /// Direction requested by the player or a strategy.
        direction: Direction,
    },
    /// Suspends ticking.
    Pause,
    /// Leaves the paused phase.
    Resume,
    /// Replaces the board and snake with a fresh episode.
    Restart,
}

/// Events broadcast by the world after a tick or a phase change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an apple was placed onto the board.
    AppleSpawned {
        /// Cell that received the apple.
        position: CellCoord,
        /// Tick during which the apple appeared.
        tick: u64,
    },
    /// Confirms that the snake consumed an apple.
    AppleEaten {
        /// Cell the apple occupied.
        position: CellCoord,
        /// Score after consumption.
        score: u32,
        /// Snake length once the growth earned by this apple applies.
        length: usize,
        /// Tick during which the apple was eaten.
        tick: u64,
    },
    /// Reports that the head ran into a wall or into the body.
    Collision {
        /// Obstacle the head collided with.
        kind: CollisionKind,
        /// Cell the head occupied when the collision was detected.
        position: CellCoord,
        /// Tick during which the collision happened.
        tick: u64,
    },
    /// Announces that the episode ended.
    GameOver {
        /// Score reached before the episode ended.
        final_score: u32,
        /// Snake length when the episode ended.
        final_length: usize,
        /// Tick during which the episode ended.
        tick: u64,
    },
    /// Broadcast at the end of every successful tick.
    Tick {
        /// Tick that just completed.
        tick: u64,
        /// Snapshot captured after the tick was resolved.
        state: GameState,
    },
    /// Reports a new score.
    ScoreChanged {
        /// Score after the change.
        new_score: u32,
        /// Tick during which the score changed.
        tick: u64,
    },
    /// Announces that the world entered the paused phase.
    Paused {
        /// Tick count at the moment of pausing.
        tick: u64,
    },
    /// Announces that the world left the paused phase.
    Resumed {
        /// Tick count at the moment of resuming.
        tick: u64,
    },
    /// Announces that a fresh episode started.
    Restarted {
        /// Tick count of the fresh episode.
        tick: u64,
    },
}

impl Event {
    /// Discriminant used to route the event to its subscribers.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::AppleSpawned { .. } => EventKind::AppleSpawned,
            Self::AppleEaten { .. } => EventKind::AppleEaten,
            Self::Collision { .. } => EventKind::Collision,
            Self::GameOver { .. } => EventKind::GameOver,
            Self::Tick { .. } => EventKind::Tick,
            Self::ScoreChanged { .. } => EventKind::ScoreChanged,
            Self::Paused { .. } => EventKind::Paused,
            Self::Resumed { .. } => EventKind::Resumed,
            Self::Restarted { .. } => EventKind::Restarted,
        }
    }

    /// Tick stamped onto the event.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        match self {
            Self::AppleSpawned { tick, .. }
            | Self::AppleEaten { tick, .. }
            | Self::Collision { tick, .. }
            | Self::GameOver { tick, .. }
            | Self::Tick { tick, .. }
            | Self::ScoreChanged { tick, .. }
            | Self::Paused { tick }
            | Self::Resumed { tick }
            | Self::Restarted { tick } => *tick,
        }
    }
}

/// Field-less discriminant identifying a single [`Event`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Matches [`Event::AppleSpawned`].
    AppleSpawned,
    /// Matches [`Event::AppleEaten`].
    AppleEaten,
    /// Matches [`Event::Collision`].
    Collision,
    /// Matches [`Event::GameOver`].
    GameOver,
    /// Matches [`Event::Tick`].
    Tick,
    /// Matches [`Event::ScoreChanged`].
    ScoreChanged,
    /// Matches [`Event::Paused`].
    Paused,
    /// Matches [`Event::Resumed`].
    Resumed,
    /// Matches [`Event::Restarted`].
    Restarted,
}

impl EventKind {
    /// Number of distinct event kinds.
    pub const COUNT: usize = 9;

    /// Every event kind in declaration order.
    pub const ALL: [EventKind; Self::COUNT] = [
        Self::AppleSpawned,
        Self::AppleEaten,
        Self::Collision,
        Self::GameOver,
        Self::Tick,
        Self::ScoreChanged,
        Self::Paused,
        Self::Resumed,
        Self::Restarted,
    ];

    /// Dense index of the kind, suitable for table lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Immutable copy of the board captured for observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    width: u32,
    height: u32,
    apples: BTreeSet<CellCoord>,
}

impl BoardSnapshot {
    /// Creates a new board snapshot from its dimensions and apple cells.
    #[must_use]
    pub fn new(width: u32, height: u32, apples: BTreeSet<CellCoord>) -> Self {
        Self {
            width,
            height,
            apples,
        }
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies within `[0, width) x [0, height)`.
    #[must_use]
    pub fn is_valid_position(&self, cell: CellCoord) -> bool {
        within_bounds(cell, self.width, self.height)
    }

    /// Reports whether an apple occupies the cell.
    #[must_use]
    pub fn has_apple_at(&self, cell: CellCoord) -> bool {
        self.apples.contains(&cell)
    }

    /// Apple cells in deterministic order.
    #[must_use]
    pub fn apple_positions(&self) -> &BTreeSet<CellCoord> {
        &self.apples
    }

    /// Number of board cells that do not hold an apple.
    #[must_use]
    pub fn free_position_count(&self) -> usize {
        cell_count(self.width, self.height).saturating_sub(self.apples.len())
    }
}

/// Immutable copy of the snake captured for observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSnapshot {
    segments: Vec<CellCoord>,
    direction: Direction,
}

impl SnakeSnapshot {
    /// Creates a new snake snapshot. The head is the first segment.
    #[must_use]
    pub fn new(segments: Vec<CellCoord>, direction: Direction) -> Self {
        Self {
            segments,
            direction,
        }
    }

    /// Cell occupied by the head, if the snapshot holds any segment.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.segments.first().copied()
    }

    /// Occupied cells ordered from head to tail.
    #[must_use]
    pub fn segments(&self) -> &[CellCoord] {
        &self.segments
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn length(&self) -> usize {
        self.segments.len()
    }

    /// Direction applied by the most recent step.
    #[must_use]
    pub const fn current_direction(&self) -> Direction {
        self.direction
    }

    /// Reports whether any segment, including the head, occupies the cell.
    #[must_use]
    pub fn is_position_occupied(&self, cell: CellCoord) -> bool {
        self.segments.contains(&cell)
    }
}

/// Read-only snapshot handed to renderers, user interfaces and strategies.
///
/// The board and snake are deep copies taken when the snapshot was produced,
/// so later ticks never change what an observer already holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Board captured with the snapshot.
    pub board: BoardSnapshot,
    /// Snake captured with the snapshot.
    pub snake: SnakeSnapshot,
    /// Score at the time of capture.
    pub score: u32,
    /// Number of ticks processed in the episode.
    pub tick: u64,
    /// Lifecycle phase at the time of capture.
    pub phase: Phase,
}

impl GameState {
    /// Returns a copy of the snapshot with a different phase.
    #[must_use]
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    /// Reports whether the episode ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Reports whether the episode is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Reports whether ticks currently advance the snake.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

/// Pluggable steering policy that reads snapshots and proposes a direction.
pub trait Strategy {
    /// Reports whether the strategy is able to decide on the provided state.
    fn can_analyze(&self, state: &GameState) -> bool;

    /// Proposes the next direction for the snake.
    fn next_move(&mut self, state: &GameState) -> Direction;

    /// Confidence in the proposal, clamped to `[0, 1]`.
    fn confidence(&self, state: &GameState) -> f32;

    /// Human-readable name of the strategy.
    fn name(&self) -> &str;
}

/// Reports whether the cell lies within a board of the given dimensions.
#[must_use]
pub fn within_bounds(cell: CellCoord, width: u32, height: u32) -> bool {
    let x_in = u32::try_from(cell.x()).map_or(false, |x| x < width);
    let y_in = u32::try_from(cell.y()).map_or(false, |y| y < height);
    x_in && y_in
}

/// Total number of cells on a board of the given dimensions.
#[must_use]
pub fn cell_count(width: u32, height: u32) -> usize {
    let cells = u64::from(width) * u64::from(height);
    usize::try_from(cells).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        within_bounds, BoardSnapshot, CellCoord, CollisionKind, Command, Direction, Event,
        EventKind, GameState, Phase, SnakeSnapshot,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::collections::BTreeSet;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn negative_cell_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(-1, 2));
    }

    #[test]
    fn collision_kind_round_trips_through_bincode() {
        assert_round_trip(&CollisionKind::SelfHit);
    }

    #[test]
    fn steer_command_round_trips_through_bincode() {
        assert_round_trip(&Command::Steer {
            direction: Direction::Left,
        });
    }

    #[test]
    fn movement_table_matches_axes() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(origin.offset(Direction::Up), CellCoord::new(2, 3));
        assert_eq!(origin.offset(Direction::Down), CellCoord::new(2, 1));
        assert_eq!(origin.offset(Direction::Left), CellCoord::new(1, 2));
        assert_eq!(origin.offset(Direction::Right), CellCoord::new(3, 2));
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert!(direction.is_opposite(direction.opposite()));
            assert!(!direction.is_opposite(direction));
        }
    }

    #[test]
    fn bounds_reject_negative_and_overflowing_cells() {
        assert!(within_bounds(CellCoord::new(0, 0), 5, 5));
        assert!(within_bounds(CellCoord::new(4, 4), 5, 5));
        assert!(!within_bounds(CellCoord::new(-1, 0), 5, 5));
        assert!(!within_bounds(CellCoord::new(0, -1), 5, 5));
        assert!(!within_bounds(CellCoord::new(5, 0), 5, 5));
        assert!(!within_bounds(CellCoord::new(0, 5), 5, 5));
        assert!(!within_bounds(CellCoord::new(i32::MIN, i32::MAX), 5, 5));
    }

    #[test]
    fn euclidean_distance_is_symmetric() {
        let a = CellCoord::new(1, 1);
        let b = CellCoord::new(4, 5);
        assert_eq!(a.euclidean_distance_sq(b), 25);
        assert_eq!(b.euclidean_distance_sq(a), 25);
    }

    #[test]
    fn event_kind_indices_are_dense() {
        for (position, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }

    #[test]
    fn event_reports_its_kind_and_tick() {
        let event = Event::Collision {
            kind: CollisionKind::Wall,
            position: CellCoord::new(-1, 2),
            tick: 7,
        };
        assert_eq!(event.kind(), EventKind::Collision);
        assert_eq!(event.tick(), 7);
        assert_eq!(Event::Paused { tick: 3 }.kind(), EventKind::Paused);
    }

    #[test]
    fn snapshot_free_count_excludes_apples() {
        let apples: BTreeSet<CellCoord> = [CellCoord::new(0, 0), CellCoord::new(1, 1)]
            .into_iter()
            .collect();
        let board = BoardSnapshot::new(3, 2, apples);
        assert_eq!(board.free_position_count(), 4);
        assert!(board.has_apple_at(CellCoord::new(1, 1)));
        assert!(!board.is_valid_position(CellCoord::new(3, 0)));
    }

    #[test]
    fn with_phase_preserves_other_fields() {
        let state = GameState {
            board: BoardSnapshot::new(5, 5, BTreeSet::new()),
            snake: SnakeSnapshot::new(vec![CellCoord::new(2, 2)], Direction::Right),
            score: 4,
            tick: 9,
            phase: Phase::Running,
        };
        let paused = state.with_phase(Phase::Paused);
        assert!(paused.is_paused());
        assert_eq!(paused.score, 4);
        assert_eq!(paused.tick, 9);
        assert_eq!(paused.snake, state.snake);
    }
}
