//! Authoritative snake body and steering state.

use std::collections::{BTreeSet, VecDeque};

use grid_snake_core::{CellCoord, Direction, SnakeSnapshot};

use crate::WorldError;

/// Ordered run of occupied cells with the head at the front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    segments: VecDeque<CellCoord>,
    current_direction: Direction,
    pending_direction: Direction,
    grow: bool,
}

impl Snake {
    /// Creates a single-segment snake at `start` heading in `direction`.
    #[must_use]
    pub fn new(start: CellCoord, direction: Direction) -> Self {
        Self {
            segments: VecDeque::from([start]),
            current_direction: direction,
            pending_direction: direction,
            grow: false,
        }
    }

    /// Creates a snake from explicit segments ordered head first.
    ///
    /// Consecutive segments must share an edge and no cell may repeat.
    pub fn from_segments(
        segments: Vec<CellCoord>,
        direction: Direction,
    ) -> Result<Self, WorldError> {
        if segments.is_empty() {
            return Err(WorldError::EmptySnake);
        }

        if let Some(index) = segments
            .windows(2)
            .position(|pair| !pair[0].is_adjacent(pair[1]))
        {
            return Err(WorldError::DisjointSegments {
                index: index + 1,
                cell: segments[index + 1],
            });
        }

        let mut seen = BTreeSet::new();
        if let Some(index) = segments.iter().position(|cell| !seen.insert(*cell)) {
            return Err(WorldError::OverlappingSegments {
                index,
                cell: segments[index],
            });
        }

        Ok(Self {
            segments: segments.into(),
            current_direction: direction,
            pending_direction: direction,
            grow: false,
        })
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> CellCoord {
        self.segments[0]
    }

    /// Occupied cells ordered from head to tail.
    #[must_use]
    pub fn segments(&self) -> Vec<CellCoord> {
        self.segments.iter().copied().collect()
    }

    /// Occupied cells excluding the head.
    #[must_use]
    pub fn body(&self) -> Vec<CellCoord> {
        self.segments.iter().skip(1).copied().collect()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn length(&self) -> usize {
        self.segments.len()
    }

    /// Direction applied by the most recent step.
    #[must_use]
    pub const fn current_direction(&self) -> Direction {
        self.current_direction
    }

    /// Direction the next step will apply.
    #[must_use]
    pub const fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Reports whether the next step adds a segment.
    #[must_use]
    pub const fn should_grow(&self) -> bool {
        self.grow
    }

    /// Queues a direction for the next step.
    ///
    /// Exact reversals of the current direction are ignored, since turning
    /// back into the neck always collides.
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.current_direction.is_opposite(direction) {
            self.pending_direction = direction;
        }
    }

    /// Requests growth on the next [`Snake::advance`] only.
    pub fn set_grow_flag(&mut self, grow: bool) {
        self.grow = grow;
    }

    /// Steps the head one cell along the pending direction.
    ///
    /// Bounds and self-collision are not checked here; the caller inspects
    /// the resulting head afterwards.
    pub fn advance(&mut self) {
        self.current_direction = self.pending_direction;
        let next = self.head().offset(self.current_direction);
        self.segments.push_front(next);

        if self.grow {
            self.grow = false;
        } else {
            let _ = self.segments.pop_back();
        }
    }

    /// Reports whether the head shares a cell with any other segment.
    #[must_use]
    pub fn check_self_collision(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(1).any(|segment| *segment == head)
    }

    /// Reports whether any segment, including the head, occupies the cell.
    #[must_use]
    pub fn is_position_occupied(&self, cell: CellCoord) -> bool {
        self.segments.contains(&cell)
    }

    /// Captures an immutable copy of the snake for observers.
    #[must_use]
    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot::new(self.segments(), self.current_direction)
    }
}
