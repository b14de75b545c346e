#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy steering strategy that chases the nearest apple.

use grid_snake_core::{CellCoord, Direction, GameState, Strategy};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

const STRATEGY_NAME: &str = "Greedy AI";

/// Pure system that steers toward the closest apple by Euclidean distance.
///
/// The strategy closes the larger axis gap first. When that move is unsafe
/// it picks a random safe direction, and when nothing is safe it keeps the
/// current heading. Reversals are never proposed because the snake ignores
/// them.
#[derive(Clone, Debug)]
pub struct GreedyAi {
    rng: ChaCha8Rng,
}

impl GreedyAi {
    /// Creates a greedy strategy with its own generator for tie-breaking.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    fn random_safe_direction(&mut self, state: &GameState, head: CellCoord) -> Direction {
        let reverse = state.snake.current_direction().opposite();
        let candidates: Vec<Direction> = safe_directions(state, head)
            .into_iter()
            .filter(|direction| *direction != reverse)
            .collect();
        candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| state.snake.current_direction())
    }
}

impl Default for GreedyAi {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Strategy for GreedyAi {
    fn can_analyze(&self, state: &GameState) -> bool {
        state.is_running() && state.snake.head().is_some()
    }

    fn next_move(&mut self, state: &GameState) -> Direction {
        let Some(head) = state.snake.head() else {
            return state.snake.current_direction();
        };

        if !self.can_analyze(state) {
            return self.random_safe_direction(state, head);
        }

        let Some(target) = nearest_apple(state, head) else {
            return self.random_safe_direction(state, head);
        };

        let preferred = preferred_direction(head, target);
        let reverses = state.snake.current_direction().is_opposite(preferred);
        if !reverses && is_direction_safe(state, head, preferred) {
            return preferred;
        }
        self.random_safe_direction(state, head)
    }

    fn confidence(&self, state: &GameState) -> f32 {
        if !self.can_analyze(state) {
            return 0.0;
        }
        let Some(head) = state.snake.head() else {
            return 0.0;
        };
        let safe = safe_directions(state, head).len() as f32;
        (safe / Direction::ALL.len() as f32).clamp(0.0, 1.0)
    }

    fn name(&self) -> &str {
        STRATEGY_NAME
    }
}

/// Apple closest to `head`; ties go to the first apple in board order.
fn nearest_apple(state: &GameState, head: CellCoord) -> Option<CellCoord> {
    let mut best: Option<(u64, CellCoord)> = None;
    for apple in state.board.apple_positions() {
        let distance = head.euclidean_distance_sq(*apple);
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, *apple)),
        }
    }
    best.map(|(_, apple)| apple)
}

/// Closes the horizontal gap when it is strictly larger, otherwise the vertical one.
fn preferred_direction(head: CellCoord, target: CellCoord) -> Direction {
    let dx = i64::from(target.x()) - i64::from(head.x());
    let dy = i64::from(target.y()) - i64::from(head.y());

    if dx.abs() > dy.abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Up
    } else {
        Direction::Down
    }
}

fn is_direction_safe(state: &GameState, head: CellCoord, direction: Direction) -> bool {
    let next = head.offset(direction);
    state.board.is_valid_position(next) && !state.snake.is_position_occupied(next)
}

fn safe_directions(state: &GameState, head: CellCoord) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|direction| is_direction_safe(state, head, *direction))
        .collect()
}
