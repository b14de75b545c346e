//! Authoritative board bounds and apple placement.

use std::collections::BTreeSet;

use grid_snake_core::{cell_count, within_bounds, BoardSnapshot, CellCoord};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::WorldError;

/// Bounded grid that owns the apple cells and the apple placement generator.
#[derive(Clone, Debug)]
pub struct Board {
    width: u32,
    height: u32,
    apples: BTreeSet<CellCoord>,
    rng: ChaCha8Rng,
}

impl Board {
    /// Creates an empty board.
    ///
    /// A seeded board places apples reproducibly; an unseeded board draws
    /// its generator state from the operating system.
    pub fn new(width: u32, height: u32, seed: Option<u64>) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::ZeroSizedBoard { width, height });
        }

        Ok(Self {
            width,
            height,
            apples: BTreeSet::new(),
            rng: seeded_rng(seed),
        })
    }

    /// Creates an empty board with the same dimensions and a new generator.
    pub(crate) fn emptied(&self, seed: Option<u64>) -> Self {
        Self {
            width: self.width,
            height: self.height,
            apples: BTreeSet::new(),
            rng: seeded_rng(seed),
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

    /// Reports whether `(x, y)` lies within `[0, width) x [0, height)`.
    #[must_use]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        within_bounds(CellCoord::new(x, y), self.width, self.height)
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.is_valid_position(cell.x(), cell.y())
    }

    /// Reports whether an apple occupies `(x, y)`.
    #[must_use]
    pub fn has_apple_at(&self, x: i32, y: i32) -> bool {
        self.apples.contains(&CellCoord::new(x, y))
    }

    /// Removes the apple at `(x, y)`. Removing a missing apple is a no-op.
    pub fn remove_apple(&mut self, x: i32, y: i32) {
        let _ = self.apples.remove(&CellCoord::new(x, y));
    }

    /// Places an apple on an explicit cell.
    ///
    /// Returns `false` when the cell is off the board or already holds an apple.
    pub fn place_apple(&mut self, cell: CellCoord) -> bool {
        if !self.contains(cell) {
            return false;
        }
        self.apples.insert(cell)
    }

    /// Places an apple on a uniformly chosen free cell.
    ///
    /// Free cells exclude existing apples and every cell listed in
    /// `occupied`, which callers fill with the snake's segments. Returns
    /// `None` and leaves the board untouched when no free cell remains.
    pub fn spawn_apple(&mut self, occupied: &[CellCoord]) -> Option<CellCoord> {
        let free = self.free_positions(occupied);
        let position = *free.choose(&mut self.rng)?;
        let _ = self.apples.insert(position);
        Some(position)
    }

    /// Copy of the apple cells in deterministic order.
    #[must_use]
    pub fn apple_positions(&self) -> BTreeSet<CellCoord> {
        self.apples.clone()
    }

    /// Reports whether the cell is on the board and holds no apple.
    #[must_use]
    pub fn is_position_free(&self, cell: CellCoord) -> bool {
        self.contains(cell) && !self.apples.contains(&cell)
    }

    /// Number of cells that do not hold an apple.
    #[must_use]
    pub fn free_position_count(&self) -> usize {
        cell_count(self.width, self.height).saturating_sub(self.apples.len())
    }

    /// Captures an immutable copy of the board for observers.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(self.width, self.height, self.apples.clone())
    }

    fn free_positions(&self, occupied: &[CellCoord]) -> Vec<CellCoord> {
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height).unwrap_or(i32::MAX);

        let mut free = Vec::with_capacity(self.free_position_count());
        for x in 0..width {
            for y in 0..height {
                let cell = CellCoord::new(x, y);
                if !self.apples.contains(&cell) && !occupied.contains(&cell) {
                    free.push(cell);
                }
            }
        }
        free
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
