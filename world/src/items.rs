//! Single-cell items and the free-cell search used to place them.

use std::collections::HashSet;

use rand::Rng;
use snake_arcade_core::{Cell, GridSize, ItemKind, ItemSnapshot, SpawnError};

/// Random samples drawn per grid cell before falling back to a linear scan.
const SAMPLES_PER_CELL: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) cell: Cell,
}

impl Item {
    pub(crate) fn spawn<R: Rng>(
        kind: ItemKind,
        grid: GridSize,
        occupied: &HashSet<Cell>,
        rng: &mut R,
    ) -> Result<Self, SpawnError> {
        let cell = free_cell(grid, occupied, rng)?;
        Ok(Self { kind, cell })
    }

    pub(crate) fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            kind: self.kind,
            cell: self.cell,
            color: self.kind.color(),
        }
    }
}

/// Picks a uniformly random cell that is not a member of `occupied`.
///
/// Rejection sampling is capped; once the cap is exhausted the first free
/// cell in row-major order is returned, and a saturated grid yields
/// [`SpawnError::NoFreeCell`].
pub(crate) fn free_cell<R: Rng>(
    grid: GridSize,
    occupied: &HashSet<Cell>,
    rng: &mut R,
) -> Result<Cell, SpawnError> {
    let size = i32::try_from(grid.get()).unwrap_or(i32::MAX);
    if size > 0 {
        for _ in 0..grid.cell_count().saturating_mul(SAMPLES_PER_CELL) {
            let candidate = Cell::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if !occupied.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }

    grid.cells()
        .find(|cell| !occupied.contains(cell))
        .ok_or(SpawnError::NoFreeCell { size: grid.get() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn spawned_cell_avoids_occupied_set() {
        let grid = GridSize::new(6);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut occupied: HashSet<Cell> = HashSet::new();
        while occupied.len() + 1 < grid.cell_count() {
            let cell = free_cell(grid, &occupied, &mut rng).expect("free cell");
            assert!(grid.contains(cell));
            assert!(occupied.insert(cell), "returned an occupied cell");
        }
    }

    #[test]
    fn last_free_cell_is_found() {
        let grid = GridSize::new(5);
        let hole = Cell::new(3, 2);
        let occupied: HashSet<Cell> = grid.cells().filter(|cell| *cell != hole).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(free_cell(grid, &occupied, &mut rng), Ok(hole));
    }

    #[test]
    fn saturated_grid_reports_no_free_cell() {
        let grid = GridSize::new(3);
        let occupied: HashSet<Cell> = grid.cells().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            Item::spawn(ItemKind::Food, grid, &occupied, &mut rng),
            Err(SpawnError::NoFreeCell { size: 3 })
        );
    }
}
