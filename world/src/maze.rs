//! Static maze walls generated once per round.

use std::collections::HashSet;

use rand::Rng;
use snake_arcade_core::{Cell, GridSize};

use crate::items::free_cell;

/// Cells around the starting head, measured as Chebyshev distance, kept free of walls.
const SAFE_RADIUS: u32 = 2;

/// Scatters up to `count` wall cells, keeping the starting body and the area
/// around the starting head clear.
pub(crate) fn generate<R: Rng>(
    grid: GridSize,
    start_body: &[Cell],
    count: u32,
    rng: &mut R,
) -> Vec<Cell> {
    let Some(head) = start_body.first().copied() else {
        return Vec::new();
    };

    let mut blocked: HashSet<Cell> = grid
        .cells()
        .filter(|cell| cell.chebyshev_distance(head) <= SAFE_RADIUS)
        .collect();
    blocked.extend(start_body.iter().copied());

    let mut walls = Vec::new();
    for _ in 0..count {
        let Ok(cell) = free_cell(grid, &blocked, rng) else {
            break;
        };
        let _ = blocked.insert(cell);
        walls.push(cell);
    }
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn start_body() -> Vec<Cell> {
        vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
    }

    #[test]
    fn walls_keep_clear_of_the_start() {
        let grid = GridSize::new(20);
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let walls = generate(grid, &start_body(), 24, &mut rng);
            assert_eq!(walls.len(), 24);
            for wall in &walls {
                assert!(grid.contains(*wall));
                assert!(!start_body().contains(wall));
                assert!(wall.chebyshev_distance(Cell::new(10, 10)) > SAFE_RADIUS);
            }
            let unique: HashSet<Cell> = walls.iter().copied().collect();
            assert_eq!(unique.len(), walls.len());
        }
    }

    #[test]
    fn tiny_grid_yields_fewer_walls() {
        let grid = GridSize::new(5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let walls = generate(grid, &[Cell::new(2, 2)], 10, &mut rng);
        assert!(walls.is_empty());
    }
}
