//! Autonomous enemy snake and the mirrored shadow hazard.

use std::collections::VecDeque;

use snake_arcade_core::{Cell, Direction, EnemyRules, EnemySnapshot, GridSize};

/// Fixed-length snake that always wraps at the grid edges.
///
/// Heading changes arrive through [`EnemySnake::steer`]; the random turn
/// policy lives in the enemy steering system.
#[derive(Clone, Debug)]
pub(crate) struct EnemySnake {
    body: VecDeque<Cell>,
    direction: Direction,
    length: usize,
}

impl EnemySnake {
    pub(crate) fn new(rules: &EnemyRules, grid: GridSize) -> Self {
        let length = rules.length.max(1);
        let mut body = VecDeque::with_capacity(length + 1);
        let mut cell = rules.start;
        for _ in 0..length {
            body.push_back(grid.wrap(cell));
            cell = cell.step(rules.direction.opposite());
        }
        Self {
            body,
            direction: rules.direction,
            length,
        }
    }

    pub(crate) fn steer(&mut self, direction: Direction) {
        if !direction.is_opposite(self.direction) {
            self.direction = direction;
        }
    }

    pub(crate) fn advance(&mut self, grid: GridSize) {
        let head = self.body.front().copied().unwrap_or(Cell::new(0, 0));
        self.body.push_front(grid.wrap(head.step(self.direction)));
        while self.body.len() > self.length {
            let _ = self.body.pop_back();
        }
    }

    pub(crate) fn cells(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            body: self.body.iter().copied().collect(),
            direction: self.direction,
        }
    }
}

/// Recomputes the shadow snake: the point reflection of `body` across the grid center.
pub(crate) fn shadow_of(grid: GridSize, body: impl Iterator<Item = Cell>) -> Vec<Cell> {
    body.map(|cell| grid.mirror(cell)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> EnemyRules {
        EnemyRules {
            length: 5,
            start: Cell::new(3, 3),
            direction: Direction::Right,
            turn_chance: 0.25,
        }
    }

    #[test]
    fn initial_body_wraps_into_grid() {
        let enemy = EnemySnake::new(&rules(), GridSize::new(20));
        let body: Vec<Cell> = enemy.cells().iter().copied().collect();
        assert_eq!(
            body,
            vec![
                Cell::new(3, 3),
                Cell::new(2, 3),
                Cell::new(1, 3),
                Cell::new(0, 3),
                Cell::new(19, 3),
            ]
        );
    }

    #[test]
    fn advance_keeps_fixed_length_and_wraps() {
        let grid = GridSize::new(20);
        let mut enemy = EnemySnake::new(&rules(), grid);
        enemy.steer(Direction::Up);
        for _ in 0..4 {
            enemy.advance(grid);
        }
        assert_eq!(enemy.cells().len(), 5);
        assert_eq!(enemy.cells().front().copied(), Some(Cell::new(3, 19)));
    }

    #[test]
    fn steering_ignores_reversal() {
        let mut enemy = EnemySnake::new(&rules(), GridSize::new(20));
        enemy.steer(Direction::Left);
        assert_eq!(enemy.snapshot().direction, Direction::Right);
    }

    #[test]
    fn shadow_is_point_reflection() {
        let grid = GridSize::new(20);
        let body = [Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)];
        assert_eq!(
            shadow_of(grid, body.into_iter()),
            vec![Cell::new(9, 9), Cell::new(10, 9), Cell::new(11, 9)]
        );
    }
}
