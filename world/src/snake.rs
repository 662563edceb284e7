//! Player-controlled snake body.

use std::collections::VecDeque;

use snake_arcade_core::{Cell, CellRect, Direction, GridSize};

#[derive(Clone, Debug)]
pub(crate) struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    pending: Direction,
    growing: bool,
}

impl Snake {
    /// Builds a straight body with the head first and the rest trailing behind it.
    pub(crate) fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let mut cells = Vec::with_capacity(length);
        let mut cell = head;
        for _ in 0..length.max(1) {
            cells.push(cell);
            cell = cell.step(direction.opposite());
        }
        Self::from_cells(cells, direction)
    }

    pub(crate) fn from_cells(cells: Vec<Cell>, direction: Direction) -> Self {
        Self {
            body: cells.into(),
            direction,
            pending: direction,
            growing: false,
        }
    }

    /// Queues a direction unless it would reverse the snake into itself.
    pub(crate) fn set_direction(&mut self, direction: Direction) {
        if direction.is_opposite(self.direction) {
            return;
        }
        self.pending = direction;
    }

    /// Applies the pending direction and moves one cell.
    ///
    /// Without wrapping the new head may lie outside the grid; the wall check
    /// reports it before anything else reads the body.
    pub(crate) fn advance(&mut self, grid: GridSize, wrap: bool) -> Cell {
        self.direction = self.pending;
        let mut head = self.head().step(self.direction);
        if wrap {
            head = grid.wrap(head);
        }
        self.body.push_front(head);
        if !self.growing {
            let _ = self.body.pop_back();
        }
        self.growing = false;
        head
    }

    pub(crate) fn grow(&mut self) {
        self.growing = true;
    }

    /// Drops the tail cell. Returns `false` when the body is already a single cell.
    pub(crate) fn shrink(&mut self) -> bool {
        if self.body.len() <= 1 {
            return false;
        }
        let _ = self.body.pop_back();
        true
    }

    pub(crate) fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    pub(crate) fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn collides_wall(&self, grid: GridSize) -> bool {
        !grid.contains(self.head())
    }

    pub(crate) fn collides_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|cell| *cell == head)
    }

    pub(crate) fn collides_point(&self, cell: Cell) -> bool {
        self.head() == cell
    }

    pub(crate) fn collides_body<'a>(&self, foreign: impl IntoIterator<Item = &'a Cell>) -> bool {
        let head = self.head();
        foreign.into_iter().any(|cell| *cell == head)
    }

    pub(crate) fn collides_rect(&self, rect: CellRect) -> bool {
        self.body.iter().any(|cell| rect.contains(*cell))
    }
}
