//! Greedy input source that plays headless rounds.

use std::collections::HashSet;

use snake_arcade_core::{
    Cell, Direction, GridSize, ItemKind, Orientation, ProjectileSnapshot, RoundSnapshot,
};

/// Picks the next heading for the player snake.
///
/// Only directions whose next head cell is safe this tick are considered;
/// among those the one closest to the target item wins, then the one with
/// more free neighbours, then the current heading. Returns `None` when every
/// move is fatal.
pub(crate) fn steer(snapshot: &RoundSnapshot) -> Option<Direction> {
    let head = snapshot.head()?;
    let grid = snapshot.grid;
    let wraps = snapshot.mode.rules().wraps;
    let blocked = blocked_cells(snapshot);
    let target = snapshot
        .items
        .iter()
        .find(|item| item.kind != ItemKind::Poison)
        .map(|item| item.cell);

    let resolve = |cell: Cell| -> Option<Cell> {
        if wraps {
            Some(grid.wrap(cell))
        } else if grid.contains(cell) {
            Some(cell)
        } else {
            None
        }
    };
    let shadow = snapshot.mode.rules().hazards.shadow;
    let safe = |cell: Cell| !blocked.contains(&cell) && !(shadow && grid.mirror(cell) == cell);

    Direction::ALL
        .into_iter()
        .filter(|direction| snapshot.length() < 2 || !direction.is_opposite(snapshot.direction))
        .filter_map(|direction| {
            let next = resolve(head.step(direction))?;
            if !safe(next) {
                return None;
            }
            let distance = target.map_or(0, |target| next.manhattan_distance(target));
            let free = Direction::ALL
                .into_iter()
                .filter_map(|around| resolve(next.step(around)))
                .filter(|cell| *cell != head && safe(*cell))
                .count();
            let turn = direction != snapshot.direction;
            Some(((distance, usize::MAX - free, turn), direction))
        })
        .min_by_key(|(score, _)| *score)
        .map(|(_, direction)| direction)
}

fn blocked_cells(snapshot: &RoundSnapshot) -> HashSet<Cell> {
    let grid = snapshot.grid;
    let mut blocked = HashSet::new();

    let trailing = snapshot.snake.len().saturating_sub(1);
    blocked.extend(snapshot.snake.iter().take(trailing.max(1)).copied());
    blocked.extend(snapshot.walls.iter().copied());
    blocked.extend(snapshot.shadow.iter().copied());
    if let Some(enemy) = &snapshot.enemy {
        blocked.extend(enemy.body.iter().copied());
        if let Some(enemy_head) = enemy.body.first() {
            blocked.extend(
                Direction::ALL
                    .into_iter()
                    .map(|direction| grid.wrap(enemy_head.step(direction))),
            );
        }
    }
    if let Some(boss) = snapshot.boss {
        blocked.extend(boss.region.cells());
    }
    blocked.extend(
        snapshot
            .items
            .iter()
            .filter(|item| item.kind == ItemKind::Poison)
            .map(|item| item.cell),
    );
    for projectile in &snapshot.projectiles {
        match *projectile {
            ProjectileSnapshot::Bullet { cell } => {
                blocked.extend([cell, cell.step(Direction::Down)]);
            }
            ProjectileSnapshot::Laser {
                orientation, index, ..
            } => blocked.extend(laser_cells(grid, orientation, index)),
            ProjectileSnapshot::Chaser { zone, locked: true } => blocked.extend(zone.cells()),
            ProjectileSnapshot::Chaser { .. } => {}
        }
    }
    blocked
}

fn laser_cells(grid: GridSize, orientation: Orientation, index: u32) -> impl Iterator<Item = Cell> {
    let index = i32::try_from(index).unwrap_or(i32::MAX);
    grid.cells().filter(move |cell| match orientation {
        Orientation::Row => cell.y() == index,
        Orientation::Column => cell.x() == index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::{BossSnapshot, CellRect, ItemSnapshot, ModeId, RoundPhase};
    use std::time::Duration;

    fn snapshot(mode: ModeId, snake: Vec<Cell>, direction: Direction, food: Cell) -> RoundSnapshot {
        RoundSnapshot {
            mode,
            phase: RoundPhase::Playing,
            grid: mode.rules().grid,
            score: 0,
            tick: 0,
            tick_period: Duration::from_millis(100),
            time_remaining: None,
            snake,
            direction,
            items: vec![ItemSnapshot {
                kind: ItemKind::Food,
                cell: food,
                color: ItemKind::Food.color(),
            }],
            enemy: None,
            shadow: Vec::new(),
            walls: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
        }
    }

    fn classic_body() -> Vec<Cell> {
        vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
    }

    #[test]
    fn turns_towards_food() {
        let view = snapshot(ModeId::Classic, classic_body(), Direction::Right, Cell::new(10, 4));
        assert_eq!(steer(&view), Some(Direction::Up));
    }

    #[test]
    fn keeps_heading_when_already_aligned() {
        let view = snapshot(ModeId::Classic, classic_body(), Direction::Right, Cell::new(15, 10));
        assert_eq!(steer(&view), Some(Direction::Right));
    }

    #[test]
    fn never_reverses_into_the_body() {
        let view = snapshot(ModeId::Classic, classic_body(), Direction::Right, Cell::new(2, 10));
        let choice = steer(&view).expect("a safe move exists");
        assert_ne!(choice, Direction::Left);
    }

    #[test]
    fn avoids_the_outer_wall() {
        let body = vec![Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)];
        let view = snapshot(ModeId::Classic, body, Direction::Right, Cell::new(19, 15));
        assert_eq!(steer(&view), Some(Direction::Down));
    }

    #[test]
    fn wraps_through_edges_in_portal_mode() {
        let body = vec![Cell::new(19, 5), Cell::new(18, 5), Cell::new(17, 5)];
        let view = snapshot(ModeId::Portal, body, Direction::Right, Cell::new(1, 5));
        assert_eq!(steer(&view), Some(Direction::Right));
    }

    #[test]
    fn steers_around_the_boss() {
        let mut view = snapshot(ModeId::Boss, classic_body(), Direction::Right, Cell::new(14, 10));
        view.boss = Some(BossSnapshot {
            region: CellRect::new(Cell::new(11, 8), 4, 4),
            health: 5,
            max_health: 5,
            flashing: false,
        });
        let choice = steer(&view).expect("a safe move exists");
        assert_ne!(choice, Direction::Right);
    }

    #[test]
    fn gives_up_when_boxed_in() {
        let body = vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(0, 2),
        ];
        let view = snapshot(ModeId::Classic, body, Direction::Left, Cell::new(5, 5));
        assert_eq!(steer(&view), None);
    }
}
