//! Direct state placement used by tests to stage exact round layouts.

use snake_arcade_core::{Cell, Direction, ItemKind};

use crate::{items::Item, snake::Snake, World};

/// Replaces the player body; `body` lists cells head first.
pub fn place_snake(world: &mut World, body: Vec<Cell>, direction: Direction) {
    world.snake = Snake::from_cells(body, direction);
}

/// Moves the main item (food, or an orb in boss modes) onto `cell`.
pub fn place_food(world: &mut World, cell: Cell) {
    world.food = Some(Item {
        kind: world.main_item_kind(),
        cell,
    });
}

/// Replaces every poison item with items on `cells`.
pub fn place_poison(world: &mut World, cells: &[Cell]) {
    world.poison = cells
        .iter()
        .map(|cell| Item {
            kind: ItemKind::Poison,
            cell: *cell,
        })
        .collect();
}

/// Replaces the maze walls.
pub fn place_walls(world: &mut World, cells: Vec<Cell>) {
    world.wall_lookup = cells.iter().copied().collect();
    world.walls = cells;
}

/// Overrides the boss health when the round has a boss.
pub fn set_boss_health(world: &mut World, health: u32) {
    if let Some(boss) = &mut world.boss {
        boss.health = health;
    }
}

/// Overrides the countdown of a timed round.
pub fn set_time_remaining(world: &mut World, seconds: u32) {
    if world.time_remaining.is_some() {
        world.time_remaining = Some(seconds);
    }
}

/// Removes every live projectile.
pub fn clear_projectiles(world: &mut World) {
    world.projectiles.clear();
}
