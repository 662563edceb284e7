#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state and simulation driver for the snake arcade.
//!
//! The world owns every entity of the live round. [`apply`] is the only
//! mutation entry point: it executes one [`Command`] and appends the
//! resulting [`Event`] values. The [`query`] module exposes read-only views.

use std::{collections::HashSet, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_arcade_core::{
    AttackKind, Cell, Command, Direction, EndReason, Event, ItemKind, ModeId, ModeRules,
    Orientation, Outcome, RoundPhase, SpawnError, SpeedRule, WinCondition, ITEM_SCORE,
};

mod boss;
mod enemy;
mod items;
mod maze;
mod snake;

#[cfg(any(test, feature = "round_scaffolding"))]
pub mod scaffold;


use boss::{Boss, Projectile};
use enemy::EnemySnake;
use items::Item;
use snake::Snake;

const STARTING_LENGTH: usize = 3;
const STARTING_DIRECTION: Direction = Direction::Right;
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Represents the authoritative state of one snake arcade session.
#[derive(Debug)]
pub struct World {
    mode: ModeId,
    rules: &'static ModeRules,
    phase: RoundPhase,
    rng: ChaCha8Rng,
    snake: Snake,
    food: Option<Item>,
    poison: Vec<Item>,
    enemy: Option<EnemySnake>,
    walls: Vec<Cell>,
    wall_lookup: HashSet<Cell>,
    boss: Option<Boss>,
    projectiles: Vec<Projectile>,
    score: u32,
    tick_index: u64,
    tick_period: Duration,
    time_remaining: Option<u32>,
}

impl World {
    /// Creates a world waiting in the menu, seeded for reproducible rounds.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mode = ModeId::Classic;
        let rules = mode.rules();
        let mut world = Self {
            mode,
            rules,
            phase: RoundPhase::Menu,
            rng: ChaCha8Rng::seed_from_u64(seed),
            snake: Snake::new(Cell::new(0, 0), STARTING_DIRECTION, STARTING_LENGTH),
            food: None,
            poison: Vec::new(),
            enemy: None,
            walls: Vec::new(),
            wall_lookup: HashSet::new(),
            boss: None,
            projectiles: Vec::new(),
            score: 0,
            tick_index: 0,
            tick_period: rules.tick_period,
            time_remaining: None,
        };
        world.populate(mode);
        world
    }

    /// Replaces every entity with the starting layout of `mode`.
    fn populate(&mut self, mode: ModeId) {
        let rules = mode.rules();
        let grid = rules.grid;
        let mid = grid.mid();

        self.mode = mode;
        self.rules = rules;
        self.snake = Snake::new(Cell::new(mid, mid), STARTING_DIRECTION, STARTING_LENGTH);
        self.enemy = rules
            .hazards
            .enemy
            .as_ref()
            .map(|enemy| EnemySnake::new(enemy, grid));
        self.boss = rules.hazards.boss.as_ref().map(|boss| Boss::new(boss, grid));
        self.projectiles.clear();

        let start_body: Vec<Cell> = self.snake.body().collect();
        self.walls = maze::generate(grid, &start_body, rules.hazards.maze_walls, &mut self.rng);
        self.wall_lookup = self.walls.iter().copied().collect();

        self.food = None;
        self.poison.clear();
        self.food = self.spawn_item(self.main_item_kind()).ok();
        for _ in 0..rules.hazards.poison_items {
            if let Ok(item) = self.spawn_item(ItemKind::Poison) {
                self.poison.push(item);
            }
        }

        self.score = 0;
        self.tick_index = 0;
        self.tick_period = rules.tick_period;
        self.time_remaining = rules.clock.map(|clock| clock.start_seconds);
    }

    fn main_item_kind(&self) -> ItemKind {
        if self.boss.is_some() {
            ItemKind::Orb
        } else {
            ItemKind::Food
        }
    }

    /// Every cell an item must not be placed on.
    fn occupied_cells(&self) -> HashSet<Cell> {
        let mut occupied: HashSet<Cell> = self.snake.body().collect();
        occupied.extend(self.walls.iter().copied());
        occupied.extend(self.poison.iter().map(|item| item.cell));
        if let Some(food) = self.food {
            let _ = occupied.insert(food.cell);
        }
        if let Some(enemy) = &self.enemy {
            occupied.extend(enemy.cells().iter().copied());
        }
        if let Some(boss) = &self.boss {
            occupied.extend(boss.region.cells());
        }
        occupied
    }

    fn spawn_item(&mut self, kind: ItemKind) -> Result<Item, SpawnError> {
        let occupied = self.occupied_cells();
        Item::spawn(kind, self.rules.grid, &occupied, &mut self.rng)
    }

    fn end_round(&mut self, outcome: Outcome, reason: EndReason, out_events: &mut Vec<Event>) {
        self.phase = outcome.phase();
        out_events.push(Event::RoundEnded {
            outcome,
            reason,
            score: self.score,
        });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        let grid = self.rules.grid;
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        let head = self.snake.advance(grid, self.rules.wraps);
        out_events.push(Event::SnakeAdvanced {
            head,
            length: self.snake.len(),
        });
        if let Some(enemy) = &mut self.enemy {
            enemy.advance(grid);
        }
        if let Some(boss) = &mut self.boss {
            boss.cool_down();
        }
        for projectile in &mut self.projectiles {
            projectile.step(head);
        }
        self.projectiles
            .retain(|projectile| !projectile.expired(grid));

        if let Some(reason) = self.fatal_collision() {
            self.end_round(Outcome::GameOver, reason, out_events);
            return;
        }

        if self
            .projectiles
            .iter()
            .any(|projectile| projectile.hits(&self.snake))
        {
            self.end_round(Outcome::GameOver, EndReason::Projectile, out_events);
            return;
        }

        self.consume_food(out_events);
        if self.phase == RoundPhase::Playing {
            self.consume_poison(out_events);
        }
    }

    /// Checks the collisions that end the round, in their fixed order.
    fn fatal_collision(&self) -> Option<EndReason> {
        let rules = self.rules;
        if !rules.wraps && self.snake.collides_wall(rules.grid) {
            return Some(EndReason::Wall);
        }
        if self.snake.collides_self() {
            return Some(EndReason::SelfCollision);
        }
        if self.wall_lookup.contains(&self.snake.head()) {
            return Some(EndReason::MazeWall);
        }
        if let Some(enemy) = &self.enemy {
            if self.snake.collides_body(enemy.cells()) {
                return Some(EndReason::Enemy);
            }
        }
        if rules.hazards.shadow {
            let shadow = enemy::shadow_of(rules.grid, self.snake.body());
            if self.snake.collides_body(&shadow) {
                return Some(EndReason::Shadow);
            }
        }
        if let Some(boss) = &self.boss {
            if self.snake.collides_rect(boss.region) {
                return Some(EndReason::Boss);
            }
        }
        None
    }

    fn consume_food(&mut self, out_events: &mut Vec<Event>) {
        let Some(food) = self.food else {
            return;
        };
        if !self.snake.collides_point(food.cell) {
            return;
        }

        self.snake.grow();
        self.score = self.score.saturating_add(ITEM_SCORE);
        out_events.push(Event::ItemConsumed {
            kind: food.kind,
            cell: food.cell,
        });
        out_events.push(Event::ScoreChanged { score: self.score });

        if let Some(boss) = &mut self.boss {
            let health = boss.hit();
            out_events.push(Event::BossDamaged { health });
            if self.rules.win == WinCondition::DefeatBoss && health == 0 {
                self.food = None;
                self.end_round(Outcome::Victory, EndReason::BossDefeated, out_events);
                return;
            }
        }

        if let SpeedRule::Accelerate { factor } = self.rules.speed {
            self.tick_period = self.tick_period.mul_f64(factor).max(MIN_TICK_PERIOD);
            out_events.push(Event::TickPeriodChanged {
                period: self.tick_period,
            });
        }
        if let (Some(clock), Some(remaining)) = (self.rules.clock, self.time_remaining) {
            let seconds = remaining.saturating_add(clock.bonus_seconds);
            self.time_remaining = Some(seconds);
            out_events.push(Event::TimeRemainingChanged { seconds });
        }

        self.food = None;
        match self.spawn_item(food.kind) {
            Ok(item) => self.food = Some(item),
            Err(_) => self.end_round(Outcome::GameOver, EndReason::BoardFull, out_events),
        }
    }

    fn consume_poison(&mut self, out_events: &mut Vec<Event>) {
        let Some(index) = self
            .poison
            .iter()
            .position(|item| self.snake.collides_point(item.cell))
        else {
            return;
        };

        let item = self.poison.remove(index);
        out_events.push(Event::ItemConsumed {
            kind: item.kind,
            cell: item.cell,
        });
        if !self.snake.shrink() {
            self.end_round(Outcome::GameOver, EndReason::Poison, out_events);
            return;
        }
        out_events.push(Event::SnakeShrunk {
            length: self.snake.len(),
        });
        if let Ok(replacement) = self.spawn_item(ItemKind::Poison) {
            self.poison.push(replacement);
        }
    }

    fn clock_second(&mut self, out_events: &mut Vec<Event>) {
        let Some(remaining) = self.time_remaining else {
            return;
        };
        let seconds = remaining.saturating_sub(1);
        self.time_remaining = Some(seconds);
        out_events.push(Event::TimeRemainingChanged { seconds });
        if seconds == 0 {
            self.end_round(Outcome::GameOver, EndReason::TimeUp, out_events);
        }
    }

    fn launch_rain(&mut self, columns: &[u32], out_events: &mut Vec<Event>) {
        let size = self.rules.grid.get();
        let before = self.projectiles.len();
        for column in columns.iter().copied().filter(|column| *column < size) {
            let Ok(x) = i32::try_from(column) else {
                continue;
            };
            self.projectiles.push(Projectile::Bullet {
                cell: Cell::new(x, 0),
            });
        }
        if self.projectiles.len() > before {
            out_events.push(Event::AttackLaunched {
                kind: AttackKind::Rain,
            });
        }
    }

    fn launch_laser(&mut self, orientation: Orientation, index: u32, out_events: &mut Vec<Event>) {
        let Some(rules) = self.rules.hazards.boss.as_ref() else {
            return;
        };
        if index >= self.rules.grid.get() {
            return;
        }
        self.projectiles
            .push(Projectile::laser(orientation, index, rules));
        out_events.push(Event::AttackLaunched {
            kind: AttackKind::Laser,
        });
    }

    fn launch_chaser(&mut self, out_events: &mut Vec<Event>) {
        let Some(rules) = self.rules.hazards.boss.as_ref() else {
            return;
        };
        self.projectiles
            .push(Projectile::chaser(self.snake.head(), rules));
        out_events.push(Event::AttackLaunched {
            kind: AttackKind::Chaser,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that do not fit the current phase are ignored and emit nothing.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRound { mode } => {
            if world.phase == RoundPhase::Playing {
                return;
            }
            world.populate(mode);
            world.phase = RoundPhase::Playing;
            out_events.push(Event::RoundStarted {
                mode,
                tick_period: world.tick_period,
                time_remaining: world.time_remaining,
            });
            if world.food.is_none() {
                world.end_round(Outcome::GameOver, EndReason::BoardFull, out_events);
            }
        }
        Command::AbandonRound => {
            if world.phase == RoundPhase::Playing {
                world.phase = RoundPhase::Menu;
            }
        }
        Command::ReturnToMenu => {
            if world.phase == RoundPhase::Menu {
                return;
            }
            world.phase = RoundPhase::Menu;
            out_events.push(Event::ReturnedToMenu);
        }
        _ if world.phase != RoundPhase::Playing => {}
        Command::SetDirection { direction } => world.snake.set_direction(direction),
        Command::Tick => world.tick(out_events),
        Command::ClockSecond => world.clock_second(out_events),
        Command::SteerEnemy { direction } => {
            if let Some(enemy) = &mut world.enemy {
                enemy.steer(direction);
            }
        }
        Command::SpawnRain { columns } => {
            if world.boss.is_some() {
                world.launch_rain(&columns, out_events);
            }
        }
        Command::SpawnLaser { orientation, index } => {
            world.launch_laser(orientation, index, out_events);
        }
        Command::SpawnChaser => world.launch_chaser(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use snake_arcade_core::{
        BossSnapshot, Cell, EnemySnapshot, GridSize, ItemSnapshot, ModeId, ModeRules,
        RoundPhase, RoundSnapshot,
    };

    /// Lifecycle phase of the world.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world.phase
    }

    /// Mode of the current or most recent round.
    #[must_use]
    pub fn mode(world: &World) -> ModeId {
        world.mode
    }

    /// Rule table entry of the current or most recent round.
    #[must_use]
    pub fn rules(world: &World) -> &'static ModeRules {
        world.rules
    }

    /// Size of the play grid.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.rules.grid
    }

    /// Score accumulated in the round.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Period between simulation ticks.
    #[must_use]
    pub fn tick_period(world: &World) -> Duration {
        world.tick_period
    }

    /// Seconds left on the countdown in timed modes.
    #[must_use]
    pub fn time_remaining(world: &World) -> Option<u32> {
        world.time_remaining
    }

    /// Player body cells, head first.
    #[must_use]
    pub fn snake_body(world: &World) -> Vec<Cell> {
        world.snake.body().collect()
    }

    /// Items currently present in the arena, food first.
    #[must_use]
    pub fn items(world: &World) -> Vec<ItemSnapshot> {
        world
            .food
            .iter()
            .chain(world.poison.iter())
            .map(|item| item.snapshot())
            .collect()
    }

    /// Enemy snake, when the mode has one.
    #[must_use]
    pub fn enemy(world: &World) -> Option<EnemySnapshot> {
        world.enemy.as_ref().map(|enemy| enemy.snapshot())
    }

    /// Shadow snake recomputed from the player body; empty unless the mode has a shadow.
    #[must_use]
    pub fn shadow(world: &World) -> Vec<Cell> {
        if world.rules.hazards.shadow {
            super::enemy::shadow_of(world.rules.grid, world.snake.body())
        } else {
            Vec::new()
        }
    }

    /// Boss state, when the mode has one.
    #[must_use]
    pub fn boss(world: &World) -> Option<BossSnapshot> {
        world.boss.as_ref().map(|boss| boss.snapshot())
    }

    /// Captures everything a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(world: &World) -> RoundSnapshot {
        RoundSnapshot {
            mode: world.mode,
            phase: world.phase,
            grid: world.rules.grid,
            score: world.score,
            tick: world.tick_index,
            tick_period: world.tick_period,
            time_remaining: world.time_remaining,
            snake: snake_body(world),
            direction: world.snake.direction(),
            items: items(world),
            enemy: enemy(world),
            shadow: shadow(world),
            walls: world.walls.clone(),
            boss: boss(world),
            projectiles: world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        }
    }
}
