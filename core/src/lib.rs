#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the snake arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Mode-specific rules live in a static table reachable through
//! [`ModeId::rules`]; the simulation consults that table instead of branching
//! on mode identity.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod modes;

pub use modes::{
    AttackKind, BossRules, ClockRule, EnemyRules, Hazards, ModeId, ModeRules, SpeedRule,
    WinCondition,
};

/// Number of points awarded for every food item or orb eaten.
pub const ITEM_SCORE: u32 = 10;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces every entity with a fresh round of the provided mode.
    StartRound {
        /// Mode whose rule table entry configures the round.
        mode: ModeId,
    },
    /// Queues a direction change for the player snake.
    SetDirection {
        /// Requested direction of travel.
        direction: Direction,
    },
    /// Advances the simulation by one discrete step.
    Tick,
    /// Removes one second from the round countdown.
    ClockSecond,
    /// Changes the heading of the autonomous enemy snake.
    SteerEnemy {
        /// Heading the enemy should use on its next advance.
        direction: Direction,
    },
    /// Drops a batch of rain bullets at row zero.
    SpawnRain {
        /// Columns that receive one bullet each.
        columns: Vec<u32>,
    },
    /// Arms a laser sweeping a full row or column.
    SpawnLaser {
        /// Axis covered by the laser.
        orientation: Orientation,
        /// Row or column index covered by the laser.
        index: u32,
    },
    /// Releases a chaser zone at the player's head.
    SpawnChaser,
    /// Abandons the current round and returns to the menu.
    ReturnToMenu,
    /// Stops a running round without announcing it, so that a new round can start in its place.
    AbandonRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new round began.
    RoundStarted {
        /// Mode selected for the round.
        mode: ModeId,
        /// Period between simulation ticks at round start.
        tick_period: Duration,
        /// Seconds on the countdown, present for timed modes.
        time_remaining: Option<u32>,
    },
    /// Indicates that the simulation completed a movement step.
    TimeAdvanced {
        /// One-based index of the tick within the round.
        tick: u64,
    },
    /// Confirms that the player snake moved.
    SnakeAdvanced {
        /// Cell occupied by the head after the move.
        head: Cell,
        /// Number of body cells after the move.
        length: usize,
    },
    /// Reports that the player ate an item.
    ItemConsumed {
        /// Kind of item that was eaten.
        kind: ItemKind,
        /// Cell the item occupied.
        cell: Cell,
    },
    /// Reports a new round score.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// Reports that poison removed a body cell.
    SnakeShrunk {
        /// Number of body cells after shrinking.
        length: usize,
    },
    /// Reports that an orb damaged the boss.
    BossDamaged {
        /// Health remaining after the hit.
        health: u32,
    },
    /// Confirms that a boss attack entered the arena.
    AttackLaunched {
        /// Attack that was launched.
        kind: AttackKind,
    },
    /// Reports that the simulation tick period changed.
    TickPeriodChanged {
        /// New period between simulation ticks.
        period: Duration,
    },
    /// Reports the countdown value after a change.
    TimeRemainingChanged {
        /// Seconds left on the countdown.
        seconds: u32,
    },
    /// Announces that the round reached a terminal state.
    RoundEnded {
        /// Terminal state reached.
        outcome: Outcome,
        /// What ended the round.
        reason: EndReason,
        /// Final round score.
        score: u32,
    },
    /// Confirms that the world returned to the menu.
    ReturnedToMenu,
}

/// Lifecycle phase of the round owned by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Awaiting mode selection.
    Menu,
    /// Simulation active.
    Playing,
    /// Round lost; simulation stopped.
    GameOver,
    /// Round won; simulation stopped.
    Victory,
}

impl RoundPhase {
    /// Reports whether the phase is GameOver or Victory.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Terminal state reached by a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player lost.
    GameOver,
    /// The player won.
    Victory,
}

impl Outcome {
    /// Phase the world enters for this outcome.
    #[must_use]
    pub const fn phase(self) -> RoundPhase {
        match self {
            Self::GameOver => RoundPhase::GameOver,
            Self::Victory => RoundPhase::Victory,
        }
    }
}

/// Reason a round reached its terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Head left the grid in a non-wrapping mode.
    Wall,
    /// Head ran into the snake's own body.
    SelfCollision,
    /// Head ran into the enemy snake.
    Enemy,
    /// Head ran into the mirrored shadow snake.
    Shadow,
    /// Head ran into a maze wall.
    MazeWall,
    /// Poison was eaten at minimum length.
    Poison,
    /// Head entered the boss hitbox.
    Boss,
    /// A boss projectile hit the snake.
    Projectile,
    /// The countdown reached zero.
    TimeUp,
    /// No free cell remained for the next food item.
    BoardFull,
    /// The boss ran out of health.
    BossDefeated,
}

/// Cardinal movement directions available to snakes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit delta applied to a cell when moving in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the exact opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` is the exact inverse of this direction.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Axis covered by a laser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// The laser covers a full row.
    Row,
    /// The laser covers a full column.
    Column,
}

/// Location of a single grid cell.
///
/// Coordinates are signed so that a head stepping past the border in a
/// non-wrapping mode is representable until the wall check rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Neighbouring cell one step in the provided direction, without bounds handling.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the Chebyshev (king move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Side length of the square play grid, measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize(u32);

impl GridSize {
    /// Creates a new grid size.
    #[must_use]
    pub const fn new(cells: u32) -> Self {
        Self(cells)
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    /// Index of the middle row and column.
    #[must_use]
    pub const fn mid(&self) -> i32 {
        (self.0 / 2) as i32
    }

    /// Reports whether the cell lies inside `[0, size)` on both axes.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        let size = self.signed();
        (0..size).contains(&cell.x()) && (0..size).contains(&cell.y())
    }

    /// Maps the cell back into the grid by taking both coordinates modulo the size.
    #[must_use]
    pub fn wrap(&self, cell: Cell) -> Cell {
        let size = self.signed().max(1);
        Cell::new(cell.x().rem_euclid(size), cell.y().rem_euclid(size))
    }

    /// Point reflection of the cell across the grid center.
    #[must_use]
    pub fn mirror(&self, cell: Cell) -> Cell {
        let last = self.signed() - 1;
        Cell::new(last - cell.x(), last - cell.y())
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let size = self.signed();
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }

    fn signed(&self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: Cell,
    width: u32,
    height: u32,
}

impl CellRect {
    /// Constructs a rectangle from its upper-left cell and size.
    #[must_use]
    pub const fn new(origin: Cell, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Square rectangle of side `2 * radius + 1` centered on the provided cell.
    #[must_use]
    pub const fn centered(center: Cell, radius: u32) -> Self {
        let offset = radius as i32;
        Self::new(
            Cell::new(center.x() - offset, center.y() - offset),
            radius * 2 + 1,
            radius * 2 + 1,
        )
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Cell {
        self.origin
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        let dx = i64::from(cell.x()) - i64::from(self.origin.x());
        let dy = i64::from(cell.y()) - i64::from(self.origin.y());
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }

    /// Iterator over every cell covered by the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let origin = self.origin;
        let width = self.width as i32;
        (0..self.height as i32)
            .flat_map(move |dy| (0..width).map(move |dx| Cell::new(origin.x() + dx, origin.y() + dy)))
    }
}

/// Kinds of single-cell items that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Regular food: grows the snake and scores.
    Food,
    /// Poison: shrinks the snake.
    Poison,
    /// Boss-mode orb: scores, grows the snake and damages the boss.
    Orb,
}

impl ItemKind {
    /// Visual tag attached to the item.
    #[must_use]
    pub const fn color(self) -> ItemColor {
        match self {
            Self::Food => ItemColor::from_rgb(0xff, 0x00, 0x44),
            Self::Poison => ItemColor::from_rgb(0xa0, 0x3c, 0xff),
            Self::Orb => ItemColor::from_rgb(0xff, 0xd7, 0x00),
        }
    }
}

/// Visual appearance applied to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl ItemColor {
    /// Creates a new item color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Failure raised when an item cannot be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Every cell of the grid is occupied.
    #[error("no free cell left in a {size}x{size} grid")]
    NoFreeCell {
        /// Edge length of the saturated grid.
        size: u32,
    },
}

/// Immutable representation of a single item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Kind of item.
    pub kind: ItemKind,
    /// Cell occupied by the item.
    pub cell: Cell,
    /// Visual tag of the item.
    pub color: ItemColor,
}

/// Immutable representation of the autonomous enemy snake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Body cells, head first.
    pub body: Vec<Cell>,
    /// Heading used by the most recent advance.
    pub direction: Direction,
}

/// Immutable representation of the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BossSnapshot {
    /// Cells occupied by the boss hitbox.
    pub region: CellRect,
    /// Health remaining.
    pub health: u32,
    /// Health at the start of the encounter.
    pub max_health: u32,
    /// Whether the boss is flashing after a hit. Presentation only.
    pub flashing: bool,
}

/// Immutable representation of a boss projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileSnapshot {
    /// A falling rain bullet.
    Bullet {
        /// Cell currently occupied by the bullet.
        cell: Cell,
    },
    /// A laser covering a row or column.
    Laser {
        /// Axis covered by the laser.
        orientation: Orientation,
        /// Row or column index.
        index: u32,
        /// Whether the laser is still in its harmless warning window.
        warning: bool,
    },
    /// A chaser zone following or locked near the player.
    Chaser {
        /// Area the zone covers.
        zone: CellRect,
        /// Whether the zone stopped tracking the head.
        locked: bool,
    },
}

/// Read-only snapshot describing everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSnapshot {
    /// Mode of the current or most recent round.
    pub mode: ModeId,
    /// Lifecycle phase of the world.
    pub phase: RoundPhase,
    /// Size of the play grid.
    pub grid: GridSize,
    /// Score accumulated in the round.
    pub score: u32,
    /// Number of ticks simulated in the round.
    pub tick: u64,
    /// Period between simulation ticks.
    pub tick_period: Duration,
    /// Seconds left on the countdown in timed modes.
    pub time_remaining: Option<u32>,
    /// Player body, head first.
    pub snake: Vec<Cell>,
    /// Direction applied by the player's most recent advance.
    pub direction: Direction,
    /// Items present in the arena.
    pub items: Vec<ItemSnapshot>,
    /// Enemy snake, when present.
    pub enemy: Option<EnemySnapshot>,
    /// Mirrored shadow body, empty unless the mode has a shadow.
    pub shadow: Vec<Cell>,
    /// Static maze wall cells.
    pub walls: Vec<Cell>,
    /// Boss state, when present.
    pub boss: Option<BossSnapshot>,
    /// Active boss projectiles.
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl RoundSnapshot {
    /// Head of the player snake.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    /// Number of cells occupied by the player snake.
    #[must_use]
    pub fn length(&self) -> usize {
        self.snake.len()
    }
}
