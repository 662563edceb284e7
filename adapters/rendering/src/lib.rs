#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for snake arcade adapters.
//!
//! Adapters turn a [`RoundSnapshot`] into a [`Scene`] of painted cells and
//! hand it to a [`RenderingBackend`]. Scenes are plain data; backends never
//! see the world.

use std::{error::Error, fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use snake_arcade_core::{
    Cell, GridSize, ItemColor, ItemKind, ModeId, Orientation, ProjectileSnapshot, RoundPhase,
    RoundSnapshot,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl From<ItemColor> for Color {
    fn from(color: ItemColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

const SNAKE_HEAD: Color = Color::from_rgb_u8(0x7c, 0xff, 0x4f);
const SNAKE_BODY: Color = Color::from_rgb_u8(0x2e, 0xb8, 0x3a);
const ENEMY: Color = Color::from_rgb_u8(0xff, 0x8c, 0x1a);
const SHADOW: Color = Color::from_rgb_u8(0x55, 0x55, 0x77);
const MAZE_WALL: Color = Color::from_rgb_u8(0x80, 0x80, 0x80);
const BOSS: Color = Color::from_rgb_u8(0x8b, 0x00, 0x8b);
const BULLET: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
const LASER: Color = Color::from_rgb_u8(0xff, 0x20, 0x20);
const CHASER: Color = Color::from_rgb_u8(0x00, 0xbf, 0xff);
const GRID_LINE: Color = Color::from_rgb_u8(0x22, 0x22, 0x22);
const BOSS_FLASH_LIGHTEN: f32 = 0.6;
const LASER_WARNING_ALPHA: f32 = 0.35;

/// Pixel geometry of the square play grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of cells along each edge.
    pub cells: u32,
    /// Side length of a single cell expressed in pixels.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when the grid has no cells or the cell length is not positive.
    pub fn new(cells: u32, cell_length: f32, line_color: Color) -> Result<Self, RenderingError> {
        if cells == 0 {
            return Err(RenderingError::EmptyGrid);
        }
        if cell_length <= f32::EPSILON || !cell_length.is_finite() {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            cells,
            cell_length,
            line_color,
        })
    }

    /// Total side length of the grid in pixels.
    #[must_use]
    pub fn side_length(&self) -> f32 {
        self.cells as f32 * self.cell_length
    }

    /// Top-left pixel corner of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Vec2 {
        Vec2::new(cell.x() as f32, cell.y() as f32) * self.cell_length
    }
}

/// One painted grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCell {
    /// Grid cell being painted.
    pub cell: Cell,
    /// Top-left pixel corner of the cell.
    pub origin: Vec2,
    /// Fill color.
    pub color: Color,
    /// Character used by text backends.
    pub glyph: char,
}

/// Textual status drawn next to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Mode being played.
    pub mode: ModeId,
    /// Lifecycle phase of the round.
    pub phase: RoundPhase,
    /// Round score.
    pub score: u32,
    /// Ticks elapsed in the round.
    pub tick: u64,
    /// Countdown seconds in timed modes.
    pub time_remaining: Option<u32>,
    /// Remaining and starting boss health.
    pub boss_health: Option<(u32, u32)>,
}

/// Renderable description of one frame. Later cells paint over earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid geometry.
    pub grid: GridPresentation,
    /// Painted cells in drawing order.
    pub cells: Vec<SceneCell>,
    /// Status text.
    pub hud: Hud,
}

impl Scene {
    /// Default cell side length in pixels.
    pub const DEFAULT_CELL_LENGTH: f32 = 20.0;

    /// Builds the scene for a snapshot.
    pub fn from_snapshot(
        snapshot: &RoundSnapshot,
        cell_length: f32,
    ) -> Result<Self, RenderingError> {
        let grid = GridPresentation::new(snapshot.grid.get(), cell_length, GRID_LINE)?;
        let mut painter = Painter {
            grid,
            size: snapshot.grid,
            cells: Vec::new(),
        };

        for projectile in &snapshot.projectiles {
            if let ProjectileSnapshot::Laser {
                orientation,
                index,
                warning,
            } = *projectile
            {
                let (glyph, color) = if warning {
                    (':', LASER.with_alpha(LASER_WARNING_ALPHA))
                } else {
                    ('=', LASER)
                };
                painter.line(orientation, index, glyph, color);
            }
        }
        painter.paint_all(snapshot.walls.iter().copied(), '#', MAZE_WALL);
        for item in &snapshot.items {
            let glyph = match item.kind {
                ItemKind::Food => '*',
                ItemKind::Poison => 'x',
                ItemKind::Orb => 'o',
            };
            painter.paint(item.cell, glyph, item.color.into());
        }
        if let Some(boss) = snapshot.boss {
            let (glyph, color) = if boss.flashing {
                ('b', BOSS.lighten(BOSS_FLASH_LIGHTEN))
            } else {
                ('B', BOSS)
            };
            painter.paint_all(boss.region.cells(), glyph, color);
        }
        painter.paint_all(snapshot.shadow.iter().copied(), 's', SHADOW);
        if let Some(enemy) = &snapshot.enemy {
            painter.paint_all(enemy.body.iter().copied(), 'e', ENEMY);
        }
        for projectile in &snapshot.projectiles {
            match *projectile {
                ProjectileSnapshot::Bullet { cell } => painter.paint(cell, '|', BULLET),
                ProjectileSnapshot::Chaser { zone, locked } => {
                    let (glyph, color) = if locked {
                        ('X', CHASER)
                    } else {
                        ('+', CHASER.with_alpha(LASER_WARNING_ALPHA))
                    };
                    painter.paint_all(zone.cells(), glyph, color);
                }
                ProjectileSnapshot::Laser { .. } => {}
            }
        }
        painter.paint_all(snapshot.snake.iter().skip(1).copied(), 'S', SNAKE_BODY);
        if let Some(head) = snapshot.head() {
            painter.paint(head, '@', SNAKE_HEAD);
        }

        Ok(Self {
            grid,
            cells: painter.cells,
            hud: Hud {
                mode: snapshot.mode,
                phase: snapshot.phase,
                score: snapshot.score,
                tick: snapshot.tick,
                time_remaining: snapshot.time_remaining,
                boss_health: snapshot.boss.map(|boss| (boss.health, boss.max_health)),
            },
        })
    }

    /// Topmost glyph painted on `cell`.
    #[must_use]
    pub fn glyph_at(&self, cell: Cell) -> Option<char> {
        self.cells
            .iter()
            .rev()
            .find(|painted| painted.cell == cell)
            .map(|painted| painted.glyph)
    }

    /// Renders the grid as rows of glyphs, `.` marking empty cells.
    #[must_use]
    pub fn to_text(&self) -> String {
        let side = self.grid.cells as usize;
        let mut rows = vec![vec!['.'; side]; side];
        for painted in &self.cells {
            let (Ok(x), Ok(y)) = (
                usize::try_from(painted.cell.x()),
                usize::try_from(painted.cell.y()),
            ) else {
                continue;
            };
            if x < side && y < side {
                rows[y][x] = painted.glyph;
            }
        }
        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct Painter {
    grid: GridPresentation,
    size: GridSize,
    cells: Vec<SceneCell>,
}

impl Painter {
    fn paint(&mut self, cell: Cell, glyph: char, color: Color) {
        if !self.size.contains(cell) {
            return;
        }
        self.cells.push(SceneCell {
            cell,
            origin: self.grid.cell_origin(cell),
            color,
            glyph,
        });
    }

    fn paint_all(&mut self, cells: impl IntoIterator<Item = Cell>, glyph: char, color: Color) {
        for cell in cells {
            self.paint(cell, glyph, color);
        }
    }

    fn line(&mut self, orientation: Orientation, index: u32, glyph: char, color: Color) {
        let Ok(index) = i32::try_from(index) else {
            return;
        };
        let span = i32::try_from(self.size.get()).unwrap_or(i32::MAX);
        for offset in 0..span {
            let cell = match orientation {
                Orientation::Row => Cell::new(offset, index),
                Orientation::Column => Cell::new(index, offset),
            };
            self.paint(cell, glyph, color);
        }
    }
}

/// Rendering backend capable of presenting snake arcade scenes.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend writing scenes as plain text frames.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the backend and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let hud = scene.hud;
        let mut status = format!(
            "{} | tick {} | score {}",
            hud.mode.label(),
            hud.tick,
            hud.score
        );
        if let Some(seconds) = hud.time_remaining {
            status.push_str(&format!(" | time {seconds}s"));
        }
        if let Some((health, max_health)) = hud.boss_health {
            status.push_str(&format!(" | boss {health}/{max_health}"));
        }
        writeln!(self.writer, "{status}\n{}\n", scene.to_text())
            .context("failed to write text frame")?;
        self.writer.flush().context("failed to flush text frame")
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grids must contain at least one cell.
    EmptyGrid,
    /// Cell length must be positive and finite.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must contain at least one cell"),
            Self::InvalidCellLength { cell_length } => {
                write!(f, "cell length must be positive (received {cell_length})")
            }
        }
    }
}

impl Error for RenderingError {}
