//! Boss block and the projectiles it launches.

use snake_arcade_core::{
    BossRules, BossSnapshot, Cell, CellRect, GridSize, Orientation, ProjectileSnapshot,
};

use crate::snake::Snake;

/// Half-width of the square zone left behind by a locked chaser.
const CHASER_RADIUS: u32 = 1;

#[derive(Clone, Debug)]
pub(crate) struct Boss {
    pub(crate) region: CellRect,
    pub(crate) health: u32,
    max_health: u32,
    flash: u32,
    flash_ticks: u32,
}

impl Boss {
    /// Places the block horizontally centered with its upper edge at `rules.top`.
    pub(crate) fn new(rules: &BossRules, grid: GridSize) -> Self {
        let half = (rules.size / 2) as i32;
        let origin = Cell::new(grid.mid() - half, rules.top);
        Self {
            region: CellRect::new(origin, rules.size, rules.size),
            health: rules.health,
            max_health: rules.health,
            flash: 0,
            flash_ticks: rules.flash_ticks,
        }
    }

    /// Registers a hit and returns the remaining health.
    pub(crate) fn hit(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.flash = self.flash_ticks;
        self.health
    }

    pub(crate) fn cool_down(&mut self) {
        self.flash = self.flash.saturating_sub(1);
    }

    pub(crate) fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            region: self.region,
            health: self.health,
            max_health: self.max_health,
            flashing: self.flash > 0,
        }
    }
}

/// Timed hazard launched by the boss.
///
/// Lasers and chasers count their age in ticks; the age decides whether they
/// are still warning/tracking, armed, or expired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Projectile {
    Bullet {
        cell: Cell,
    },
    Laser {
        orientation: Orientation,
        index: u32,
        age: u32,
        warning: u32,
        active: u32,
    },
    Chaser {
        center: Cell,
        age: u32,
        track: u32,
        lock: u32,
    },
}

impl Projectile {
    pub(crate) fn laser(orientation: Orientation, index: u32, rules: &BossRules) -> Self {
        Self::Laser {
            orientation,
            index,
            age: 0,
            warning: rules.laser_warning_ticks,
            active: rules.laser_active_ticks,
        }
    }

    pub(crate) fn chaser(center: Cell, rules: &BossRules) -> Self {
        Self::Chaser {
            center,
            age: 0,
            track: rules.chaser_track_ticks,
            lock: rules.chaser_lock_ticks,
        }
    }

    /// Advances the projectile by one tick. Chasers follow `head` until they lock.
    pub(crate) fn step(&mut self, head: Cell) {
        match self {
            Self::Bullet { cell } => *cell = Cell::new(cell.x(), cell.y() + 1),
            Self::Laser { age, .. } => *age = age.saturating_add(1),
            Self::Chaser {
                center, age, track, ..
            } => {
                *age = age.saturating_add(1);
                if *age <= *track {
                    *center = head;
                }
            }
        }
    }

    pub(crate) fn expired(&self, grid: GridSize) -> bool {
        match *self {
            Self::Bullet { cell } => i64::from(cell.y()) >= i64::from(grid.get()),
            Self::Laser {
                age,
                warning,
                active,
                ..
            } => age > warning + active,
            Self::Chaser {
                age, track, lock, ..
            } => age > track + lock,
        }
    }

    fn armed(&self) -> bool {
        match *self {
            Self::Bullet { .. } => true,
            Self::Laser {
                age,
                warning,
                active,
                ..
            } => age > warning && age <= warning + active,
            Self::Chaser {
                age, track, lock, ..
            } => age > track && age <= track + lock,
        }
    }

    /// Reports whether the projectile damages any cell of the snake this tick.
    pub(crate) fn hits(&self, snake: &Snake) -> bool {
        if !self.armed() {
            return false;
        }
        match *self {
            Self::Bullet { cell } => snake.body().any(|segment| segment == cell),
            Self::Laser {
                orientation, index, ..
            } => {
                let Ok(line) = i32::try_from(index) else {
                    return false;
                };
                snake.body().any(|segment| match orientation {
                    Orientation::Row => segment.y() == line,
                    Orientation::Column => segment.x() == line,
                })
            }
            Self::Chaser { center, .. } => {
                snake.collides_rect(CellRect::centered(center, CHASER_RADIUS))
            }
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        match *self {
            Self::Bullet { cell } => ProjectileSnapshot::Bullet { cell },
            Self::Laser {
                orientation,
                index,
                age,
                warning,
                ..
            } => ProjectileSnapshot::Laser {
                orientation,
                index,
                warning: age <= warning,
            },
            Self::Chaser {
                center, age, track, ..
            } => ProjectileSnapshot::Chaser {
                zone: CellRect::centered(center, CHASER_RADIUS),
                locked: age > track,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::{Direction, ModeId};

    fn rules() -> &'static BossRules {
        ModeId::BossRush
            .rules()
            .hazards
            .boss
            .as_ref()
            .expect("boss rules")
    }

    #[test]
    fn boss_is_centered_below_the_top_edge() {
        let boss = Boss::new(rules(), GridSize::new(24));
        assert_eq!(boss.region.origin(), Cell::new(10, 3));
        assert_eq!(boss.region.width(), 4);
        assert_eq!(boss.snapshot().health, 5);
    }

    #[test]
    fn hit_flashes_for_configured_ticks() {
        let mut boss = Boss::new(rules(), GridSize::new(24));
        assert_eq!(boss.hit(), 4);
        for _ in 0..5 {
            boss.cool_down();
            assert!(boss.snapshot().flashing);
        }
        boss.cool_down();
        assert!(!boss.snapshot().flashing);
    }

    #[test]
    fn bullet_falls_and_expires_past_last_row() {
        let grid = GridSize::new(4);
        let mut bullet = Projectile::Bullet {
            cell: Cell::new(2, 0),
        };
        for _ in 0..3 {
            bullet.step(Cell::new(0, 0));
            assert!(!bullet.expired(grid));
        }
        bullet.step(Cell::new(0, 0));
        assert!(bullet.expired(grid));
    }

    #[test]
    fn laser_only_damages_in_active_window() {
        let snake = Snake::new(Cell::new(5, 7), Direction::Right, 3);
        let mut laser = Projectile::laser(Orientation::Row, 7, rules());
        for tick in 1..=13 {
            laser.step(Cell::new(5, 7));
            assert_eq!(laser.hits(&snake), tick > 10, "tick {tick}");
        }
        laser.step(Cell::new(5, 7));
        assert!(laser.expired(GridSize::new(24)));
    }

    #[test]
    fn chaser_tracks_then_locks() {
        let mut chaser = Projectile::chaser(Cell::new(1, 1), rules());
        for tick in 1..=30 {
            chaser.step(Cell::new(tick, 2));
        }
        let far = Snake::new(Cell::new(20, 20), Direction::Right, 1);
        assert!(!chaser.hits(&far));
        chaser.step(Cell::new(0, 0));
        match chaser.snapshot() {
            ProjectileSnapshot::Chaser { zone, locked } => {
                assert!(locked);
                assert_eq!(zone, CellRect::centered(Cell::new(30, 2), 1));
            }
            other => panic!("unexpected snapshot {other:?}"),
        }
        let inside = Snake::new(Cell::new(31, 3), Direction::Right, 1);
        assert!(chaser.hits(&inside));
    }

    #[test]
    fn snapshot_phase_follows_damage_window() {
        let snake = Snake::new(Cell::new(5, 7), Direction::Right, 3);
        let grid = GridSize::new(24);
        let mut laser = Projectile::laser(Orientation::Row, 7, rules());
        let mut chaser = Projectile::chaser(Cell::new(6, 7), rules());
        loop {
            laser.step(Cell::new(5, 7));
            if laser.expired(grid) {
                break;
            }
            let ProjectileSnapshot::Laser { warning, .. } = laser.snapshot() else {
                panic!("laser snapshot expected");
            };
            assert_eq!(!warning, laser.armed(), "laser {laser:?}");
            assert_eq!(!warning, laser.hits(&snake), "laser {laser:?}");
        }
        loop {
            chaser.step(Cell::new(5, 7));
            if chaser.expired(grid) {
                break;
            }
            let ProjectileSnapshot::Chaser { locked, .. } = chaser.snapshot() else {
                panic!("chaser snapshot expected");
            };
            assert_eq!(locked, chaser.armed(), "chaser {chaser:?}");
            assert_eq!(locked, chaser.hits(&snake), "chaser {chaser:?}");
        }
    }
}
