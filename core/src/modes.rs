//! Declarative rule table describing how each game mode differs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Cell, Direction, GridSize};

const BASE_TICK_PERIOD: Duration = Duration::from_millis(100);
const STANDARD_GRID: GridSize = GridSize::new(20);
const BOSS_GRID: GridSize = GridSize::new(24);

/// Identifier of a selectable game mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeId {
    /// Plain snake inside solid walls.
    Classic,
    /// Edges wrap around instead of killing the snake.
    Portal,
    /// An autonomous enemy snake roams the arena.
    Enemy,
    /// A mirrored shadow of the player acts as a hazard.
    Shadow,
    /// Static maze walls are scattered across the arena.
    Maze,
    /// Poison items shrink the snake.
    Poison,
    /// The game speeds up with every item eaten.
    Speed,
    /// A countdown ends the round unless items keep replenishing it.
    TimeAttack,
    /// Boss encounter with rain and laser attacks.
    Boss,
    /// Boss encounter that adds the chaser attack.
    BossRush,
}

impl ModeId {
    /// Every mode in menu order.
    pub const ALL: [ModeId; 10] = [
        Self::Classic,
        Self::Portal,
        Self::Enemy,
        Self::Shadow,
        Self::Maze,
        Self::Poison,
        Self::Speed,
        Self::TimeAttack,
        Self::Boss,
        Self::BossRush,
    ];

    /// Rule table entry for the mode.
    #[must_use]
    pub fn rules(self) -> &'static ModeRules {
        let index = Self::ALL
            .iter()
            .position(|mode| *mode == self)
            .unwrap_or_default();
        &MODE_TABLE[index]
    }

    /// Human-readable label shown in menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::Portal => "Portal",
            Self::Enemy => "Enemy",
            Self::Shadow => "Shadow",
            Self::Maze => "Maze",
            Self::Poison => "Poison",
            Self::Speed => "Speed",
            Self::TimeAttack => "Time Attack",
            Self::Boss => "Boss",
            Self::BossRush => "Boss Rush",
        }
    }
}

/// Immutable configuration selected by a mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeRules {
    /// Size of the square play grid.
    pub grid: GridSize,
    /// Whether the player snake re-enters on the opposite edge.
    pub wraps: bool,
    /// Period between simulation ticks at round start.
    pub tick_period: Duration,
    /// Extra hazard entities active in the mode.
    pub hazards: Hazards,
    /// How eating changes the tick period.
    pub speed: SpeedRule,
    /// Countdown rule, present for timed modes.
    pub clock: Option<ClockRule>,
    /// Condition that ends the round in Victory.
    pub win: WinCondition,
}

/// Hazard entities enabled by a mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Hazards {
    /// Autonomous enemy snake.
    pub enemy: Option<EnemyRules>,
    /// Whether the mirrored shadow snake is active.
    pub shadow: bool,
    /// Number of static maze wall cells generated per round.
    pub maze_walls: u32,
    /// Number of poison items kept in the arena.
    pub poison_items: u32,
    /// Boss encounter parameters.
    pub boss: Option<BossRules>,
}

impl Hazards {
    const NONE: Hazards = Hazards {
        enemy: None,
        shadow: false,
        maze_walls: 0,
        poison_items: 0,
        boss: None,
    };
}

/// Parameters of the autonomous enemy snake.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyRules {
    /// Fixed body length.
    pub length: usize,
    /// Cell occupied by the head at round start.
    pub start: Cell,
    /// Heading at round start; the body trails behind it.
    pub direction: Direction,
    /// Probability of picking a new heading on each tick.
    pub turn_chance: f64,
}

/// Parameters of the boss encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct BossRules {
    /// Health at the start of the encounter.
    pub health: u32,
    /// Edge length of the square boss block.
    pub size: u32,
    /// Row of the upper edge of the block.
    pub top: i32,
    /// Ticks the boss flashes after a hit.
    pub flash_ticks: u32,
    /// Ticks between scheduled attacks.
    pub attack_period: u64,
    /// Attacks cycled through in order.
    pub attacks: &'static [AttackKind],
    /// Health at or below which extra rain starts.
    pub enraged_health: u32,
    /// Ticks between extra rain drops once enraged.
    pub enraged_rain_period: u64,
    /// Smallest and largest rain batch.
    pub rain_batch: (u32, u32),
    /// Ticks a laser warns before it becomes active.
    pub laser_warning_ticks: u32,
    /// Ticks a laser stays active.
    pub laser_active_ticks: u32,
    /// Ticks a chaser follows the head before locking.
    pub chaser_track_ticks: u32,
    /// Ticks a locked chaser zone stays dangerous.
    pub chaser_lock_ticks: u32,
}

/// Attack launched by the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// A batch of bullets falling from row zero.
    Rain,
    /// A warned sweep over a full row or column.
    Laser,
    /// A zone that tracks the head, then locks in place.
    Chaser,
}

/// How eating changes the tick period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedRule {
    /// The period never changes.
    Constant,
    /// The period is multiplied by `factor` for every item eaten.
    Accelerate {
        /// Multiplier applied to the period.
        factor: f64,
    },
}

/// Countdown rule for timed modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockRule {
    /// Seconds on the clock at round start.
    pub start_seconds: u32,
    /// Seconds added for every item eaten.
    pub bonus_seconds: u32,
}

/// Condition that ends the round in Victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WinCondition {
    /// The round only ends in GameOver.
    None,
    /// Reducing the boss to zero health wins the round.
    DefeatBoss,
}

const fn standard(hazards: Hazards) -> ModeRules {
    ModeRules {
        grid: STANDARD_GRID,
        wraps: false,
        tick_period: BASE_TICK_PERIOD,
        hazards,
        speed: SpeedRule::Constant,
        clock: None,
        win: WinCondition::None,
    }
}

const fn boss_encounter(
    attacks: &'static [AttackKind],
    enraged_rain_period: u64,
) -> ModeRules {
    ModeRules {
        grid: BOSS_GRID,
        wraps: false,
        tick_period: BASE_TICK_PERIOD,
        hazards: Hazards {
            boss: Some(BossRules {
                health: 5,
                size: 4,
                top: 3,
                flash_ticks: 6,
                attack_period: 15,
                attacks,
                enraged_health: 3,
                enraged_rain_period,
                rain_batch: (3, 6),
                laser_warning_ticks: 10,
                laser_active_ticks: 3,
                chaser_track_ticks: 30,
                chaser_lock_ticks: 5,
            }),
            ..Hazards::NONE
        },
        speed: SpeedRule::Constant,
        clock: None,
        win: WinCondition::DefeatBoss,
    }
}

static MODE_TABLE: [ModeRules; 10] = [
    standard(Hazards::NONE),
    ModeRules {
        wraps: true,
        ..standard(Hazards::NONE)
    },
    standard(Hazards {
        enemy: Some(EnemyRules {
            length: 5,
            start: Cell::new(3, 3),
            direction: Direction::Right,
            turn_chance: 0.25,
        }),
        ..Hazards::NONE
    }),
    standard(Hazards {
        shadow: true,
        ..Hazards::NONE
    }),
    standard(Hazards {
        maze_walls: 24,
        ..Hazards::NONE
    }),
    standard(Hazards {
        poison_items: 3,
        ..Hazards::NONE
    }),
    ModeRules {
        speed: SpeedRule::Accelerate { factor: 0.95 },
        ..standard(Hazards::NONE)
    },
    ModeRules {
        clock: Some(ClockRule {
            start_seconds: 30,
            bonus_seconds: 3,
        }),
        ..standard(Hazards::NONE)
    },
    boss_encounter(&[AttackKind::Rain, AttackKind::Laser], 10),
    boss_encounter(
        &[AttackKind::Rain, AttackKind::Laser, AttackKind::Chaser],
        8,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_resolves_its_own_entry() {
        assert!(ModeId::Portal.rules().wraps);
        assert!(!ModeId::Classic.rules().wraps);
        assert!(ModeId::Shadow.rules().hazards.shadow);
        assert_eq!(ModeId::Maze.rules().hazards.maze_walls, 24);
        assert_eq!(ModeId::Poison.rules().hazards.poison_items, 3);
        assert!(ModeId::Enemy.rules().hazards.enemy.is_some());
        assert_eq!(
            ModeId::Speed.rules().speed,
            SpeedRule::Accelerate { factor: 0.95 }
        );
        assert!(ModeId::TimeAttack.rules().clock.is_some());
    }

    #[test]
    fn only_boss_modes_can_be_won() {
        for mode in ModeId::ALL {
            let rules = mode.rules();
            let boss = rules.hazards.boss.is_some();
            assert_eq!(boss, rules.win == WinCondition::DefeatBoss, "{mode:?}");
        }
    }

    #[test]
    fn boss_rush_adds_the_chaser_attack() {
        let boss = ModeId::Boss.rules().hazards.boss.as_ref().expect("boss");
        let rush = ModeId::BossRush.rules().hazards.boss.as_ref().expect("boss");
        assert_eq!(boss.attacks.len(), 2);
        assert_eq!(rush.attacks.last(), Some(&AttackKind::Chaser));
        assert_eq!(boss.enraged_rain_period, 10);
        assert_eq!(rush.enraged_rain_period, 8);
    }

    #[test]
    fn boss_block_does_not_cover_the_starting_body() {
        for mode in [ModeId::Boss, ModeId::BossRush] {
            let rules = mode.rules();
            let boss = rules.hazards.boss.as_ref().expect("boss");
            let mid = rules.grid.mid();
            let bottom = boss.top + boss.size as i32;
            assert!(bottom < mid);
        }
    }
}
