#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic boss attack scheduler.
//!
//! The system follows the round through its events: it arms itself when a
//! boss round starts, tracks boss health from damage reports, and emits
//! attack commands on the encounter's tick cadence.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_arcade_core::{AttackKind, BossRules, Command, Event, GridSize, Orientation};

/// Grids at least this wide keep rain columns apart.
const WIDE_GRID: u32 = 20;
const WIDE_RAIN_SPACING: u32 = 2;

/// Configuration parameters required to construct the attack system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

#[derive(Clone, Copy, Debug)]
struct Encounter {
    rules: &'static BossRules,
    grid: GridSize,
    tick: u64,
    attacks_launched: usize,
    health: u32,
}

/// Pure system that emits rain, laser and chaser commands during boss rounds.
#[derive(Debug)]
pub struct BossAttacks {
    rng: ChaCha8Rng,
    encounter: Option<Encounter>,
}

impl BossAttacks {
    /// Creates a new attack system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            encounter: None,
        }
    }

    /// Consumes events to emit attack commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundStarted { mode, .. } => {
                    let rules = mode.rules();
                    self.encounter = rules.hazards.boss.as_ref().map(|boss| Encounter {
                        rules: boss,
                        grid: rules.grid,
                        tick: 0,
                        attacks_launched: 0,
                        health: boss.health,
                    });
                }
                Event::BossDamaged { health } => {
                    if let Some(encounter) = &mut self.encounter {
                        encounter.health = *health;
                    }
                }
                Event::RoundEnded { .. } | Event::ReturnedToMenu => self.encounter = None,
                Event::TimeAdvanced { .. } => self.on_tick(out),
                _ => {}
            }
        }
    }

    fn on_tick(&mut self, out: &mut Vec<Command>) {
        let Some(encounter) = &mut self.encounter else {
            return;
        };
        encounter.tick += 1;
        let rules = encounter.rules;
        let grid = encounter.grid;

        let mut scheduled = None;
        if rules.attack_period > 0
            && encounter.tick % rules.attack_period == 0
            && !rules.attacks.is_empty()
        {
            scheduled = Some(rules.attacks[encounter.attacks_launched % rules.attacks.len()]);
            encounter.attacks_launched += 1;
        }
        let enraged = encounter.health <= rules.enraged_health
            && rules.enraged_rain_period > 0
            && encounter.tick % rules.enraged_rain_period == 0;

        if let Some(kind) = scheduled {
            let command = match kind {
                AttackKind::Rain => Command::SpawnRain {
                    columns: rain_batch(rules, grid, &mut self.rng),
                },
                AttackKind::Laser => {
                    let orientation = if self.rng.gen_bool(0.5) {
                        Orientation::Row
                    } else {
                        Orientation::Column
                    };
                    Command::SpawnLaser {
                        orientation,
                        index: self.rng.gen_range(0..grid.get().max(1)),
                    }
                }
                AttackKind::Chaser => Command::SpawnChaser,
            };
            out.push(command);
        }
        if enraged {
            out.push(Command::SpawnRain {
                columns: vec![self.rng.gen_range(0..grid.get().max(1))],
            });
        }
    }
}

/// Picks the columns of one rain batch, kept apart on wide grids.
fn rain_batch(rules: &BossRules, grid: GridSize, rng: &mut ChaCha8Rng) -> Vec<u32> {
    let (min, max) = rules.rain_batch;
    let wanted = rng.gen_range(min..=max.max(min)) as usize;
    let spacing = if grid.get() >= WIDE_GRID {
        WIDE_RAIN_SPACING
    } else {
        1
    };

    let mut candidates: Vec<u32> = (0..grid.get()).collect();
    candidates.shuffle(rng);

    let mut columns: Vec<u32> = Vec::with_capacity(wanted);
    for column in candidates {
        if columns.len() == wanted {
            break;
        }
        if columns
            .iter()
            .all(|taken| taken.abs_diff(column) >= spacing)
        {
            columns.push(column);
        }
    }
    columns.sort_unstable();
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::ModeId;

    fn boss_rules() -> &'static BossRules {
        ModeId::Boss
            .rules()
            .hazards
            .boss
            .as_ref()
            .expect("boss rules")
    }

    #[test]
    fn rain_batch_respects_size_and_spacing() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let columns = rain_batch(boss_rules(), GridSize::new(24), &mut rng);
            assert!((3..=6).contains(&columns.len()));
            for pair in columns.windows(2) {
                assert!(pair[1] - pair[0] >= 2, "columns too close: {columns:?}");
            }
            assert!(columns.iter().all(|column| *column < 24));
        }
    }

    #[test]
    fn narrow_grid_allows_adjacent_columns() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let columns = rain_batch(boss_rules(), GridSize::new(4), &mut rng);
        assert!((3..=4).contains(&columns.len()));
    }
}
