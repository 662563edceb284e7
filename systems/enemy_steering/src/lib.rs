#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic system that picks random headings for the enemy snake.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_arcade_core::{Command, Direction, EnemySnapshot, Event};

/// Configuration parameters required to construct the steering system.
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

/// Pure system that occasionally turns the enemy snake.
///
/// On every tick of a round with an enemy, the enemy turns with the mode's
/// turn chance to a uniformly chosen heading that does not reverse it.
#[derive(Debug)]
pub struct EnemySteering {
    rng: ChaCha8Rng,
    turn_chance: Option<f64>,
}

impl EnemySteering {
    /// Creates a new steering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            turn_chance: None,
        }
    }

    /// Consumes events and the enemy view to emit steering commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemy: Option<&EnemySnapshot>,
        out: &mut Vec<Command>,
    ) {
        let mut ticks = 0_usize;
        for event in events {
            match event {
                Event::RoundStarted { mode, .. } => {
                    self.turn_chance = mode
                        .rules()
                        .hazards
                        .enemy
                        .as_ref()
                        .map(|enemy| enemy.turn_chance.clamp(0.0, 1.0));
                    ticks = 0;
                }
                Event::RoundEnded { .. } | Event::ReturnedToMenu => {
                    self.turn_chance = None;
                    ticks = 0;
                }
                Event::TimeAdvanced { .. } => ticks += 1,
                _ => {}
            }
        }

        let (Some(chance), Some(enemy)) = (self.turn_chance, enemy) else {
            return;
        };

        let mut heading = enemy.direction;
        let mut turned = None;
        for _ in 0..ticks {
            if !self.rng.gen_bool(chance) {
                continue;
            }
            let choices: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|direction| !direction.is_opposite(heading))
                .collect();
            let direction = choices[self.rng.gen_range(0..choices.len())];
            heading = direction;
            turned = Some(direction);
        }

        if let Some(direction) = turned {
            out.push(Command::SteerEnemy { direction });
        }
    }
}
