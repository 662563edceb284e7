use std::time::Duration;

use snake_arcade_core::{
    AttackKind, Cell, Command, Direction, EndReason, Event, ModeId, Outcome, ProjectileSnapshot,
};
use snake_arcade_system_boss_attacks::{BossAttacks, Config};
use snake_arcade_world::{self as world, query, scaffold, World};

fn round_started(mode: ModeId) -> Event {
    Event::RoundStarted {
        mode,
        tick_period: Duration::from_millis(100),
        time_remaining: None,
    }
}

/// Feeds one tick at a time and records the commands emitted on each tick.
fn run_ticks(attacks: &mut BossAttacks, first: u64, last: u64) -> Vec<(u64, Command)> {
    let mut emitted = Vec::new();
    for tick in first..=last {
        let mut commands = Vec::new();
        attacks.handle(&[Event::TimeAdvanced { tick }], &mut commands);
        emitted.extend(commands.into_iter().map(|command| (tick, command)));
    }
    emitted
}

fn kind_of(command: &Command) -> AttackKind {
    match command {
        Command::SpawnRain { .. } => AttackKind::Rain,
        Command::SpawnLaser { .. } => AttackKind::Laser,
        Command::SpawnChaser => AttackKind::Chaser,
        other => panic!("unexpected command emitted: {other:?}"),
    }
}

#[test]
fn boss_cycles_rain_and_laser_every_fifteen_ticks() {
    let mut attacks = BossAttacks::new(Config::new(0xb055));
    let mut commands = Vec::new();
    attacks.handle(&[round_started(ModeId::Boss)], &mut commands);
    assert!(commands.is_empty());

    let emitted = run_ticks(&mut attacks, 1, 60);
    let schedule: Vec<(u64, AttackKind)> = emitted
        .iter()
        .map(|(tick, command)| (*tick, kind_of(command)))
        .collect();
    assert_eq!(
        schedule,
        vec![
            (15, AttackKind::Rain),
            (30, AttackKind::Laser),
            (45, AttackKind::Rain),
            (60, AttackKind::Laser),
        ]
    );
}

#[test]
fn boss_rush_adds_the_chaser() {
    let mut attacks = BossAttacks::new(Config::new(3));
    let mut commands = Vec::new();
    attacks.handle(&[round_started(ModeId::BossRush)], &mut commands);

    let kinds: Vec<AttackKind> = run_ticks(&mut attacks, 1, 60)
        .iter()
        .map(|(_, command)| kind_of(command))
        .collect();
    assert_eq!(
        kinds,
        vec![
            AttackKind::Rain,
            AttackKind::Laser,
            AttackKind::Chaser,
            AttackKind::Rain,
        ]
    );
}

#[test]
fn lasers_stay_on_the_grid() {
    let mut attacks = BossAttacks::new(Config::new(17));
    let mut commands = Vec::new();
    attacks.handle(&[round_started(ModeId::Boss)], &mut commands);

    for (_, command) in run_ticks(&mut attacks, 1, 15 * 40) {
        match command {
            Command::SpawnLaser { index, .. } => assert!(index < 24),
            Command::SpawnRain { columns } => {
                assert!((3..=6).contains(&columns.len()));
                assert!(columns.iter().all(|column| *column < 24));
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn weakened_boss_adds_single_rain_drops() {
    let mut attacks = BossAttacks::new(Config::new(8));
    let mut commands = Vec::new();
    attacks.handle(
        &[round_started(ModeId::Boss), Event::BossDamaged { health: 3 }],
        &mut commands,
    );

    let emitted = run_ticks(&mut attacks, 1, 30);
    let extra: Vec<u64> = emitted
        .iter()
        .filter_map(|(tick, command)| match command {
            Command::SpawnRain { columns } if columns.len() == 1 => Some(*tick),
            _ => None,
        })
        .collect();
    assert_eq!(extra, vec![10, 20, 30]);
    assert_eq!(emitted.len(), 5);
}

#[test]
fn boss_rush_enrages_faster() {
    let mut attacks = BossAttacks::new(Config::new(8));
    let mut commands = Vec::new();
    attacks.handle(
        &[round_started(ModeId::BossRush), Event::BossDamaged { health: 2 }],
        &mut commands,
    );

    let extra = run_ticks(&mut attacks, 1, 24)
        .into_iter()
        .filter(|(tick, _)| *tick != 15)
        .map(|(tick, _)| tick)
        .collect::<Vec<_>>();
    assert_eq!(extra, vec![8, 16, 24]);
}

#[test]
fn healthy_boss_never_enrages() {
    let mut attacks = BossAttacks::new(Config::new(8));
    let mut commands = Vec::new();
    attacks.handle(
        &[round_started(ModeId::Boss), Event::BossDamaged { health: 4 }],
        &mut commands,
    );
    assert_eq!(run_ticks(&mut attacks, 1, 29).len(), 1);
}

#[test]
fn non_boss_rounds_are_ignored() {
    let mut attacks = BossAttacks::new(Config::new(1));
    let mut commands = Vec::new();
    attacks.handle(&[round_started(ModeId::Classic)], &mut commands);
    assert!(run_ticks(&mut attacks, 1, 120).is_empty());
}

#[test]
fn round_end_cancels_the_encounter() {
    let mut attacks = BossAttacks::new(Config::new(1));
    let mut commands = Vec::new();
    attacks.handle(
        &[
            round_started(ModeId::Boss),
            Event::RoundEnded {
                outcome: Outcome::GameOver,
                reason: EndReason::Wall,
                score: 0,
            },
        ],
        &mut commands,
    );
    assert!(run_ticks(&mut attacks, 1, 60).is_empty());

    attacks.handle(&[round_started(ModeId::Boss)], &mut commands);
    attacks.handle(&[Event::ReturnedToMenu], &mut commands);
    assert!(run_ticks(&mut attacks, 1, 60).is_empty());
}

#[test]
fn restart_resets_the_cadence() {
    let mut attacks = BossAttacks::new(Config::new(1));
    let mut commands = Vec::new();
    attacks.handle(&[round_started(ModeId::Boss)], &mut commands);
    let _ = run_ticks(&mut attacks, 1, 10);
    attacks.handle(&[round_started(ModeId::Boss)], &mut commands);

    let emitted = run_ticks(&mut attacks, 1, 15);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].0, 15);
    assert_eq!(kind_of(&emitted[0].1), AttackKind::Rain);
}

#[test]
fn same_seed_replays_same_attacks() {
    let replay = |seed| {
        let mut attacks = BossAttacks::new(Config::new(seed));
        let mut commands = Vec::new();
        attacks.handle(
            &[round_started(ModeId::BossRush), Event::BossDamaged { health: 1 }],
            &mut commands,
        );
        run_ticks(&mut attacks, 1, 300)
    };
    assert_eq!(replay(99), replay(99));
}

#[test]
fn world_receives_the_first_rain() {
    let mut world = World::new(21);
    let mut attacks = BossAttacks::new(Config::new(21));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartRound { mode: ModeId::Boss },
        &mut events,
    );
    scaffold::place_food(&mut world, Cell::new(0, 0));

    let circuit = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];
    let mut launched = Vec::new();
    for step in 0..16 {
        let mut commands = Vec::new();
        attacks.handle(&events, &mut commands);
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        launched.extend(events.iter().filter_map(|event| match event {
            Event::AttackLaunched { kind } => Some(*kind),
            _ => None,
        }));
        world::apply(
            &mut world,
            Command::SetDirection {
                direction: circuit[(step / 3) % circuit.len()],
            },
            &mut events,
        );
        world::apply(&mut world, Command::Tick, &mut events);
    }

    assert_eq!(launched, vec![AttackKind::Rain]);
    assert!(query::snapshot(&world)
        .projectiles
        .iter()
        .all(|projectile| matches!(projectile, ProjectileSnapshot::Bullet { .. })));
    assert!(!query::snapshot(&world).projectiles.is_empty());
}
