use std::time::Duration;

use snake_arcade_core::{
    Command, Direction, EndReason, EnemySnapshot, Event, ModeId, Outcome,
};
use snake_arcade_system_enemy_steering::{Config, EnemySteering};
use snake_arcade_world::{self as world, query, World};

fn round_started(mode: ModeId) -> Event {
    Event::RoundStarted {
        mode,
        tick_period: Duration::from_millis(100),
        time_remaining: None,
    }
}

fn heading(direction: Direction) -> EnemySnapshot {
    EnemySnapshot {
        body: Vec::new(),
        direction,
    }
}

fn collect_turns(seed: u64, ticks: u64) -> Vec<Command> {
    let mut steering = EnemySteering::new(Config::new(seed));
    let enemy = heading(Direction::Right);
    let mut commands = Vec::new();
    steering.handle(&[round_started(ModeId::Enemy)], Some(&enemy), &mut commands);
    for tick in 1..=ticks {
        steering.handle(&[Event::TimeAdvanced { tick }], Some(&enemy), &mut commands);
    }
    commands
}

#[test]
fn turns_roughly_a_quarter_of_ticks() {
    let commands = collect_turns(0x5eed, 2_000);
    let turns = commands.len();
    assert!(
        (350..=650).contains(&turns),
        "expected about 500 turns, got {turns}"
    );
}

#[test]
fn never_requests_a_reversal() {
    for command in collect_turns(42, 500) {
        match command {
            Command::SteerEnemy { direction } => assert_ne!(direction, Direction::Left),
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn modes_without_enemy_stay_silent() {
    let mut steering = EnemySteering::new(Config::new(1));
    let enemy = heading(Direction::Up);
    let mut commands = Vec::new();
    steering.handle(&[round_started(ModeId::Classic)], Some(&enemy), &mut commands);
    for tick in 1..=300 {
        steering.handle(&[Event::TimeAdvanced { tick }], Some(&enemy), &mut commands);
    }
    assert!(commands.is_empty());
}

#[test]
fn round_end_stops_steering() {
    let mut steering = EnemySteering::new(Config::new(1));
    let enemy = heading(Direction::Up);
    let mut commands = Vec::new();
    steering.handle(
        &[
            round_started(ModeId::Enemy),
            Event::RoundEnded {
                outcome: Outcome::GameOver,
                reason: EndReason::Enemy,
                score: 0,
            },
        ],
        Some(&enemy),
        &mut commands,
    );
    for tick in 1..=300 {
        steering.handle(&[Event::TimeAdvanced { tick }], Some(&enemy), &mut commands);
    }
    assert!(commands.is_empty());
}

#[test]
fn same_seed_replays_same_turns() {
    assert_eq!(collect_turns(77, 400), collect_turns(77, 400));
}

#[test]
fn drives_the_world_enemy() {
    let mut world = World::new(3);
    let mut steering = EnemySteering::new(Config::new(9));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartRound {
            mode: ModeId::Enemy,
        },
        &mut events,
    );

    let mut commands = Vec::new();
    let mut last_turn = None;
    for _ in 0..9 {
        let enemy = query::enemy(&world);
        steering.handle(&events, enemy.as_ref(), &mut commands);
        events.clear();
        for command in commands.drain(..) {
            if let Command::SteerEnemy { direction } = command {
                last_turn = Some(direction);
            }
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick, &mut events);
        if query::phase(&world).is_terminal() {
            break;
        }
    }

    let enemy = query::enemy(&world).expect("enemy present");
    assert_eq!(enemy.body.len(), 5);
    if let Some(direction) = last_turn {
        assert_eq!(enemy.direction, direction);
    }
}
