#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game state machine that owns the world, its systems and their timers.
//!
//! A [`Session`] moves between the menu, a running round and the terminal
//! game-over and victory states. Simulation time is virtual: adapters call
//! [`Session::advance`] with elapsed wall time and the session fires the
//! round's tick and countdown tasks one at a time, so each tick runs to
//! completion before the next one is considered.

use std::time::Duration;

use snake_arcade_core::{Command, Event, ModeId, Outcome, RoundPhase};
use snake_arcade_system_boss_attacks::{self as boss_attacks, BossAttacks};
use snake_arcade_system_enemy_steering::{self as enemy_steering, EnemySteering};
use snake_arcade_world::{self as world, query, World};
use tracing::{debug, info, warn};

mod contracts;
mod scheduler;

pub use contracts::{
    HighScoreStore, InputIntent, MemoryStore, Overlay, Presenter, StoreError, UiUpdate,
};
pub use scheduler::{Firing, Scheduler, TaskId, TaskKind};

const STEERING_SEED_SALT: u64 = 0x5eed_0000_e0e0_0001;
const ATTACK_SEED_SALT: u64 = 0x5eed_0000_b055_0002;

/// Configuration of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seed for the world and every system; equal seeds replay equal sessions.
    pub seed: u64,
    /// Length of one countdown second in timed modes.
    pub clock_period: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            clock_period: Duration::from_secs(1),
        }
    }
}

/// Owns one world, the systems reacting to it and the round timers.
#[derive(Debug)]
pub struct Session<S> {
    config: SessionConfig,
    world: World,
    steering: EnemySteering,
    attacks: BossAttacks,
    scheduler: Scheduler,
    tick_task: Option<TaskId>,
    clock_task: Option<TaskId>,
    store: S,
    high_score: u32,
    selected: usize,
    last_mode: Option<ModeId>,
}

impl<S: HighScoreStore> Session<S> {
    /// Creates a session waiting in the menu and loads the high score once.
    pub fn new(config: SessionConfig, mut store: S) -> Self {
        let high_score = store.load();
        info!(high_score, seed = config.seed, "session created");
        Self {
            config,
            world: World::new(config.seed),
            steering: EnemySteering::new(enemy_steering::Config::new(
                config.seed ^ STEERING_SEED_SALT,
            )),
            attacks: BossAttacks::new(boss_attacks::Config::new(config.seed ^ ATTACK_SEED_SALT)),
            scheduler: Scheduler::new(),
            tick_task: None,
            clock_task: None,
            store,
            high_score,
            selected: 0,
            last_mode: None,
        }
    }

    /// Lifecycle phase of the session.
    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        query::phase(&self.world)
    }

    /// Highest score seen, including the value loaded at startup.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mode highlighted in the menu.
    #[must_use]
    pub fn selected_mode(&self) -> ModeId {
        ModeId::ALL[self.selected % ModeId::ALL.len()]
    }

    /// Scheduler driving the round timers.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Store holding the persisted high score.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a fresh round of `mode`, replacing any round in progress.
    pub fn start<P: Presenter>(&mut self, mode: ModeId, presenter: &mut P) {
        self.cancel_round_tasks();
        if self.phase() == RoundPhase::Playing {
            self.execute(Command::AbandonRound, presenter);
        }
        self.last_mode = Some(mode);
        if let Some(index) = ModeId::ALL.iter().position(|candidate| *candidate == mode) {
            self.selected = index;
        }
        self.execute(Command::StartRound { mode }, presenter);
    }

    /// Replays the most recent mode. Does nothing before the first round.
    pub fn restart<P: Presenter>(&mut self, presenter: &mut P) {
        if let Some(mode) = self.last_mode {
            self.start(mode, presenter);
        }
    }

    /// Abandons the round and shows the menu. Does nothing in the menu.
    pub fn return_to_menu<P: Presenter>(&mut self, presenter: &mut P) {
        if self.phase() == RoundPhase::Menu {
            return;
        }
        self.cancel_round_tasks();
        self.execute(Command::ReturnToMenu, presenter);
    }

    /// Applies one discrete input.
    pub fn handle_input<P: Presenter>(&mut self, intent: InputIntent, presenter: &mut P) {
        let phase = self.phase();
        match intent {
            InputIntent::Direction(direction) if phase == RoundPhase::Playing => {
                let mut events = Vec::new();
                world::apply(
                    &mut self.world,
                    Command::SetDirection { direction },
                    &mut events,
                );
            }
            InputIntent::MenuUp if phase == RoundPhase::Menu => {
                let count = ModeId::ALL.len();
                self.selected = (self.selected + count - 1) % count;
                presenter.ui(UiUpdate::MenuSelection(self.selected_mode()));
            }
            InputIntent::MenuDown if phase == RoundPhase::Menu => {
                self.selected = (self.selected + 1) % ModeId::ALL.len();
                presenter.ui(UiUpdate::MenuSelection(self.selected_mode()));
            }
            InputIntent::MenuSelect if phase == RoundPhase::Menu => {
                let mode = self.selected_mode();
                self.start(mode, presenter);
            }
            InputIntent::Restart if phase.is_terminal() => self.restart(presenter),
            InputIntent::ReturnToMenu => self.return_to_menu(presenter),
            _ => {}
        }
    }

    /// Moves virtual time forward by `dt`, firing every task that falls due.
    ///
    /// Each simulation tick that leaves the round running produces one frame.
    pub fn advance<P: Presenter>(&mut self, dt: Duration, presenter: &mut P) {
        let deadline = self.scheduler.now().saturating_add(dt);
        while let Some(firing) = self.scheduler.pop_due(deadline) {
            match firing.kind {
                TaskKind::SimulationTick => {
                    self.execute(Command::Tick, presenter);
                    if self.phase() == RoundPhase::Playing {
                        presenter.frame(&query::snapshot(&self.world));
                    }
                }
                TaskKind::RoundClock => self.execute(Command::ClockSecond, presenter),
            }
        }
        self.scheduler.advance_to(deadline);
    }

    /// Applies `command` and feeds the resulting events to the systems until
    /// no further commands are produced.
    fn execute<P: Presenter>(&mut self, command: Command, presenter: &mut P) {
        let mut pending = vec![command];
        let mut events = Vec::new();
        while !pending.is_empty() {
            events.clear();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            if events.is_empty() {
                break;
            }
            for event in &events {
                self.react(event, presenter);
            }
            let enemy = query::enemy(&self.world);
            self.steering.handle(&events, enemy.as_ref(), &mut pending);
            self.attacks.handle(&events, &mut pending);
        }
    }

    fn react<P: Presenter>(&mut self, event: &Event, presenter: &mut P) {
        match *event {
            Event::RoundStarted {
                mode,
                tick_period,
                time_remaining,
            } => {
                self.cancel_round_tasks();
                self.tick_task = Some(self.scheduler.schedule(TaskKind::SimulationTick, tick_period));
                info!(mode = mode.label(), ?tick_period, "round started");
                presenter.ui(UiUpdate::Hide(Overlay::Menu));
                presenter.ui(UiUpdate::Hide(Overlay::GameOver));
                presenter.ui(UiUpdate::Hide(Overlay::Victory));
                presenter.ui(UiUpdate::Score(0));
                presenter.ui(UiUpdate::HighScore(self.high_score));
                match time_remaining {
                    Some(seconds) => {
                        self.clock_task = Some(
                            self.scheduler
                                .schedule(TaskKind::RoundClock, self.config.clock_period),
                        );
                        presenter.ui(UiUpdate::TimeRemaining(seconds));
                        presenter.ui(UiUpdate::Show(Overlay::Timer));
                    }
                    None => presenter.ui(UiUpdate::Hide(Overlay::Timer)),
                }
            }
            Event::TickPeriodChanged { period } => {
                if let Some(task) = self.tick_task.take() {
                    let _ = self.scheduler.cancel(task);
                    self.tick_task = Some(self.scheduler.schedule(TaskKind::SimulationTick, period));
                }
                debug!(?period, "tick period changed");
            }
            Event::ScoreChanged { score } => presenter.ui(UiUpdate::Score(score)),
            Event::TimeRemainingChanged { seconds } => {
                presenter.ui(UiUpdate::TimeRemaining(seconds));
            }
            Event::BossDamaged { health } => debug!(health, "boss damaged"),
            Event::AttackLaunched { kind } => debug!(?kind, "boss attack launched"),
            Event::RoundEnded {
                outcome,
                reason,
                score,
            } => {
                self.cancel_round_tasks();
                info!(?outcome, ?reason, score, "round ended");
                self.record_score(score, presenter);
                presenter.ui(UiUpdate::Hide(Overlay::Timer));
                match outcome {
                    Outcome::GameOver => {
                        presenter.ui(UiUpdate::EndReason(reason));
                        presenter.ui(UiUpdate::Show(Overlay::GameOver));
                    }
                    Outcome::Victory => presenter.ui(UiUpdate::Show(Overlay::Victory)),
                }
            }
            Event::ReturnedToMenu => {
                self.cancel_round_tasks();
                presenter.ui(UiUpdate::Hide(Overlay::GameOver));
                presenter.ui(UiUpdate::Hide(Overlay::Victory));
                presenter.ui(UiUpdate::Hide(Overlay::Timer));
                presenter.ui(UiUpdate::MenuSelection(self.selected_mode()));
                presenter.ui(UiUpdate::Show(Overlay::Menu));
            }
            Event::TimeAdvanced { .. }
            | Event::SnakeAdvanced { .. }
            | Event::ItemConsumed { .. }
            | Event::SnakeShrunk { .. } => {}
        }
    }

    fn record_score<P: Presenter>(&mut self, score: u32, presenter: &mut P) {
        if score <= self.high_score {
            return;
        }
        self.high_score = score;
        info!(high_score = score, "new high score");
        if let Err(error) = self.store.save(score) {
            warn!(%error, score, "failed to persist high score");
        }
        presenter.ui(UiUpdate::HighScore(score));
    }

    fn cancel_round_tasks(&mut self) {
        for task in [self.tick_task.take(), self.clock_task.take()]
            .into_iter()
            .flatten()
        {
            let _ = self.scheduler.cancel(task);
        }
    }
}
