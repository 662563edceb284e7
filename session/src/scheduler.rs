//! Virtual clock owning cancellable periodic tasks.

use std::{collections::BTreeMap, time::Duration};

/// Shortest period a task may use; zero periods are raised to it.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Identifier of a scheduled task. Later tasks receive larger identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Work performed when a task fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Advances the simulation by one tick.
    SimulationTick,
    /// Removes one second from the round countdown.
    RoundClock,
}

/// A single firing handed out by [`Scheduler::pop_due`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    /// Task that fired.
    pub id: TaskId,
    /// Work the task performs.
    pub kind: TaskKind,
    /// Clock value at which the task fired.
    pub at: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Task {
    kind: TaskKind,
    period: Duration,
    next_due: Duration,
}

/// Owner of periodic tasks driven by an explicit virtual clock.
///
/// Nothing happens on its own: callers move time forward by draining
/// [`Scheduler::pop_due`] and then calling [`Scheduler::advance_to`].
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskId, Task>,
}

impl Scheduler {
    /// Creates a scheduler with the clock at zero and no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Registers a periodic task whose first firing is one period from now.
    pub fn schedule(&mut self, kind: TaskKind, period: Duration) -> TaskId {
        let period = period.max(MIN_PERIOD);
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let _ = self.tasks.insert(
            id,
            Task {
                kind,
                period,
                next_due: self.now.saturating_add(period),
            },
        );
        id
    }

    /// Cancels a task. Returns `false` when the task was not active.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Reports whether the task is still scheduled.
    #[must_use]
    pub fn is_active(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Fires the earliest task due at or before `deadline`.
    ///
    /// Ties are broken by task id. The clock moves to the firing time and the
    /// task is re-armed one period later.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Firing> {
        let (id, task) = self
            .tasks
            .iter_mut()
            .filter(|(_, task)| task.next_due <= deadline)
            .min_by_key(|(id, task)| (task.next_due, **id))?;

        let at = task.next_due;
        task.next_due = at.saturating_add(task.period);
        let firing = Firing {
            id: *id,
            kind: task.kind,
            at,
        };
        self.now = self.now.max(at);
        Some(firing)
    }

    /// Moves the clock forward to `deadline`; earlier deadlines are ignored.
    pub fn advance_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
