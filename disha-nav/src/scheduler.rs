//! Cooperative tick scheduler and cancellation token.
//!
//! The simulation runs on one thread. Periodic work is registered with the
//! [`Scheduler`] and pulled out with [`Scheduler::due`] on every tick. A task
//! that fell behind runs once, not once per missed period.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use disha_map::AgentId;

/// Periodic work items
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// One noisy fix folded into the agent's smoothed track
    SampleLocalization(AgentId),
    /// Advance the in-flight exploration controller by one step
    ExplorationStep,
}

#[derive(Clone, Debug)]
struct PeriodicTask {
    kind: TaskKind,
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

/// Tick source for periodic tasks.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    tasks: Vec<PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` every `interval_ms`, starting at the next tick.
    ///
    /// Registering a task again replaces its interval and restarts it.
    pub fn register(&mut self, task: TaskKind, interval_ms: u64) {
        let interval_ms = interval_ms.max(1);
        match self.tasks.iter_mut().find(|t| t.kind == task) {
            Some(existing) => {
                existing.interval_ms = interval_ms;
                existing.next_due_ms = None;
            }
            None => self.tasks.push(PeriodicTask {
                kind: task,
                interval_ms,
                next_due_ms: None,
            }),
        }
    }

    /// Stop running `task`. Returns false if it was not registered.
    pub fn unregister(&mut self, task: TaskKind) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.kind != task);
        self.tasks.len() != before
    }

    pub fn is_registered(&self, task: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == task)
    }

    /// Tasks due at `now_ms`, in registration order.
    pub fn due(&mut self, now_ms: u64) -> Vec<TaskKind> {
        let mut due = Vec::new();
        for task in &mut self.tasks {
            let ready = task.next_due_ms.is_none_or(|at| now_ms >= at);
            if ready {
                due.push(task.kind);
                task.next_due_ms = Some(now_ms + task.interval_ms);
            }
        }
        due
    }
}

/// Shared cancellation flag, checked between controller steps.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskKind::ExplorationStep, 100);

        assert_eq!(scheduler.due(20), vec![TaskKind::ExplorationStep]);
        assert!(scheduler.due(40).is_empty());
        assert!(scheduler.due(100).is_empty());
        assert_eq!(scheduler.due(120), vec![TaskKind::ExplorationStep]);
    }

    #[test]
    fn test_catch_up_collapses() {
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskKind::ExplorationStep, 100);
        scheduler.due(0);
        // Ten periods late: one run, then back on schedule
        assert_eq!(scheduler.due(1000).len(), 1);
        assert!(scheduler.due(1050).is_empty());
        assert_eq!(scheduler.due(1100).len(), 1);
    }

    #[test]
    fn test_interleaved_intervals() {
        let robot = AgentId(1);
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskKind::SampleLocalization(robot), 50);
        scheduler.register(TaskKind::ExplorationStep, 100);

        assert_eq!(scheduler.due(0).len(), 2);
        assert_eq!(scheduler.due(50), vec![TaskKind::SampleLocalization(robot)]);
        assert_eq!(scheduler.due(100).len(), 2);
    }

    #[test]
    fn test_unregister() {
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskKind::ExplorationStep, 100);
        assert!(scheduler.unregister(TaskKind::ExplorationStep));
        assert!(!scheduler.unregister(TaskKind::ExplorationStep));
        assert!(scheduler.due(500).is_empty());
    }

    #[test]
    fn test_reregister_restarts() {
        let mut scheduler = Scheduler::new();
        scheduler.register(TaskKind::ExplorationStep, 100);
        scheduler.due(0);
        scheduler.register(TaskKind::ExplorationStep, 100);
        assert!(scheduler.is_registered(TaskKind::ExplorationStep));
        assert_eq!(scheduler.due(10).len(), 1);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
