//! Timer tasks as explicit, cancellable handles.
//!
//! The controller never owns a callback. It asks a [`Scheduler`] to run a
//! [`Task`] later and keeps the returned [`TaskId`]; when the host's timer
//! fires it hands the id back through `Controller::fire`. The browser backs
//! this with `setTimeout`, tests with [`VirtualScheduler`].

use std::collections::BTreeMap;

/// Everything the game ever waits for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Turn the preview cards back over and unlock the board.
    EndPreview,
    /// Turn a mismatched pair back over.
    HideMismatch,
    /// Hide the level-up banner and load the next level.
    FinishLevelUp,
    /// Leave the game screen after the clock ran out.
    ShowGameOver,
    /// Repeating one-second countdown step.
    CountdownTick,
    /// Repeating tick sound while the clock is low.
    TickCue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

pub trait Scheduler {
    /// Run `task` once after `delay_ms`.
    fn schedule(&mut self, task: Task, delay_ms: u32) -> TaskId;
    /// Run `task` every `period_ms` until cancelled.
    fn schedule_repeating(&mut self, task: Task, period_ms: u32) -> TaskId;
    /// Cancel a pending task. Unknown or finished ids are ignored.
    fn cancel(&mut self, id: TaskId);
    fn cancel_all(&mut self);
    /// Called when the host timer for `id` fires. Returns the task to run, or
    /// `None` when the id was cancelled meanwhile. Repeating tasks stay armed.
    fn take_due(&mut self, id: TaskId) -> Option<Task>;
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    task: Task,
    due_ms: u64,
    period_ms: Option<u32>,
}

/// Deterministic scheduler driven by an explicit virtual clock.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<TaskId, Pending>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Earliest pending task due at or before `until_ms`. Ties go to the task
    /// scheduled first.
    pub fn next_due(&self, until_ms: u64) -> Option<(u64, TaskId)> {
        self.pending
            .iter()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .map(|(id, p)| (p.due_ms, *id))
            .min()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// How many armed handles currently carry `task`.
    pub fn count(&self, task: Task) -> usize {
        self.pending.values().filter(|p| p.task == task).count()
    }

    fn insert(&mut self, task: Task, delay_ms: u32, period_ms: Option<u32>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.insert(
            id,
            Pending { task, due_ms: self.now_ms + delay_ms as u64, period_ms },
        );
        id
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, task: Task, delay_ms: u32) -> TaskId {
        self.insert(task, delay_ms, None)
    }

    fn schedule_repeating(&mut self, task: Task, period_ms: u32) -> TaskId {
        self.insert(task, period_ms, Some(period_ms.max(1)))
    }

    fn cancel(&mut self, id: TaskId) {
        self.pending.remove(&id);
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }

    fn take_due(&mut self, id: TaskId) -> Option<Task> {
        let entry = self.pending.get_mut(&id)?;
        if entry.due_ms > self.now_ms {
            return None;
        }
        let task = entry.task;
        match entry.period_ms {
            Some(period) => entry.due_ms += period as u64,
            None => {
                self.pending.remove(&id);
            }
        }
        Some(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut s = VirtualScheduler::new();
        let id = s.schedule(Task::HideMismatch, 1000);
        assert_eq!(s.next_due(999), None);
        assert_eq!(s.next_due(1000), Some((1000, id)));
        assert_eq!(s.take_due(id), None, "not due yet");
        s.set_now(1000);
        assert_eq!(s.take_due(id), Some(Task::HideMismatch));
        assert_eq!(s.take_due(id), None);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn repeating_rearms_until_cancelled() {
        let mut s = VirtualScheduler::new();
        let id = s.schedule_repeating(Task::CountdownTick, 1000);
        for n in 1..=3u64 {
            s.set_now(n * 1000);
            assert_eq!(s.take_due(id), Some(Task::CountdownTick));
        }
        assert_eq!(s.next_due(u64::MAX), Some((4000, id)));
        s.cancel(id);
        assert_eq!(s.count(Task::CountdownTick), 0);
        s.set_now(4000);
        assert_eq!(s.take_due(id), None);
    }

    #[test]
    fn ties_resolve_in_scheduling_order() {
        let mut s = VirtualScheduler::new();
        let a = s.schedule(Task::EndPreview, 500);
        let b = s.schedule(Task::ShowGameOver, 500);
        assert!(a < b);
        assert_eq!(s.next_due(500), Some((500, a)));
        s.cancel_all();
        assert_eq!(s.next_due(u64::MAX), None);
    }
}
