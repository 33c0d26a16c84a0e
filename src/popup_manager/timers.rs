use std::time::Duration;

use super::types::{DeferredTask, ScheduledTask};

/// Fixed-delay tasks waiting for the clock to pass their due time.
///
/// There is no cancellation: a task that no longer applies must notice that itself when it runs.
#[derive(Debug)]
pub(super) struct DeferredQueue<E> {
    tasks: Vec<ScheduledTask<E>>,
    next_seq: u64,
}

impl<E> Default for DeferredQueue<E> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<E> DeferredQueue<E> {
    pub(super) fn schedule(&mut self, due: Duration, task: DeferredTask<E>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask { due, seq, task });
    }

    /// Remove and return every task due at `now`, ordered by due time, then by scheduling order.
    pub(super) fn take_due(&mut self, now: Duration) -> Vec<DeferredTask<E>> {
        if !self.tasks.iter().any(|t| t.due <= now) {
            return Vec::new();
        }
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tasks).into_iter().partition(|t| t.due <= now);
        self.tasks = pending;
        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.task).collect()
    }

    pub(super) fn next_due(&self) -> Option<Duration> {
        self.tasks.iter().map(|t| t.due).min()
    }

    pub(super) fn len(&self) -> usize {
        self.tasks.len()
    }
}
