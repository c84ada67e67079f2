//! Deferred deletion with a single undo window.
//!
//! At most one delete is pending at any time. Requesting a second delete
//! commits the first one immediately before the new window is armed, so two
//! timers never coexist. The timer is a deadline owned by the scheduler; the
//! event loop that owns the scheduler decides when to call [`DeleteScheduler::fire_due`].

use std::time::Duration;

use tokio::time::Instant;

use crate::model::ExerciseId;

pub const DEFAULT_DELETE_WINDOW: Duration = Duration::from_secs(5);

/// Receives committed deletions. Implementors remove the record and fix up
/// any view state (current page) that depends on the record count.
pub trait DeleteTarget {
    fn commit_delete(&mut self, id: ExerciseId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: ExerciseId,
    pub deadline: Instant,
}

impl PendingDelete {
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteState {
    Idle,
    Pending(PendingDelete),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteRequest {
    pub pending: PendingDelete,
    // set when an earlier pending delete was committed early to make room
    pub committed: Option<ExerciseId>,
}

// Not Clone: cancel and fire consume the handle, so it cannot be used twice.
#[derive(Debug)]
struct DeleteTimer {
    id: ExerciseId,
    deadline: Instant,
}

impl DeleteTimer {
    fn arm(id: ExerciseId, now: Instant, window: Duration) -> Self {
        Self {
            id,
            deadline: now + window,
        }
    }

    fn cancel(self) -> ExerciseId {
        self.id
    }

    fn fire<T: DeleteTarget>(self, target: &mut T) -> ExerciseId {
        target.commit_delete(self.id);
        self.id
    }

    fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    fn snapshot(&self) -> PendingDelete {
        PendingDelete {
            id: self.id,
            deadline: self.deadline,
        }
    }
}

#[derive(Debug)]
pub struct DeleteScheduler {
    window: Duration,
    timer: Option<DeleteTimer>,
}

impl Default for DeleteScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DELETE_WINDOW)
    }
}

impl DeleteScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            timer: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn state(&self) -> DeleteState {
        match self.timer.as_ref() {
            Some(timer) => DeleteState::Pending(timer.snapshot()),
            None => DeleteState::Idle,
        }
    }

    pub fn pending(&self) -> Option<PendingDelete> {
        self.timer.as_ref().map(DeleteTimer::snapshot)
    }

    pub fn pending_id(&self) -> Option<ExerciseId> {
        self.timer.as_ref().map(|t| t.id)
    }

    pub fn is_pending(&self, id: ExerciseId) -> bool {
        self.pending_id() == Some(id)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(|t| t.deadline)
    }

    /// Marks `id` for deletion. A different record that is still pending is
    /// committed through `target` before the new window starts. Asking again
    /// for the record that is already pending keeps its original deadline.
    pub fn request<T: DeleteTarget>(
        &mut self,
        id: ExerciseId,
        now: Instant,
        target: &mut T,
    ) -> DeleteRequest {
        if let Some(timer) = self.timer.as_ref() {
            if timer.id == id {
                return DeleteRequest {
                    pending: timer.snapshot(),
                    committed: None,
                };
            }
        }

        let committed = self.timer.take().map(|previous| {
            let previous_id = previous.fire(target);
            tracing::debug!(
                id = previous_id,
                "committed pending delete early for a new request"
            );
            previous_id
        });

        let timer = DeleteTimer::arm(id, now, self.window);
        let pending = timer.snapshot();
        self.timer = Some(timer);
        tracing::debug!(id, window_ms = self.window.as_millis() as u64, "delete pending");
        DeleteRequest { pending, committed }
    }

    pub fn undo(&mut self) -> Option<ExerciseId> {
        let id = self.timer.take()?.cancel();
        tracing::debug!(id, "pending delete undone");
        Some(id)
    }

    pub fn fire_due<T: DeleteTarget>(
        &mut self,
        now: Instant,
        target: &mut T,
    ) -> Option<ExerciseId> {
        if !self.timer.as_ref()?.is_due(now) {
            return None;
        }
        let id = self.timer.take()?.fire(target);
        tracing::debug!(id, "pending delete committed");
        Some(id)
    }

    // Teardown: the pending delete is dropped, never committed.
    pub fn shutdown(&mut self) -> Option<ExerciseId> {
        let id = self.timer.take()?.cancel();
        tracing::debug!(id, "pending delete discarded on shutdown");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        committed: Vec<ExerciseId>,
    }

    impl DeleteTarget for Recorder {
        fn commit_delete(&mut self, id: ExerciseId) {
            self.committed.push(id);
        }
    }

    const WINDOW: Duration = Duration::from_secs(5);

    #[test]
    fn request_arms_without_committing() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let now = Instant::now();

        let req = sched.request(4, now, &mut target);
        assert_eq!(req.committed, None);
        assert_eq!(req.pending.deadline, now + WINDOW);
        assert_eq!(sched.pending_id(), Some(4));
        assert!(target.committed.is_empty());
    }

    #[test]
    fn timer_fires_only_after_the_window() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let now = Instant::now();
        sched.request(4, now, &mut target);

        assert_eq!(sched.fire_due(now + Duration::from_millis(4999), &mut target), None);
        assert!(target.committed.is_empty());

        assert_eq!(sched.fire_due(now + WINDOW, &mut target), Some(4));
        assert_eq!(target.committed, vec![4]);
        assert_eq!(sched.state(), DeleteState::Idle);

        assert_eq!(sched.fire_due(now + WINDOW * 2, &mut target), None);
        assert_eq!(target.committed, vec![4]);
    }

    #[test]
    fn second_request_commits_the_first_before_arming() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let start = Instant::now();
        sched.request(1, start, &mut target);

        let later = start + Duration::from_secs(2);
        let req = sched.request(2, later, &mut target);
        assert_eq!(req.committed, Some(1));
        assert_eq!(target.committed, vec![1]);
        assert_eq!(req.pending.id, 2);
        assert_eq!(req.pending.deadline, later + WINDOW);

        // the first record's original deadline passes without a second commit
        assert_eq!(sched.fire_due(start + WINDOW, &mut target), None);
        assert_eq!(target.committed, vec![1]);
    }

    #[test]
    fn repeated_request_for_the_same_record_keeps_the_deadline() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let start = Instant::now();
        sched.request(3, start, &mut target);
        let req = sched.request(3, start + Duration::from_secs(3), &mut target);
        assert_eq!(req.committed, None);
        assert_eq!(req.pending.deadline, start + WINDOW);
        assert!(target.committed.is_empty());
    }

    #[test]
    fn undo_cancels_without_committing() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let now = Instant::now();
        sched.request(9, now, &mut target);
        assert_eq!(sched.undo(), Some(9));
        assert_eq!(sched.undo(), None);
        assert_eq!(sched.fire_due(now + WINDOW * 3, &mut target), None);
        assert!(target.committed.is_empty());
    }

    #[test]
    fn shutdown_discards_the_pending_delete() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let now = Instant::now();
        sched.request(5, now, &mut target);
        assert_eq!(sched.shutdown(), Some(5));
        assert_eq!(sched.fire_due(now + WINDOW, &mut target), None);
        assert!(target.committed.is_empty());
    }

    #[test]
    fn never_more_than_one_pending() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let mut now = Instant::now();
        for id in 1..=10 {
            sched.request(id, now, &mut target);
            if id % 3 == 0 {
                sched.undo();
                assert_eq!(sched.state(), DeleteState::Idle);
            } else {
                assert_eq!(sched.pending_id(), Some(id));
            }
            now += Duration::from_millis(700);
        }
        // ids 3, 6 and 9 were undone; every other superseded id was committed
        assert_eq!(target.committed, vec![1, 2, 4, 5, 7, 8]);
        assert_eq!(sched.pending_id(), Some(10));
    }

    #[test]
    fn remaining_counts_down() {
        let mut sched = DeleteScheduler::new(WINDOW);
        let mut target = Recorder::default();
        let now = Instant::now();
        let pending = sched.request(1, now, &mut target).pending;
        assert_eq!(pending.remaining(now + Duration::from_secs(2)), Duration::from_secs(3));
        assert_eq!(pending.remaining(now + Duration::from_secs(9)), Duration::ZERO);
    }
}
