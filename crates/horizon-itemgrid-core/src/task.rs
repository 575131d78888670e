//! Deferred work for idle processing.
//!
//! A [`DeferredTask`] is a coalescing slot: scheduling it any number of times
//! before the next idle pass results in a single run. The item grid uses one
//! for re-layout, so a burst of model changes produces one layout pass.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for one scheduled run of a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A coalescing idle slot.
#[derive(Debug, Default)]
pub struct DeferredTask {
    pending: Option<TaskId>,
    runs: u64,
}

impl DeferredTask {
    /// Create an idle slot with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a run. If one is already pending, its ID is returned and no
    /// new run is queued.
    pub fn schedule(&mut self) -> TaskId {
        if let Some(id) = self.pending {
            return id;
        }
        let id = next_task_id();
        tracing::trace!(target: targets::TASK, id = id.as_u64(), "deferred task scheduled");
        self.pending = Some(id);
        id
    }

    /// Check whether a run is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the pending run.
    ///
    /// Returns `true` if a run was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Claim the pending run, if any. The caller performs the work.
    pub fn take(&mut self) -> Option<TaskId> {
        let id = self.pending.take()?;
        self.runs += 1;
        Some(id)
    }

    /// Number of runs claimed so far.
    pub fn run_count(&self) -> u64 {
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_coalesces() {
        let mut task = DeferredTask::new();
        let a = task.schedule();
        let b = task.schedule();
        assert_eq!(a, b);
        assert!(task.is_pending());

        assert_eq!(task.take(), Some(a));
        assert_eq!(task.take(), None);
        assert_eq!(task.run_count(), 1);
    }

    #[test]
    fn test_new_run_after_take() {
        let mut task = DeferredTask::new();
        let a = task.schedule();
        task.take();
        let b = task.schedule();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cancel() {
        let mut task = DeferredTask::new();
        assert!(!task.cancel());
        task.schedule();
        assert!(task.cancel());
        assert!(!task.is_pending());
        assert_eq!(task.take(), None);
        assert_eq!(task.run_count(), 0);
    }
}
