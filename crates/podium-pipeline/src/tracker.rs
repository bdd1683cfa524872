//! Tracking of in-flight evaluation tasks.
//!
//! Every scheduled evaluation is spawned onto a shared `JoinSet` so callers
//! can wait for all of them (`drain`) instead of firing and forgetting.
//! Outcomes of tasks that finish before a drain are kept and reported by it.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::{JoinError, JoinSet};

/// How one evaluation task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// This task wrote the entry's evaluation.
    Committed { degraded: bool },
    /// The entry already had an evaluation; nothing was written.
    AlreadyEvaluated,
    /// Every commit attempt failed; the entry waits for the reprocessing sweep.
    Flagged,
}

#[derive(Default)]
struct Tracked {
    running: JoinSet<EvaluationOutcome>,
    /// Outcomes reaped by `spawn`, held until the next `drain`.
    finished: Vec<EvaluationOutcome>,
}

fn record(finished: &mut Vec<EvaluationOutcome>, joined: Result<EvaluationOutcome, JoinError>) {
    match joined {
        Ok(outcome) => finished.push(outcome),
        Err(e) => tracing::error!(error = %e, "evaluation task panicked or was cancelled"),
    }
}

#[derive(Default)]
pub struct TaskTracker {
    tracked: Mutex<Tracked>,
}

impl TaskTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tracked(&self) -> MutexGuard<'_, Tracked> {
        self.tracked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn a tracked task. Must be called from within a Tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = EvaluationOutcome> + Send + 'static,
    {
        let mut guard = self.tracked();
        let tracked = &mut *guard;
        // Reap finished tasks so the set does not grow without bound.
        while let Some(joined) = tracked.running.try_join_next() {
            record(&mut tracked.finished, joined);
        }
        tracked.running.spawn(task);
    }

    /// Number of tasks spawned and still running or unreaped.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracked().running.len()
    }

    /// Wait for every tracked task, including ones spawned while draining.
    ///
    /// Tasks are joined through the shared set and the lock is held only for
    /// each poll, so `in_flight` keeps counting running tasks and `spawn` is
    /// never blocked. Dropping the returned future stops waiting but leaves
    /// every unfinished task running and tracked.
    pub async fn drain(&self) -> Vec<EvaluationOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let joined = std::future::poll_fn(|cx| {
                let mut tracked = self.tracked();
                outcomes.append(&mut tracked.finished);
                tracked.running.poll_join_next(cx)
            })
            .await;
            match joined {
                None => return outcomes,
                Some(joined) => record(&mut outcomes, joined),
            }
        }
    }
}
