//! Completion signalling for blocking-queued emission.
//!
//! A [`completion_pair`] links the emitting thread to the posted invocation.
//! The handle travels inside the task; the waiter stays with the emitter.
//! Whatever happens to the task (it runs, it panics mid-slot, or the queue
//! drops it during shutdown) the handle signals exactly once, so the waiter
//! never blocks forever.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// How a blocking-queued invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompletionOutcome {
    /// The task ran (the slot may still have been skipped as dead/blocked).
    Completed,
    /// The task was dropped without running, e.g. at queue shutdown.
    Discarded,
}

struct CompletionShared {
    outcome: Mutex<Option<CompletionOutcome>>,
    cond: Condvar,
}

/// Sender half; carried by the posted task.
pub(crate) struct CompletionHandle {
    shared: Arc<CompletionShared>,
    signalled: bool,
}

impl CompletionHandle {
    /// Marks the invocation completed and wakes the emitter.
    pub fn complete(mut self) {
        self.signal(CompletionOutcome::Completed);
    }

    fn signal(&mut self, outcome: CompletionOutcome) {
        if self.signalled {
            return;
        }
        self.signalled = true;
        let mut slot = self.shared.outcome.lock();
        *slot = Some(outcome);
        self.shared.cond.notify_all();
    }
}

impl Drop for CompletionHandle {
    fn drop(&mut self) {
        self.signal(CompletionOutcome::Discarded);
    }
}

/// Receiver half; blocks the emitter until the handle signals.
pub(crate) struct CompletionWaiter {
    shared: Arc<CompletionShared>,
}

impl CompletionWaiter {
    /// Waits for the paired handle. Spurious wakeups are tolerated.
    pub fn wait(self) -> CompletionOutcome {
        let mut outcome = self.shared.outcome.lock();
        loop {
            if let Some(result) = *outcome {
                return result;
            }
            self.shared.cond.wait(&mut outcome);
        }
    }
}

/// Creates a linked handle/waiter pair.
pub(crate) fn completion_pair() -> (CompletionHandle, CompletionWaiter) {
    let shared = Arc::new(CompletionShared {
        outcome: Mutex::new(None),
        cond: Condvar::new(),
    });
    (
        CompletionHandle { shared: shared.clone(), signalled: false },
        CompletionWaiter { shared },
    )
}
