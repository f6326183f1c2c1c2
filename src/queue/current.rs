//! Thread-local current-queue indicator.
//!
//! Each worker thread publishes the address of the queue state it is
//! executing for; every other thread reads null. `AUTO` delivery resolution
//! and the blocking-queued deadlock check consult this through
//! [`TaskQueue::is_current`](crate::queue::TaskQueue::is_current).

use std::cell::Cell;

thread_local! {
    static CURRENT_QUEUE: Cell<usize> = const { Cell::new(0) };
}

/// Marks the calling thread as the worker of the given queue for the guard's
/// lifetime. Cleared on drop, including during unwinding.
pub(crate) struct CurrentQueueScope {
    prev: usize,
}

impl CurrentQueueScope {
    pub fn enter(queue_addr: usize) -> Self {
        let prev = CURRENT_QUEUE.replace(queue_addr);
        Self { prev }
    }
}

impl Drop for CurrentQueueScope {
    fn drop(&mut self) {
        CURRENT_QUEUE.set(self.prev);
    }
}

/// True when the calling thread is currently executing inside the worker loop
/// of the queue at `queue_addr`.
pub(crate) fn is_current(queue_addr: usize) -> bool {
    CURRENT_QUEUE.get() == queue_addr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_sets_and_restores() {
        assert!(!is_current(0xdead));
        {
            let _scope = CurrentQueueScope::enter(0xdead);
            assert!(is_current(0xdead));
            assert!(!is_current(0xbeef));
        }
        assert!(!is_current(0xdead));
    }
}
