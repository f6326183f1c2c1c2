//! # Single-consumer worker queue.
//!
//! A [`TaskQueue`] owns one OS thread that drains an immediate FIFO and a
//! time-ordered delayed set. Both live behind a single mutex together with
//! the posting-order counter; the worker drops the lock before running a
//! task, so tasks may freely post, connect, or emit.
//!
//! ## Worker loop
//! Each iteration atomically computes the next step:
//! - **quit**: the queue is shutting down; undrained tasks are dropped
//!   without running,
//! - **run-one**: pop the task that preserves posting order (an expired
//!   delayed task runs only when no earlier-posted immediate task is
//!   pending),
//! - **sleep**: block on the wake condition, bounded by the earliest
//!   delayed fire time. Spurious wakeups re-evaluate from the top.
//!
//! A panicking task is contained with `catch_unwind`; the worker survives
//! and queue state stays consistent.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, warn};

use crate::queue::current::{self, CurrentQueueScope};
use crate::queue::task::Task;

/// Serial executor backed by one worker thread.
///
/// Dropping the queue requests shutdown, wakes the worker, and joins it.
/// Pending tasks are dropped without running. The queue must not be dropped
/// from its own worker thread; that case is detected and the worker is
/// detached instead of self-joined.
pub struct TaskQueue {
    shared: Arc<QueueShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

struct QueueShared {
    name: String,
    state: Mutex<QueueState>,
    wake: Condvar,
}

struct QueueState {
    quit: bool,
    next_order: u64,
    immediate: VecDeque<(u64, Box<dyn Task>)>,
    delayed: BTreeMap<(Instant, u64), Box<dyn Task>>,
}

enum Step {
    Quit(Vec<Box<dyn Task>>),
    Run(Box<dyn Task>),
}

impl TaskQueue {
    /// Creates the queue and spawns its worker thread.
    pub fn new(name: impl Into<String>) -> io::Result<Arc<Self>> {
        let name = name.into();
        let shared = Arc::new(QueueShared {
            name: name.clone(),
            state: Mutex::new(QueueState {
                quit: false,
                next_order: 0,
                immediate: VecDeque::new(),
                delayed: BTreeMap::new(),
            }),
            wake: Condvar::new(),
        });

        let worker = thread::Builder::new().name(name).spawn({
            let shared = shared.clone();
            move || worker_loop(shared)
        })?;

        Ok(Arc::new(Self {
            shared,
            worker: Mutex::new(Some(worker)),
        }))
    }

    /// The queue's human-readable label.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// True when the calling thread is this queue's worker.
    pub fn is_current(&self) -> bool {
        current::is_current(Arc::as_ptr(&self.shared) as usize)
    }

    /// Enqueues a task for immediate execution and wakes the worker.
    ///
    /// Tasks posted from a single thread run in posting order. A task posted
    /// after shutdown began is dropped without running.
    pub fn post(&self, task: Box<dyn Task>) {
        let mut state = self.shared.state.lock();
        if state.quit {
            drop(state);
            debug!(queue = %self.shared.name, task = task.name(), "dropping task posted after shutdown");
            return;
        }
        state.next_order += 1;
        let order = state.next_order;
        state.immediate.push_back((order, task));
        drop(state);
        self.shared.wake.notify_one();
    }

    /// Enqueues a task to execute no earlier than `delay` from now.
    ///
    /// Delays are measured on the monotonic clock. A delayed task never
    /// overtakes an immediate task posted strictly before it.
    pub fn post_delayed(&self, task: Box<dyn Task>, delay: Duration) {
        let fire_at = Instant::now() + delay;
        let mut state = self.shared.state.lock();
        if state.quit {
            drop(state);
            debug!(queue = %self.shared.name, task = task.name(), "dropping delayed task posted after shutdown");
            return;
        }
        state.next_order += 1;
        let order = state.next_order;
        state.delayed.insert((fire_at, order), task);
        drop(state);
        self.shared.wake.notify_one();
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.quit = true;
        }
        self.shared.wake.notify_all();

        if self.is_current() {
            warn!(queue = %self.shared.name, "queue dropped from its own worker thread; detaching worker");
            self.worker.lock().take();
            return;
        }

        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                error!(queue = %self.shared.name, "worker thread panicked during shutdown");
            }
        }
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue").field("name", &self.shared.name).finish()
    }
}

impl QueueState {
    fn drain(&mut self) -> Vec<Box<dyn Task>> {
        let mut leftovers: Vec<Box<dyn Task>> =
            self.immediate.drain(..).map(|(_, task)| task).collect();
        leftovers.extend(std::mem::take(&mut self.delayed).into_values());
        leftovers
    }
}

fn worker_loop(shared: Arc<QueueShared>) {
    let _scope = CurrentQueueScope::enter(Arc::as_ptr(&shared) as usize);
    debug!(queue = %shared.name, "worker started");

    loop {
        let step = {
            let mut state = shared.state.lock();
            loop {
                if state.quit {
                    break Step::Quit(state.drain());
                }

                let now = Instant::now();
                let next_delayed = state.delayed.first_key_value().map(|(key, _)| *key);

                if let Some((fire_at, order)) = next_delayed {
                    if fire_at <= now {
                        let earlier_immediate =
                            state.immediate.front().is_some_and(|(o, _)| *o < order);
                        let task = if earlier_immediate {
                            state.immediate.pop_front().map(|(_, task)| task)
                        } else {
                            state.delayed.remove(&(fire_at, order))
                        };
                        if let Some(task) = task {
                            break Step::Run(task);
                        }
                        continue;
                    }

                    if let Some((_, task)) = state.immediate.pop_front() {
                        break Step::Run(task);
                    }
                    let _ = shared.wake.wait_until(&mut state, fire_at);
                    continue;
                }

                if let Some((_, task)) = state.immediate.pop_front() {
                    break Step::Run(task);
                }
                shared.wake.wait(&mut state);
            }
        };

        match step {
            Step::Quit(leftovers) => {
                if !leftovers.is_empty() {
                    debug!(queue = %shared.name, pending = leftovers.len(), "dropping undrained tasks");
                }
                drop(leftovers);
                break;
            }
            Step::Run(task) => {
                let label = task.name().to_owned();
                if panic::catch_unwind(AssertUnwindSafe(|| task.run())).is_err() {
                    error!(queue = %shared.name, task = %label, "task panicked; worker continues");
                }
            }
        }
    }

    debug!(queue = %shared.name, "worker stopped");
}
