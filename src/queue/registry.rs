//! # Process-wide named-queue directory.
//!
//! [`TaskQueueRegistry`] maps human-readable names to owned [`TaskQueue`]s.
//! The process-wide instance is reached through
//! [`TaskQueueRegistry::global`] (or the [`task_queue`] shorthand for
//! lookups). Creation is idempotent: creating a name that already exists is
//! a no-op, so independent subsystems can `create` the queues they need
//! without coordinating.
//!
//! Lookup hands out a shared reference; a queue stays alive while any
//! connection or caller still holds it, even after [`shutdown`]
//! removed it from the directory.
//!
//! [`shutdown`]: TaskQueueRegistry::shutdown

use std::io;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::queue::queue::TaskQueue;

static GLOBAL: Lazy<TaskQueueRegistry> = Lazy::new(TaskQueueRegistry::new);

/// Named directory of task queues.
#[derive(Debug, Default)]
pub struct TaskQueueRegistry {
    queues: DashMap<String, Arc<TaskQueue>>,
}

impl TaskQueueRegistry {
    /// Creates an empty registry.
    ///
    /// Most callers want [`TaskQueueRegistry::global`]; standalone instances
    /// are useful for tests and embedded runtimes.
    pub fn new() -> Self {
        Self { queues: DashMap::new() }
    }

    /// The process-wide registry.
    pub fn global() -> &'static TaskQueueRegistry {
        &GLOBAL
    }

    /// Creates a queue for every name that does not already exist.
    ///
    /// Duplicate names are no-ops. Fails only when the OS refuses to spawn a
    /// worker thread; queues created before the failure remain registered.
    pub fn create(&self, names: &[&str]) -> io::Result<()> {
        for &name in names {
            match self.queues.entry(name.to_string()) {
                dashmap::mapref::entry::Entry::Occupied(_) => {}
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(TaskQueue::new(name)?);
                    debug!(queue = name, "task queue created");
                }
            }
        }
        Ok(())
    }

    /// Looks up a queue by name.
    pub fn get(&self, name: &str) -> Option<Arc<TaskQueue>> {
        self.queues.get(name).map(|entry| entry.value().clone())
    }

    /// Removes every queue from the directory.
    ///
    /// Each worker shuts down once the last outside reference to its queue is
    /// gone; callers that still hold an `Arc` keep their queue running.
    pub fn shutdown(&self) {
        self.queues.clear();
        debug!("task queue registry cleared");
    }

    /// Number of registered queues.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// True when no queue is registered.
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

/// Looks up a queue in the process-wide registry.
pub fn task_queue(name: &str) -> Option<Arc<TaskQueue>> {
    TaskQueueRegistry::global().get(name)
}
