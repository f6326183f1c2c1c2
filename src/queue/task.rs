//! # Task abstraction and function-backed task implementation.
//!
//! A [`Task`] is an opaque unit of deferred work executed by a
//! [`TaskQueue`](crate::queue::TaskQueue) worker. The worker consumes the
//! boxed task, so `run` owns its state for the duration of the call; a task
//! that must outlive its own execution moves that state elsewhere before
//! returning.
//!
//! [`TaskFn`] wraps any `FnOnce() + Send` closure; [`TaskFn::boxed`] is the
//! one-liner used at posting sites.

use std::borrow::Cow;

/// A unit of deferred work runnable by a task queue.
pub trait Task: Send {
    /// Executes the task, consuming it.
    fn run(self: Box<Self>);

    /// A short human-readable label used in logs.
    fn name(&self) -> &str {
        "task"
    }
}

/// Function-backed task implementation.
pub struct TaskFn<F: FnOnce() + Send> {
    name: Cow<'static, str>,
    func: F,
}

impl<F: FnOnce() + Send> TaskFn<F> {
    /// Creates an unnamed function-backed task.
    pub fn new(func: F) -> Self {
        Self { name: Cow::Borrowed("task"), func }
    }

    /// Creates a named function-backed task.
    pub fn named(name: impl Into<Cow<'static, str>>, func: F) -> Self {
        Self { name: name.into(), func }
    }

    /// Creates the task and returns it boxed, ready to post.
    pub fn boxed(func: F) -> Box<dyn Task>
    where
        F: 'static,
    {
        Box::new(Self::new(func))
    }
}

impl<F: FnOnce() + Send> Task for TaskFn<F> {
    fn run(self: Box<Self>) {
        (self.func)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_fn_runs_closure() {
        let mut hit = false;
        let task = Box::new(TaskFn::new(|| hit = true));
        task.run();
        assert!(hit);
    }

    #[test]
    fn named_task_reports_name() {
        let task = TaskFn::named("drain", || {});
        assert_eq!(task.name(), "drain");
    }
}
