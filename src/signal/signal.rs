//! # Typed multi-subscriber dispatch point.
//!
//! [`Signal<T>`] owns an ordered list of connection records and dispatches to
//! each according to the record's delivery policy. The record list is guarded
//! by a mutex held only for list mutation and snapshot creation, never while
//! a slot runs, so slots may freely connect, disconnect, emit, or post.
//!
//! ## Emission
//! ```text
//! emit(args)
//!   ├─ snapshot live records (lock held; dead records pruned here)
//!   └─ per record, lock released:
//!        ├─ skip when dead / blocked / consumed (flags re-read, no lock)
//!        ├─ resolve AUTO → DIRECT when queueless or already on the target
//!        │  queue's worker, QUEUED otherwise
//!        ├─ DIRECT          → invoke inline with a borrow of `args`
//!        ├─ QUEUED          → clone `args` into a task, post to the queue
//!        └─ BLOCKING_QUEUED → as QUEUED + wait on a completion pair;
//!                             emitting from the target worker is skipped
//!                             and logged (would deadlock)
//! ```
//!
//! Single-shot records are claimed by compare-exchange before dispatch, so
//! concurrent emitters cannot double-fire. Queued invocations re-check the
//! record flags on the worker; a record disconnected mid-flight no-ops.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::connection::{
    Connection, ConnectionState, ConnectionType, DeliveryMode, SlotIdentity,
};
use crate::error::ConnectError;
use crate::queue::{Task, TaskQueue};
use crate::signal::completion::{completion_pair, CompletionHandle, CompletionOutcome};
use crate::signal::slot::ErasedSlot;

/// A typed emission point.
///
/// `T` is the argument value delivered to every slot; multi-argument signals
/// use tuples. Queued delivery clones the arguments into the posted task, so
/// `T: Clone + Send`.
///
/// Dropping the signal disconnects every record: handles report
/// `is_connected() == false` and in-flight queued invocations no-op.
pub struct Signal<T: Clone + Send + 'static> {
    records: Mutex<Vec<Arc<ConnectionRecord<T>>>>,
}

struct ConnectionRecord<T> {
    invoke: Box<dyn Fn(&T) + Send + Sync>,
    mode: DeliveryMode,
    single_shot: bool,
    unique: bool,
    queue: Option<Arc<TaskQueue>>,
    identity: SlotIdentity,
    state: Arc<ConnectionState>,
}

/// Delivery mode after `AUTO` resolution.
enum ResolvedMode {
    Direct,
    Queued,
    BlockingQueued,
}

impl<T> ConnectionRecord<T> {
    fn resolved_mode(&self) -> ResolvedMode {
        match self.mode {
            DeliveryMode::Auto => match &self.queue {
                Some(queue) if !queue.is_current() => ResolvedMode::Queued,
                _ => ResolvedMode::Direct,
            },
            DeliveryMode::Direct => ResolvedMode::Direct,
            DeliveryMode::Queued => ResolvedMode::Queued,
            DeliveryMode::BlockingQueued => ResolvedMode::BlockingQueued,
        }
    }

    /// Claims the single-shot slot when applicable. False means another
    /// emitter already won the claim and this dispatch must be skipped.
    fn claim(&self) -> bool {
        !self.single_shot || self.state.try_consume()
    }
}

impl<T: Clone + Send + 'static> Signal<T> {
    /// Creates a signal with no connections.
    pub fn new() -> Self {
        Self { records: Mutex::new(Vec::new()) }
    }

    /// Connects a closure (or any callable) to this signal.
    ///
    /// The slot's identity is anonymous: `UNIQUE` on a closure connection
    /// matches only itself, so two connects of byte-identical closures yield
    /// two records. Use [`connect_fn`](Self::connect_fn) or
    /// [`connect_method`](Self::connect_method) when dedup matters.
    pub fn connect<F>(
        &self,
        slot: F,
        ty: ConnectionType,
        queue: Option<&Arc<TaskQueue>>,
    ) -> Result<Connection, ConnectError>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.attach(ErasedSlot::from_closure(slot), ty, queue)
    }

    /// Connects a free function; the same `fn` deduplicates under `UNIQUE`.
    pub fn connect_fn(
        &self,
        slot: fn(&T),
        ty: ConnectionType,
        queue: Option<&Arc<TaskQueue>>,
    ) -> Result<Connection, ConnectError> {
        self.attach(ErasedSlot::from_fn(slot), ty, queue)
    }

    /// Connects a receiver method.
    ///
    /// The receiver is held weakly: dropping it turns the invocation into a
    /// no-op, and [`disconnect`](Self::disconnect) (or record pruning)
    /// removes the record. Identity is (receiver, method), so reconnecting
    /// the same pair deduplicates under `UNIQUE`.
    pub fn connect_method<R>(
        &self,
        receiver: &Arc<R>,
        method: fn(&R, &T),
        ty: ConnectionType,
        queue: Option<&Arc<TaskQueue>>,
    ) -> Result<Connection, ConnectError>
    where
        R: Send + Sync + 'static,
    {
        self.attach(ErasedSlot::from_method(receiver, method), ty, queue)
    }

    fn attach(
        &self,
        slot: ErasedSlot<T>,
        ty: ConnectionType,
        queue: Option<&Arc<TaskQueue>>,
    ) -> Result<Connection, ConnectError> {
        let mode = ty.resolve(queue.is_some())?;

        let mut records = self.records.lock();
        records.retain(|record| record.state.is_alive());

        let unique = ty.is_unique();
        if let Some(existing) = records
            .iter()
            .find(|record| (unique || record.unique) && record.identity == slot.identity)
        {
            return Ok(Connection::new(existing.state.clone()));
        }

        let record = Arc::new(ConnectionRecord {
            invoke: slot.invoke,
            mode,
            single_shot: ty.is_single_shot(),
            unique,
            queue: queue.cloned(),
            identity: slot.identity,
            state: Arc::new(ConnectionState::new()),
        });
        let connection = Connection::new(record.state.clone());
        records.push(record);
        Ok(connection)
    }

    /// Disconnects every record bound to `receiver`.
    pub fn disconnect<R>(&self, receiver: &Arc<R>) {
        let target = Arc::as_ptr(receiver) as usize;
        let mut records = self.records.lock();
        records.retain(|record| {
            if record.identity.receiver() == Some(target) {
                record.state.kill();
                return false;
            }
            record.state.is_alive()
        });
    }

    /// Disconnects the single record matching `receiver` and `method`.
    pub fn disconnect_method<R>(&self, receiver: &Arc<R>, method: fn(&R, &T)) {
        let target = SlotIdentity::Method {
            receiver: Arc::as_ptr(receiver) as usize,
            method: method as usize,
        };
        let mut records = self.records.lock();
        records.retain(|record| {
            if record.identity == target {
                record.state.kill();
                return false;
            }
            record.state.is_alive()
        });
    }

    /// Disconnects every record.
    ///
    /// A direct slot currently running is not interrupted; queued
    /// invocations still in flight observe the dead flag and no-op.
    pub fn disconnect_all(&self) {
        let mut records = self.records.lock();
        for record in records.iter() {
            record.state.kill();
        }
        records.clear();
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        let mut records = self.records.lock();
        records.retain(|record| record.state.is_alive());
        records.len()
    }

    /// Invokes all live, unblocked, unconsumed slots in insertion order.
    ///
    /// Direct slots run inline before `emit` returns; queued slots run on
    /// their queue's worker arbitrarily later; blocking-queued slots run on
    /// the worker while the emitter waits. A blocking-queued slot whose
    /// target queue is the calling thread's own worker would deadlock: it is
    /// skipped and reported through `tracing::error!`.
    ///
    /// A panicking direct slot unwinds into the emitter's frame; panics in
    /// queued slots are contained by the queue worker and do not affect
    /// other slots of the same emission.
    pub fn emit(&self, args: T) {
        let snapshot: Vec<Arc<ConnectionRecord<T>>> = {
            let mut records = self.records.lock();
            records.retain(|record| record.state.is_alive());
            records.clone()
        };

        for record in snapshot {
            if !record.state.is_dispatchable() {
                continue;
            }

            match record.resolved_mode() {
                ResolvedMode::Direct => {
                    if !record.claim() || !record.state.is_alive() {
                        continue;
                    }
                    (record.invoke)(&args);
                }
                ResolvedMode::Queued => {
                    let Some(queue) = record.queue.clone() else { continue };
                    if !record.claim() {
                        continue;
                    }
                    queue.post(Box::new(DispatchTask {
                        record: record.clone(),
                        args: args.clone(),
                        completion: None,
                    }));
                }
                ResolvedMode::BlockingQueued => {
                    let Some(queue) = record.queue.clone() else { continue };
                    if queue.is_current() {
                        error!(
                            queue = queue.name(),
                            "blocking-queued emission from the target queue's own worker; slot skipped"
                        );
                        continue;
                    }
                    if !record.claim() {
                        continue;
                    }
                    let (handle, waiter) = completion_pair();
                    queue.post(Box::new(DispatchTask {
                        record: record.clone(),
                        args: args.clone(),
                        completion: Some(handle),
                    }));
                    if waiter.wait() == CompletionOutcome::Discarded {
                        debug!(
                            queue = queue.name(),
                            "blocking-queued invocation discarded before running"
                        );
                    }
                }
            }
        }
    }
}

impl<T: Clone + Send + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Drop for Signal<T> {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.records.lock().len())
            .finish()
    }
}

/// Deferred slot invocation posted to a task queue.
struct DispatchTask<T: Clone + Send + 'static> {
    record: Arc<ConnectionRecord<T>>,
    args: T,
    completion: Option<CompletionHandle>,
}

impl<T: Clone + Send + 'static> Task for DispatchTask<T> {
    fn run(self: Box<Self>) {
        let task = *self;
        // `consumed` was claimed at dispatch time; only liveness and blocking
        // can change between posting and execution.
        if task.record.state.is_alive() && !task.record.state.is_blocked() {
            (task.record.invoke)(&task.args);
        }
        if let Some(completion) = task.completion {
            completion.complete();
        }
    }

    fn name(&self) -> &str {
        "signal-dispatch"
    }
}
