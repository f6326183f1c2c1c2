//! # sigslot
//!
//! **sigslot** is a typed signal/slot dispatch runtime for threads.
//!
//! Producers emit named, typed events ("signals"); handlers ("slots") run
//! according to a per-connection delivery policy: inline on the emitting
//! thread, deferred onto a named worker queue, or synchronously cross-thread
//! with the emitter blocked until the slot completes.
//!
//! ## Features
//!
//! | Area            | Description                                                        | Key types                                    |
//! |-----------------|--------------------------------------------------------------------|----------------------------------------------|
//! | **Signals**     | Typed multi-subscriber dispatch points.                            | [`Signal`]                                   |
//! | **Policies**    | Per-connection delivery mode plus `UNIQUE` / `SINGLE_SHOT` flags.  | [`ConnectionType`], [`DeliveryMode`]         |
//! | **Handles**     | Disconnect, block/unblock, RAII disconnection.                     | [`Connection`], [`ScopedConnection`]         |
//! | **Queues**      | Single-consumer worker loops with FIFO + delayed scheduling.       | [`TaskQueue`], [`Task`], [`TaskFn`]          |
//! | **Registry**    | Process-wide named-queue directory.                                | [`TaskQueueRegistry`], [`task_queue`]        |
//! | **Errors**      | Typed connect-time validation.                                     | [`ConnectError`]                             |
//!
//! Multi-argument signals use tuples for `T`. Queued delivery clones the
//! arguments into the posted task, so `T: Clone + Send`.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! use sigslot::{ConnectionType, Signal, TaskQueueRegistry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Worker queues are usually created once, up front.
//!     TaskQueueRegistry::global().create(&["worker"])?;
//!     let worker = sigslot::task_queue("worker").expect("created above");
//!
//!     let progress: Signal<(u32, String)> = Signal::new();
//!
//!     // Inline delivery on the emitting thread.
//!     let seen = Arc::new(AtomicU32::new(0));
//!     let counter = seen.clone();
//!     let direct = progress.connect(
//!         move |(percent, _stage): &(u32, String)| {
//!             counter.store(*percent, Ordering::SeqCst);
//!         },
//!         ConnectionType::DIRECT,
//!         None,
//!     )?;
//!
//!     // Deferred delivery on the worker's thread.
//!     let queued = progress.connect(
//!         |(percent, stage): &(u32, String)| {
//!             println!("[worker] {stage}: {percent}%");
//!         },
//!         ConnectionType::QUEUED,
//!         Some(&worker),
//!     )?;
//!
//!     progress.emit((100, "indexing".into()));
//!     std::thread::sleep(Duration::from_millis(50));
//!
//!     assert_eq!(seen.load(Ordering::SeqCst), 100);
//!     direct.disconnect();
//!     queued.disconnect();
//!     Ok(())
//! }
//! ```
//!
//! ## Receiver lifetimes
//!
//! [`Signal::connect_method`] holds its receiver weakly: the signal never
//! owns receivers, and a dropped receiver silently stops receiving. Either
//! disconnect explicitly (or via [`ScopedConnection`]) when the receiver
//! goes away, or rely on the weak upgrade to no-op.
//!
//! ---

mod connection;
mod error;
mod queue;
mod signal;

// ---- Public re-exports ----

pub use connection::{Connection, ConnectionType, DeliveryMode, ScopedConnection};
pub use error::ConnectError;
pub use queue::{task_queue, Task, TaskFn, TaskQueue, TaskQueueRegistry};
pub use signal::Signal;
