//! Connection model: policy bitset, identity, record state, handles.
//!
//! A connection binds one signal to one slot. This module groups everything
//! that describes such a binding independently of the signal's argument type:
//!
//! - [`ConnectionType`] / [`DeliveryMode`] policy bitset and its normalised
//!   delivery mode
//! - [`SlotIdentity`] equality tag used for `UNIQUE` dedup and receiver-based
//!   disconnect
//! - [`ConnectionState`] the shared atomic control block (alive / blocked /
//!   consumed)
//! - [`Connection`] / [`ScopedConnection`] caller-facing handles
//!
//! The typed half of a binding (the erased invoker, the target queue) lives
//! in [`crate::signal`], which owns records exclusively; handles and in-flight
//! queued tasks share only the control block.

mod handle;
mod identity;
mod record;
mod types;

pub use handle::{Connection, ScopedConnection};
pub use types::{ConnectionType, DeliveryMode};

pub(crate) use identity::SlotIdentity;
pub(crate) use record::ConnectionState;
