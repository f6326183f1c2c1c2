//! # Error types used by the dispatch runtime.
//!
//! Connection establishment is the only fallible public operation: a policy
//! bitset can be malformed, or a queue-bound delivery mode can be requested
//! without a queue. Everything else (disconnecting a dead handle, emitting
//! with no connections) is a documented no-op rather than an error.
//!
//! [`ConnectError`] provides `as_label()` for stable snake_case labels in logs.

use thiserror::Error;

use crate::connection::ConnectionType;

/// Errors raised while establishing a connection.
///
/// Reported synchronously by the `connect` family; no record is created when
/// any of these is returned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// More than one delivery-mode bit was set in the policy.
    #[error("invalid policy {policy:?}: delivery modes are mutually exclusive")]
    InvalidPolicy {
        /// The offending bitset as passed by the caller.
        policy: ConnectionType,
    },

    /// A queue-bound delivery mode was requested without a target queue.
    #[error("policy {policy:?} requires a task queue")]
    MissingQueue {
        /// The policy that needs a queue.
        policy: ConnectionType,
    },
}

impl ConnectError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectError::InvalidPolicy { .. } => "connect_invalid_policy",
            ConnectError::MissingQueue { .. } => "connect_missing_queue",
        }
    }
}
