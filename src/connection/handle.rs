//! Caller-facing connection handles.
//!
//! [`Connection`] is a cheap value handle over a record's control block.
//! It never owns the slot: dropping a `Connection` leaves the connection
//! established. [`ScopedConnection`] adds RAII semantics: the connection is
//! disconnected when the scope guard is dropped.

use std::sync::Arc;

use crate::connection::record::ConnectionState;

/// Handle to an established connection.
///
/// All methods are safe to call concurrently with emission and with each
/// other. Operations on a disconnected handle are no-ops.
#[derive(Debug, Clone)]
pub struct Connection {
    state: Arc<ConnectionState>,
}

impl Connection {
    pub(crate) fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }

    /// Disconnects the slot from its signal. Idempotent.
    ///
    /// The record is marked dead immediately; the owning signal unlinks it
    /// during its next maintenance sweep. Queued invocations already in
    /// flight observe the dead flag and skip the slot.
    pub fn disconnect(&self) {
        self.state.kill();
    }

    /// Suppresses invocation without disconnecting.
    ///
    /// A blocked connection keeps its position in the signal's dispatch
    /// order and resumes receiving emissions after [`unblock`](Self::unblock).
    pub fn block(&self) {
        self.state.set_blocked(true);
    }

    /// Re-enables invocation after [`block`](Self::block).
    pub fn unblock(&self) {
        self.state.set_blocked(false);
    }

    /// True while the connection is still established in its signal.
    pub fn is_connected(&self) -> bool {
        self.state.is_alive()
    }

    /// True while invocation is suppressed via [`block`](Self::block).
    pub fn is_blocked(&self) -> bool {
        self.state.is_blocked()
    }
}

/// Scope guard that disconnects on drop.
///
/// Move-only: ownership of the underlying [`Connection`] can be transferred,
/// but the guard cannot be cloned.
#[derive(Debug)]
pub struct ScopedConnection {
    conn: Option<Connection>,
}

impl ScopedConnection {
    /// Wraps a connection so it is disconnected when the guard drops.
    pub fn new(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }

    /// Releases the connection without disconnecting it.
    pub fn release(mut self) -> Connection {
        self.conn.take().expect("guard holds a connection until dropped")
    }

    /// True while the wrapped connection is still established.
    pub fn is_connected(&self) -> bool {
        self.conn.as_ref().is_some_and(Connection::is_connected)
    }
}

impl From<Connection> for ScopedConnection {
    fn from(conn: Connection) -> Self {
        Self::new(conn)
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            conn.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_handle() -> Connection {
        Connection::new(Arc::new(ConnectionState::new()))
    }

    #[test]
    fn disconnect_is_idempotent() {
        let conn = live_handle();
        assert!(conn.is_connected());
        conn.disconnect();
        conn.disconnect();
        assert!(!conn.is_connected());
    }

    #[test]
    fn block_unblock_roundtrip() {
        let conn = live_handle();
        conn.block();
        assert!(conn.is_blocked());
        assert!(conn.is_connected());
        conn.unblock();
        assert!(!conn.is_blocked());
    }

    #[test]
    fn scoped_disconnects_on_drop() {
        let conn = live_handle();
        let probe = conn.clone();
        drop(ScopedConnection::new(conn));
        assert!(!probe.is_connected());
    }

    #[test]
    fn released_scope_keeps_connection() {
        let conn = live_handle();
        let probe = conn.clone();
        let scoped = ScopedConnection::new(conn);
        let _conn = scoped.release();
        assert!(probe.is_connected());
    }
}
