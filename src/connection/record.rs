//! Shared connection control block.
//!
//! [`ConnectionState`] is the part of a connection record that outlives the
//! record itself: handles hold it to disconnect/block, and in-flight queued
//! tasks consult it to decide whether the slot may still run. All three flags
//! are atomics so emitters can read them without taking the signal's lock.
//!
//! State machine: `Live-Unblocked` ⇄ `Live-Blocked` (block/unblock), either
//! live state → `Consumed` (single-shot claim), any state → `Dead`
//! (disconnect or signal destruction). `Dead` is terminal; dispatch happens
//! only from `Live-Unblocked`.

use std::sync::atomic::{AtomicBool, Ordering};

/// Atomic flag block shared between a signal's record, its handles, and any
/// queued invocations still in flight.
#[derive(Debug)]
pub(crate) struct ConnectionState {
    alive: AtomicBool,
    blocked: AtomicBool,
    consumed: AtomicBool,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self {
            alive: AtomicBool::new(true),
            blocked: AtomicBool::new(false),
            consumed: AtomicBool::new(false),
        }
    }

    /// True until the record is disconnected or its signal is dropped.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the record dead. Idempotent; returns whether this call made the
    /// transition.
    pub fn kill(&self) -> bool {
        !self.alive.swap(false, Ordering::AcqRel)
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::Release);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }

    /// Claims a single-shot invocation. Only the first caller across all
    /// emitter threads wins; losers must skip dispatch.
    pub fn try_consume(&self) -> bool {
        self.consumed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// True when dispatch may proceed: alive, not blocked, not consumed.
    pub fn is_dispatchable(&self) -> bool {
        self.is_alive() && !self.is_blocked() && !self.is_consumed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_dispatchable() {
        let s = ConnectionState::new();
        assert!(s.is_alive());
        assert!(!s.is_blocked());
        assert!(!s.is_consumed());
        assert!(s.is_dispatchable());
    }

    #[test]
    fn kill_is_idempotent() {
        let s = ConnectionState::new();
        assert!(s.kill());
        assert!(!s.kill());
        assert!(!s.is_alive());
        assert!(!s.is_dispatchable());
    }

    #[test]
    fn consume_claims_once() {
        let s = ConnectionState::new();
        assert!(s.try_consume());
        assert!(!s.try_consume());
        assert!(s.is_consumed());
        assert!(!s.is_dispatchable());
    }

    #[test]
    fn blocking_suppresses_without_killing() {
        let s = ConnectionState::new();
        s.set_blocked(true);
        assert!(s.is_alive());
        assert!(!s.is_dispatchable());
        s.set_blocked(false);
        assert!(s.is_dispatchable());
    }
}
