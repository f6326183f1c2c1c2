//! Slot identity tags.
//!
//! Identity drives `UNIQUE` deduplication and receiver-based disconnect.
//! Bound methods compare by (receiver address, method address); free
//! functions by function address. Stateful closures have no reliable
//! equality, so each closure connection gets a fresh anonymous tag and
//! `UNIQUE` on such a connection matches only itself.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ANONYMOUS_TAG: AtomicU64 = AtomicU64::new(1);

/// Equality tag for a connected slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotIdentity {
    /// A closure or other callable with no stable address. Tags are unique
    /// per connect call, so two anonymous identities never compare equal.
    Anonymous(u64),
    /// A free function, identified by its address.
    Function(usize),
    /// A bound receiver method.
    Method { receiver: usize, method: usize },
}

impl SlotIdentity {
    /// Allocates a fresh tag for a callable without a stable address.
    pub fn anonymous() -> Self {
        SlotIdentity::Anonymous(NEXT_ANONYMOUS_TAG.fetch_add(1, Ordering::Relaxed))
    }

    /// The receiver address, for `Method` identities.
    pub fn receiver(&self) -> Option<usize> {
        match self {
            SlotIdentity::Method { receiver, .. } => Some(*receiver),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_tags_never_collide() {
        assert_ne!(SlotIdentity::anonymous(), SlotIdentity::anonymous());
    }

    #[test]
    fn method_identity_compares_both_halves() {
        let a = SlotIdentity::Method { receiver: 1, method: 10 };
        let b = SlotIdentity::Method { receiver: 1, method: 10 };
        let c = SlotIdentity::Method { receiver: 2, method: 10 };
        let d = SlotIdentity::Method { receiver: 1, method: 11 };
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
