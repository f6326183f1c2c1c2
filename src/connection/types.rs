//! Connection policy bitset and delivery-mode resolution.

use bitflags::bitflags;

use crate::error::ConnectError;

bitflags! {
    /// Per-connection policy bits.
    ///
    /// Exactly one of [`AUTO`](Self::AUTO), [`DIRECT`](Self::DIRECT),
    /// [`QUEUED`](Self::QUEUED), [`BLOCKING_QUEUED`](Self::BLOCKING_QUEUED)
    /// selects the delivery mode; an empty bitset defaults to `DIRECT`.
    /// [`UNIQUE`](Self::UNIQUE) and [`SINGLE_SHOT`](Self::SINGLE_SHOT) are
    /// orthogonal flags combined by OR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConnectionType: u32 {
        /// Resolve to `DIRECT` or `QUEUED` at emit time, depending on whether
        /// the emitting thread is the connection's own queue worker.
        const AUTO = 1 << 0;
        /// Invoke the slot inline on the emitting thread.
        const DIRECT = 1 << 1;
        /// Post the invocation to the connection's task queue.
        const QUEUED = 1 << 2;
        /// As `QUEUED`, but the emitter blocks until the slot completes.
        const BLOCKING_QUEUED = 1 << 3;
        /// Deduplicate by slot identity at connect time.
        const UNIQUE = 1 << 4;
        /// Invoke at most once, then mark the connection consumed.
        const SINGLE_SHOT = 1 << 5;
    }
}

/// The resolved, mutually exclusive delivery mode of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Decide between `Direct` and `Queued` per emission.
    Auto,
    /// Inline on the emitting thread.
    Direct,
    /// Deferred to the connection's queue worker.
    Queued,
    /// Deferred to the queue worker; the emitter waits for completion.
    BlockingQueued,
}

impl ConnectionType {
    const DELIVERY_BITS: ConnectionType = ConnectionType::AUTO
        .union(ConnectionType::DIRECT)
        .union(ConnectionType::QUEUED)
        .union(ConnectionType::BLOCKING_QUEUED);

    /// True when the `UNIQUE` flag is set.
    pub fn is_unique(self) -> bool {
        self.contains(ConnectionType::UNIQUE)
    }

    /// True when the `SINGLE_SHOT` flag is set.
    pub fn is_single_shot(self) -> bool {
        self.contains(ConnectionType::SINGLE_SHOT)
    }

    /// Normalises the bitset into a [`DeliveryMode`], validating exclusivity
    /// and queue requirements.
    ///
    /// An empty delivery selection defaults to [`DeliveryMode::Direct`].
    /// `QUEUED` and `BLOCKING_QUEUED` require a queue; `AUTO` and `DIRECT`
    /// accept one but do not need it.
    pub(crate) fn resolve(self, has_queue: bool) -> Result<DeliveryMode, ConnectError> {
        let delivery = self & Self::DELIVERY_BITS;
        if delivery.bits().count_ones() > 1 {
            return Err(ConnectError::InvalidPolicy { policy: self });
        }

        let mode = if delivery.contains(ConnectionType::AUTO) {
            DeliveryMode::Auto
        } else if delivery.contains(ConnectionType::QUEUED) {
            DeliveryMode::Queued
        } else if delivery.contains(ConnectionType::BLOCKING_QUEUED) {
            DeliveryMode::BlockingQueued
        } else {
            // DIRECT or empty.
            DeliveryMode::Direct
        };

        match mode {
            DeliveryMode::Queued | DeliveryMode::BlockingQueued if !has_queue => {
                Err(ConnectError::MissingQueue { policy: self })
            }
            _ => Ok(mode),
        }
    }
}

impl Default for ConnectionType {
    /// Defaults to [`ConnectionType::DIRECT`].
    fn default() -> Self {
        ConnectionType::DIRECT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_policy_defaults_to_direct() {
        assert_eq!(
            ConnectionType::empty().resolve(false).unwrap(),
            DeliveryMode::Direct
        );
    }

    #[test]
    fn flags_do_not_affect_mode() {
        let ty = ConnectionType::QUEUED | ConnectionType::UNIQUE | ConnectionType::SINGLE_SHOT;
        assert_eq!(ty.resolve(true).unwrap(), DeliveryMode::Queued);
        assert!(ty.is_unique());
        assert!(ty.is_single_shot());
    }

    #[test]
    fn multiple_delivery_bits_rejected() {
        let ty = ConnectionType::DIRECT | ConnectionType::QUEUED;
        assert!(matches!(
            ty.resolve(true),
            Err(ConnectError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn queued_without_queue_rejected() {
        for ty in [ConnectionType::QUEUED, ConnectionType::BLOCKING_QUEUED] {
            assert!(matches!(
                ty.resolve(false),
                Err(ConnectError::MissingQueue { .. })
            ));
        }
    }

    #[test]
    fn auto_accepts_optional_queue() {
        assert_eq!(
            ConnectionType::AUTO.resolve(false).unwrap(),
            DeliveryMode::Auto
        );
        assert_eq!(
            ConnectionType::AUTO.resolve(true).unwrap(),
            DeliveryMode::Auto
        );
    }
}
