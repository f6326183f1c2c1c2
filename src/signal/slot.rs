//! Type-erased slot invokers.
//!
//! Every connect variant collapses into an [`ErasedSlot`]: a boxed invoker
//! plus the identity tag used for dedup and receiver-based disconnect.
//! Method slots hold their receiver weakly; a dropped receiver turns the
//! invocation into a silent no-op until the record is pruned.

use std::sync::Arc;

use crate::connection::SlotIdentity;

/// A connected callable, erased to `Fn(&T)`.
pub(crate) struct ErasedSlot<T> {
    pub invoke: Box<dyn Fn(&T) + Send + Sync>,
    pub identity: SlotIdentity,
}

impl<T: 'static> ErasedSlot<T> {
    /// Wraps a closure or functor. Identity is a fresh anonymous tag.
    pub fn from_closure<F>(slot: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            invoke: Box::new(slot),
            identity: SlotIdentity::anonymous(),
        }
    }

    /// Wraps a free function. Identity is the function address, so the same
    /// function deduplicates under `UNIQUE`.
    pub fn from_fn(slot: fn(&T)) -> Self {
        Self {
            invoke: Box::new(move |args| slot(args)),
            identity: SlotIdentity::Function(slot as usize),
        }
    }

    /// Binds a receiver method. Identity is (receiver address, method
    /// address); the receiver is held weakly.
    pub fn from_method<R>(receiver: &Arc<R>, method: fn(&R, &T)) -> Self
    where
        R: Send + Sync + 'static,
    {
        let identity = SlotIdentity::Method {
            receiver: Arc::as_ptr(receiver) as usize,
            method: method as usize,
        };
        let weak = Arc::downgrade(receiver);
        Self {
            invoke: Box::new(move |args| {
                if let Some(receiver) = weak.upgrade() {
                    method(&receiver, args);
                }
            }),
            identity,
        }
    }
}
