//! Software transmit queue feeding the CAN controller's hardware FIFO.
//!
//! Admission may happen from either execution context (the dispatcher
//! thread or a collaborator's interrupt handler), so slot and cursor
//! updates run under a `critical_section`. Draining toward the hardware is
//! a thread-context-only operation.
use crate::gateway::bus::CanMessage;
use crate::gateway::traits::{
    can_controller::CanController,
    execution::{assert_thread_context, ExecutionContext},
};
use core::cell::RefCell;
use critical_section::Mutex;

//==================================================================================Constants

/// Ring depth; one slot stays reserved, so up to `TX_QUEUE_DEPTH - 1`
/// messages are in flight at once.
pub const TX_QUEUE_DEPTH: usize = 8;

//==================================================================================CanTxQueue

struct Inner {
    slots: [Option<CanMessage>; TX_QUEUE_DEPTH],
    read: usize,
    write: usize,
}

impl Inner {
    const fn is_full(&self) -> bool {
        (self.write + 1) % TX_QUEUE_DEPTH == self.read
    }

    const fn is_empty(&self) -> bool {
        self.write == self.read
    }
}

/// Fixed-depth circular queue of pending outbound CAN messages.
///
/// Messages are copied by value in and out; a slot owns its copy
/// exclusively between enqueue and dequeue. The type is `Sync` and usable
/// as a `static`, which is how a platform shares it between its interrupt
/// handlers and the gateway.
pub struct CanTxQueue {
    inner: Mutex<RefCell<Inner>>,
}

impl CanTxQueue {
    /// Create an empty queue. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                slots: [None; TX_QUEUE_DEPTH],
                read: 0,
                write: 0,
            })),
        }
    }

    /// Copy `message` into the next free slot.
    ///
    /// Returns `false` when the queue is full, leaving it untouched. Safe
    /// from both execution contexts: the critical section nests without
    /// double-masking when the caller already runs with interrupts off.
    pub fn enqueue(&self, message: &CanMessage) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.is_full() {
                return false;
            }
            let write = inner.write;
            inner.slots[write] = Some(*message);
            inner.write = (write + 1) % TX_QUEUE_DEPTH;
            true
        })
    }

    /// Copy the oldest pending message out, if any.
    pub fn dequeue(&self) -> Option<CanMessage> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.is_empty() {
                return None;
            }
            let read = inner.read;
            let message = inner.slots[read].take();
            inner.read = (read + 1) % TX_QUEUE_DEPTH;
            message
        })
    }

    /// True when no message is pending.
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_empty())
    }

    /// True when the next enqueue would be refused.
    pub fn is_full(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_full())
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| {
            let inner = self.inner.borrow_ref(cs);
            (inner.write + TX_QUEUE_DEPTH - inner.read) % TX_QUEUE_DEPTH
        })
    }
}

impl Default for CanTxQueue {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================Drain

/// Move at most one pending message into the hardware transmit FIFO.
///
/// Thread context only; an interrupt-context call traps. Nothing happens
/// unless the controller is active, a hardware FIFO slot is free, and the
/// software queue holds a message. The caller re-invokes once per scheduler
/// tick to keep the queue flowing.
pub fn drain_one<C, X>(queue: &CanTxQueue, can: &mut C, exec: &X)
where
    C: CanController,
    X: ExecutionContext,
{
    assert_thread_context(exec);

    if !can.is_active() || can.tx_free_level() == 0 {
        return;
    }
    if let Some(message) = queue.dequeue() {
        if can.submit(&message).is_err() {
            // The hardware refused a slot it just advertised; the message
            // is lost, matching the wire protocol's best-effort policy.
            #[cfg(feature = "defmt")]
            defmt::warn!("CAN submit failed, message dropped");
        }
    }
}
