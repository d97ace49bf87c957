//! Execution-context capability check.
//!
//! The gateway runs in a two-context model: the peripheral/transport
//! interrupts and a single application thread. Every mutating operation
//! except transmit-queue admission must run in the thread context, because
//! correctness depends on not being preempted by the peripheral's own ISR
//! mid-update.

/// Platform query answering "am I inside an interrupt handler".
/// On Cortex-M this is an IPSR read; on a hosted test build it is a stub.
pub trait ExecutionContext {
    /// True when the caller is running in interrupt context.
    fn in_interrupt(&self) -> bool;
}

/// Trap on a thread-context contract violation.
///
/// Calling a thread-only operation from an interrupt is a programming
/// error, not a runtime condition: the process halts rather than limping on
/// with a possible mid-update preemption.
pub fn assert_thread_context<X: ExecutionContext>(exec: &X) {
    if exec.in_interrupt() {
        panic!("gateway operation invoked from interrupt context");
    }
}
