//! Minimal abstraction over the CAN-FD peripheral. Allows the gateway to
//! plug into various drivers (STM32 FDCAN, MCAN, a test double, etc.).
use crate::gateway::bus::{CanMessage, ErrorCounters, ProtocolStatus};

/// Contract consumed by the gateway's transmit, receive, and health paths.
///
/// All operations are non-blocking: FIFO levels are polled and the gateway
/// defers to the next poll rather than waiting. No protocol logic lives
/// behind this trait.
pub trait CanController {
    type Error: core::fmt::Debug;

    /// Bring the controller into the active (bus-on) state.
    fn start(&mut self) -> Result<(), Self::Error>;
    /// Take the controller off the bus.
    fn stop(&mut self) -> Result<(), Self::Error>;
    /// True while the controller participates in bus traffic.
    fn is_active(&self) -> bool;

    /// Free element count of the hardware transmit FIFO.
    fn tx_free_level(&self) -> usize;
    /// Fill level of the hardware receive FIFO.
    fn rx_fill_level(&self) -> usize;
    /// Hand one message to the hardware transmit FIFO.
    fn submit(&mut self, message: &CanMessage) -> Result<(), Self::Error>;
    /// Pop one message from the hardware receive FIFO.
    fn receive(&mut self) -> Result<CanMessage, Self::Error>;

    /// Snapshot of the protocol status register.
    fn protocol_status(&self) -> Result<ProtocolStatus, Self::Error>;
    /// Snapshot of the error counter register.
    fn error_counters(&self) -> Result<ErrorCounters, Self::Error>;
}
