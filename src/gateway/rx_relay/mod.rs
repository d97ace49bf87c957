//! Receive relay: drains the controller's hardware RX FIFO and forwards
//! each message upstream as its own wire frame, with no coalescing.
use crate::gateway::command;
use crate::gateway::traits::{
    can_controller::CanController,
    execution::{assert_thread_context, ExecutionContext},
    host_link::HostLink,
    timestamp::TimestampSource,
};
use crate::gateway::wire::Framer;

/// Forward every message currently in the hardware receive FIFO.
///
/// Thread context only. The full FIFO is drained in one invocation,
/// bounded by the hardware depth, so nothing stays pending once this
/// returns. A failed FIFO pop abandons the remainder of the drain for this
/// poll; the fill level is re-examined on the next one.
pub fn relay_pending<C, L, T, X>(
    can: &mut C,
    framer: &mut Framer,
    link: &mut L,
    timer: &T,
    exec: &X,
) where
    C: CanController,
    L: HostLink,
    T: TimestampSource,
    X: ExecutionContext,
{
    assert_thread_context(exec);

    if !can.is_active() {
        return;
    }

    while can.rx_fill_level() > 0 {
        let message = match can.receive() {
            Ok(message) => message,
            Err(_error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("RX FIFO pop failed with messages pending");
                return;
            }
        };

        let payload = command::encode_upstream(&message);
        framer.send(&payload, link, timer);
    }
}
