//! Gateway engine: wire framing, command codecs, frame dispatch, transmit
//! queue, receive relay, and bus health monitoring, tied together by the
//! [`Gateway`] facade.
pub mod bus;
pub mod command;
pub mod health;
pub mod parser;
pub mod rx_relay;
pub mod traits;
pub mod tx_queue;
pub mod wire;

#[cfg(test)]
pub(crate) mod test_support;

use crate::gateway::bus::CanStats;
use crate::gateway::health::HealthMonitor;
use crate::gateway::parser::FrameParser;
use crate::gateway::traits::{
    can_controller::CanController, execution::ExecutionContext, host_link::HostLink,
    timestamp::TimestampSource,
};
use crate::gateway::tx_queue::{drain_one, CanTxQueue};
use crate::gateway::wire::{Framer, INGRESS_CAPACITY};
use crate::infra::spsc::Consumer;

//==================================================================================Gateway

/// Owner of the gateway's per-process state and collaborator handles.
///
/// The transmit queue is borrowed rather than owned so a platform can keep
/// it in a `static` and hand its reference to interrupt handlers that
/// inject frames directly. All `process_*` entry points are thread-context
/// only and non-blocking; the platform calls them from its main loop, one
/// pass per scheduler tick.
pub struct Gateway<'a, C, L, T, X> {
    can: C,
    link: L,
    timer: T,
    exec: X,
    framer: Framer,
    parser: FrameParser<'a>,
    tx_queue: &'a CanTxQueue,
    health: HealthMonitor,
}

impl<'a, C, L, T, X> Gateway<'a, C, L, T, X>
where
    C: CanController,
    L: HostLink,
    T: TimestampSource,
    X: ExecutionContext,
{
    /// Assemble the engine around its collaborators and the two shared
    /// buffers (ingress consumer half, transmit queue).
    pub fn new(
        can: C,
        link: L,
        timer: T,
        exec: X,
        ingress: Consumer<'a, INGRESS_CAPACITY>,
        tx_queue: &'a CanTxQueue,
    ) -> Self {
        Self {
            can,
            link,
            timer,
            exec,
            framer: Framer::new(),
            parser: FrameParser::new(ingress),
            tx_queue,
            health: HealthMonitor::new(),
        }
    }

    /// Parse and dispatch every complete host frame in the ingress store.
    pub fn process_host(&mut self) {
        self.parser.process(
            &mut self.can,
            self.tx_queue,
            &mut self.framer,
            &mut self.link,
            &self.timer,
            &self.exec,
        );
    }

    /// Move at most one queued message into the hardware transmit FIFO.
    pub fn process_can_tx(&mut self) {
        drain_one(self.tx_queue, &mut self.can, &self.exec);
    }

    /// Relay every pending bus message upstream.
    pub fn process_can_rx(&mut self) {
        rx_relay::relay_pending(
            &mut self.can,
            &mut self.framer,
            &mut self.link,
            &self.timer,
            &self.exec,
        );
    }

    /// Poll bus health and report upstream on change.
    pub fn process_health(&mut self) {
        self.health.poll(
            &mut self.can,
            &mut self.framer,
            &mut self.link,
            &self.timer,
            &self.exec,
        );
    }

    /// One full scheduler tick: host frames, transmit drain, receive
    /// relay, health poll.
    pub fn poll(&mut self) {
        self.process_host();
        self.process_can_tx();
        self.process_can_rx();
        self.process_health();
    }

    /// Direct access to the CAN controller collaborator.
    pub fn can(&mut self) -> &mut C {
        &mut self.can
    }

    /// Direct access to the host link collaborator.
    pub fn link(&mut self) -> &mut L {
        &mut self.link
    }

    /// Cumulative bus statistics for diagnostics.
    pub fn stats(&self) -> CanStats {
        self.health.stats()
    }

    /// Clear the cumulative bus statistics.
    pub fn reset_stats(&mut self) {
        self.health.reset_stats();
    }
}
