//! Test doubles simulating the CAN controller, host link, timer, and
//! execution context during integration scenarios.
use canbridge::gateway::bus::{CanMessage, ErrorCounters, ProtocolStatus};
use canbridge::gateway::traits::{
    can_controller::CanController, execution::ExecutionContext, host_link::HostLink,
    timestamp::TimestampSource,
};
use canbridge::gateway::wire::{FRAME_OVERHEAD, TAG_SOF};
use std::collections::VecDeque;

/// In-memory CAN controller reproducing the `CanController` contract.
#[derive(Default)]
pub struct MockController {
    pub active: bool,
    pub tx_free: usize,
    pub submitted: Vec<CanMessage>,
    pub rx_fifo: VecDeque<CanMessage>,
    pub status: ProtocolStatus,
    pub counters: ErrorCounters,
    pub fail_start: bool,
}

#[allow(dead_code)]
impl MockController {
    /// Controller already on-bus with room in its hardware FIFO.
    pub fn active() -> Self {
        Self {
            active: true,
            tx_free: 3,
            ..Default::default()
        }
    }
}

impl CanController for MockController {
    type Error = ();

    fn start(&mut self) -> Result<(), ()> {
        if self.fail_start {
            return Err(());
        }
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ()> {
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn tx_free_level(&self) -> usize {
        self.tx_free
    }

    fn rx_fill_level(&self) -> usize {
        self.rx_fifo.len()
    }

    fn submit(&mut self, message: &CanMessage) -> Result<(), ()> {
        self.submitted.push(*message);
        Ok(())
    }

    fn receive(&mut self) -> Result<CanMessage, ()> {
        self.rx_fifo.pop_front().ok_or(())
    }

    fn protocol_status(&self) -> Result<ProtocolStatus, ()> {
        Ok(self.status)
    }

    fn error_counters(&self) -> Result<ErrorCounters, ()> {
        Ok(self.counters)
    }
}

/// Host link double capturing every outbound byte.
#[derive(Default)]
pub struct MockLink {
    pub written: Vec<u8>,
}

impl HostLink for MockLink {
    fn free_capacity(&self) -> usize {
        512 - self.written.len()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.written.extend_from_slice(bytes);
    }
}

/// Timer double returning a fixed tick value.
pub struct FixedTimer(pub u32);

impl TimestampSource for FixedTimer {
    fn ticks(&self) -> u32 {
        self.0
    }
}

/// The hosted test environment always runs in thread context.
pub struct ThreadExec;

impl ExecutionContext for ThreadExec {
    fn in_interrupt(&self) -> bool {
        false
    }
}

/// Encode a host-side wire frame around `payload`, the way the desktop
/// tooling would before writing it to the serial port.
#[allow(dead_code)]
pub fn host_frame(payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() + FRAME_OVERHEAD) as u16;
    let mut bytes = vec![TAG_SOF];
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(payload);
    let sum: u8 = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    bytes.push(sum.wrapping_neg());
    bytes
}

/// Split a captured byte run into wire frames and return the payloads,
/// checking framing invariants along the way.
#[allow(dead_code)]
pub fn split_payloads(mut bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut payloads = Vec::new();
    while !bytes.is_empty() {
        assert_eq!(bytes[0], TAG_SOF, "frame does not start with the tag");
        let len = u16::from_le_bytes([bytes[1], bytes[2]]) as usize;
        assert!(len >= FRAME_OVERHEAD && len <= bytes.len(), "bad length");
        let sum: u8 = bytes[..len].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        assert_eq!(sum, 0, "frame checksum does not close");
        payloads.push(bytes[9..len - 1].to_vec());
        bytes = &bytes[len..];
    }
    payloads
}
