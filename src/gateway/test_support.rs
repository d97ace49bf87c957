//! Test doubles for the gateway's collaborator traits, shared by the
//! per-module test suites.
use crate::gateway::bus::{CanMessage, DlcCode, ErrorCounters, FrameFormat, ProtocolStatus};
use crate::gateway::traits::{
    can_controller::CanController, execution::ExecutionContext, host_link::HostLink,
    timestamp::TimestampSource,
};
use embedded_can::{Id, StandardId};
use heapless::{Deque, Vec};

/// In-memory CAN controller reproducing the `CanController` contract.
pub struct MockController {
    pub active: bool,
    pub tx_free: usize,
    pub submitted: Vec<CanMessage, 16>,
    pub rx_fifo: Deque<CanMessage, 16>,
    pub status: ProtocolStatus,
    pub counters: ErrorCounters,
    pub fail_start: bool,
    pub fail_stop: bool,
    pub fail_receive: bool,
    pub fail_status: bool,
    pub fail_counters: bool,
}

impl MockController {
    pub fn new() -> Self {
        Self {
            active: false,
            tx_free: 3,
            submitted: Vec::new(),
            rx_fifo: Deque::new(),
            status: ProtocolStatus::default(),
            counters: ErrorCounters::default(),
            fail_start: false,
            fail_stop: false,
            fail_receive: false,
            fail_status: false,
            fail_counters: false,
        }
    }

    /// Controller already on-bus, the common starting point.
    pub fn active() -> Self {
        let mut controller = Self::new();
        controller.active = true;
        controller
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
        if self.fail_stop {
            return Err(());
        }
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
        self.submitted.push(*message).map_err(|_| ())
    }

    fn receive(&mut self) -> Result<CanMessage, ()> {
        if self.fail_receive {
            return Err(());
        }
        self.rx_fifo.pop_front().ok_or(())
    }

    fn protocol_status(&self) -> Result<ProtocolStatus, ()> {
        if self.fail_status {
            return Err(());
        }
        Ok(self.status)
    }

    fn error_counters(&self) -> Result<ErrorCounters, ()> {
        if self.fail_counters {
            return Err(());
        }
        Ok(self.counters)
    }
}

/// Host link double capturing outbound frames.
pub struct MockLink {
    pub written: Vec<u8, 1024>,
    pub capacity: usize,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            capacity: 1024,
        }
    }

    /// Split the captured byte run back into wire frames, returning each
    /// frame's payload.
    pub fn payloads(&self) -> frames::FrameList {
        frames::split_payloads(&self.written)
    }
}

impl HostLink for MockLink {
    fn free_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.written.len())
    }

    fn write(&mut self, bytes: &[u8]) {
        self.written.extend_from_slice(bytes).unwrap();
    }
}

/// Timer double returning a fixed tick value.
pub struct FixedTimer(pub u32);

impl TimestampSource for FixedTimer {
    fn ticks(&self) -> u32 {
        self.0
    }
}

/// Execution context double; tests flip the flag to simulate an ISR caller.
pub struct MockExec {
    pub interrupt: bool,
}

impl MockExec {
    pub fn thread() -> Self {
        Self { interrupt: false }
    }
}

impl ExecutionContext for MockExec {
    fn in_interrupt(&self) -> bool {
        self.interrupt
    }
}

/// Build a standard-id classic message with ascending payload bytes.
pub fn classic_message(raw_id: u16, len: u8) -> CanMessage {
    let mut data = [0u8; 64];
    for (index, byte) in data.iter_mut().enumerate().take(len as usize) {
        *byte = index as u8;
    }
    CanMessage {
        id: Id::Standard(StandardId::new(raw_id).unwrap()),
        format: FrameFormat::Classic,
        bit_rate_switch: false,
        dlc: DlcCode::for_classic_len(len).unwrap(),
        data,
    }
}

/// Frame splitting helpers for assertions over captured link bytes.
pub mod frames {
    use crate::gateway::wire::{FRAME_OVERHEAD, LEN_OFFSET, PAYLOAD_OFFSET, TAG_SOF};
    use heapless::Vec;

    pub type FrameList = Vec<Vec<u8, 80>, 8>;

    /// Walk a captured byte run frame by frame and collect the payloads.
    /// Panics on malformed framing: the gateway must never emit it.
    pub fn split_payloads(mut bytes: &[u8]) -> FrameList {
        let mut frames = FrameList::new();
        while !bytes.is_empty() {
            assert_eq!(bytes[0], TAG_SOF, "frame does not start with the tag");
            let len = u16::from_le_bytes([bytes[LEN_OFFSET], bytes[LEN_OFFSET + 1]]) as usize;
            assert!(len >= FRAME_OVERHEAD && len <= bytes.len(), "bad length");
            let sum: u8 = bytes[..len].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
            assert_eq!(sum, 0, "frame checksum does not close");

            let mut payload = Vec::new();
            payload
                .extend_from_slice(&bytes[PAYLOAD_OFFSET..len - 1])
                .unwrap();
            frames.push(payload).unwrap();
            bytes = &bytes[len..];
        }
        frames
    }
}
