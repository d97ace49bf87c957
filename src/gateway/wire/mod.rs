//! Host-side wire protocol: frame layout constants and the `Framer` that
//! seals payloads into checksummed frames bound for the transport.
//!
//! Frame layout, all multi-byte fields little-endian:
//!
//! `TAG(1)=0xFF | LEN(2) | TIMESTAMP(4) | SEQ(2) | PAYLOAD(LEN-10) | CHECKSUM(1)`
//!
//! `LEN` counts the whole frame including overhead, and the sum of all `LEN`
//! bytes modulo 256 is zero.
use crate::gateway::traits::{host_link::HostLink, timestamp::TimestampSource};

//==================================================================================Constants

/// Start-of-frame sentinel.
pub const TAG_SOF: u8 = 0xFF;

/// Byte offset of the sentinel tag.
pub const TAG_OFFSET: usize = 0;
/// Byte offset of the 16-bit frame length.
pub const LEN_OFFSET: usize = 1;
/// Byte offset of the 32-bit timestamp.
pub const TIMESTAMP_OFFSET: usize = 3;
/// Byte offset of the 16-bit sequence counter.
pub const SEQ_OFFSET: usize = 7;
/// Byte offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = 9;

/// Header and checksum bytes wrapped around every payload.
pub const FRAME_OVERHEAD: usize = PAYLOAD_OFFSET + 1;
/// Smallest length value a frame header may carry.
pub const MIN_FRAME_LEN: usize = 4;

/// Capacity of the ingress byte store fed by the transport.
pub const INGRESS_CAPACITY: usize = 1024;

/// Largest payload the gateway ever emits: command byte, type byte,
/// 4-byte identifier, DLC byte, and a full 64-byte FD payload.
pub const MAX_PAYLOAD: usize = 71;
/// Largest frame the gateway ever emits.
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD + FRAME_OVERHEAD;

//==================================================================================Framer

/// Stateless frame transform plus the process-wide sequence counter.
///
/// One instance serializes every upstream producer (command replies, the
/// receive relay, the health monitor) so sequence numbers stay strictly
/// increasing across all of them.
pub struct Framer {
    sequence: u16,
}

impl Framer {
    /// Start the sequence counter at zero.
    pub const fn new() -> Self {
        Self { sequence: 0 }
    }

    /// Seal `payload` into a frame and hand it to the host link.
    ///
    /// The sequence counter advances on every call, wrapping silently at
    /// 65536. When the link lacks `LEN` bytes of free capacity the frame is
    /// dropped without notice: lossy degrade under backpressure is the
    /// protocol's policy, and there is no error channel to report it on.
    pub fn send<L, T>(&mut self, payload: &[u8], link: &mut L, timer: &T)
    where
        L: HostLink,
        T: TimestampSource,
    {
        debug_assert!(payload.len() <= MAX_PAYLOAD);

        let len = payload.len() + FRAME_OVERHEAD;
        let mut frame = [0u8; MAX_FRAME_LEN];

        frame[TAG_OFFSET] = TAG_SOF;
        frame[LEN_OFFSET..LEN_OFFSET + 2].copy_from_slice(&(len as u16).to_le_bytes());
        frame[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 4]
            .copy_from_slice(&timer.ticks().to_le_bytes());
        frame[SEQ_OFFSET..SEQ_OFFSET + 2].copy_from_slice(&self.sequence.to_le_bytes());
        frame[PAYLOAD_OFFSET..PAYLOAD_OFFSET + payload.len()].copy_from_slice(payload);
        frame[len - 1] = checksum(&frame[..len - 1]);

        self.sequence = self.sequence.wrapping_add(1);

        if link.free_capacity() >= len {
            link.write(&frame[..len]);
        }
    }

    /// Sequence number the next frame will carry.
    pub fn next_sequence(&self) -> u16 {
        self.sequence
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

/// Two's complement of the byte sum: appending it makes the whole frame
/// sum to zero modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
        .wrapping_neg()
}
