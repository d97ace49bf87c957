//! Frame parser and command dispatcher.
//!
//! Scans the ingress ring for checksummed frames, resynchronizing byte by
//! byte over transport noise, and executes the command each valid frame
//! carries. Corrupt or misaligned input is absorbed silently; command-level
//! failures surface only as the 1-byte error flag in that command's reply.
use crate::error::DownstreamError;
use crate::gateway::command::{
    self, CMD_CAN_START, CMD_CAN_STOP, CMD_GET_DEVICE_ID, CMD_SEND_DOWNSTREAM, DEVICE_ID,
};
use crate::gateway::traits::{
    can_controller::CanController,
    execution::{assert_thread_context, ExecutionContext},
    host_link::HostLink,
    timestamp::TimestampSource,
};
use crate::gateway::tx_queue::CanTxQueue;
use crate::gateway::wire::{
    Framer, FRAME_OVERHEAD, INGRESS_CAPACITY, MAX_PAYLOAD, MIN_FRAME_LEN, PAYLOAD_OFFSET, TAG_SOF,
};
use crate::infra::spsc::Consumer;

//==================================================================================FrameParser

/// Cooperative frame scanner over the ingress byte store.
///
/// `process` is re-entered on every poll; when input runs dry mid-frame it
/// simply returns and resumes from the same read position next time.
pub struct FrameParser<'a> {
    ingress: Consumer<'a, INGRESS_CAPACITY>,
}

impl<'a> FrameParser<'a> {
    /// Wrap the consumer half of the ingress ring.
    pub fn new(ingress: Consumer<'a, INGRESS_CAPACITY>) -> Self {
        Self { ingress }
    }

    /// Extract and dispatch every complete frame currently in the ring.
    ///
    /// Thread context only. Resynchronization policy: any byte that does
    /// not open a checksum-valid frame advances the read cursor by exactly
    /// one — sentinel bytes are common inside payload data, so no larger
    /// skip is ever safe.
    pub fn process<C, L, T, X>(
        &mut self,
        can: &mut C,
        queue: &CanTxQueue,
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

        while let Some(tag) = self.ingress.peek(0) {
            if tag != TAG_SOF {
                self.ingress.release(1);
                continue;
            }

            // Tag plus the two length bytes must be readable before the
            // header can be judged.
            let available = self.ingress.len();
            if available < 3 {
                break;
            }

            let length = u16::from_le_bytes([
                self.ingress.peek(1).unwrap_or(0),
                self.ingress.peek(2).unwrap_or(0),
            ]) as usize;

            // A length outside the frame contract means the sentinel was
            // spurious payload data; skip it and keep scanning.
            if length < MIN_FRAME_LEN || length > INGRESS_CAPACITY - 1 {
                self.ingress.release(1);
                continue;
            }

            if available < length {
                break;
            }

            let mut sum = 0u8;
            for offset in 0..length {
                sum = sum.wrapping_add(self.ingress.peek(offset).unwrap_or(0));
            }
            if sum != 0 {
                self.ingress.release(1);
                continue;
            }

            self.dispatch(length, can, queue, framer, link, timer);
            self.ingress.release(length);
        }
    }

    /// Execute the command carried by the valid frame at the read cursor.
    fn dispatch<C, L, T>(
        &mut self,
        length: usize,
        can: &mut C,
        queue: &CanTxQueue,
        framer: &mut Framer,
        link: &mut L,
        timer: &T,
    ) where
        C: CanController,
        L: HostLink,
        T: TimestampSource,
    {
        // Degenerate frames (4..=10 bytes) checksum correctly but carry no
        // command byte; consume them without dispatching.
        if length <= PAYLOAD_OFFSET + 1 {
            return;
        }

        let cmd = self.ingress.peek(PAYLOAD_OFFSET).unwrap_or(0);
        match cmd {
            CMD_GET_DEVICE_ID => {
                framer.send(&[CMD_GET_DEVICE_ID, DEVICE_ID], link, timer);
            }

            CMD_CAN_START => {
                let failed = can.start().is_err();
                #[cfg(feature = "defmt")]
                defmt::info!("CAN start requested, failed={}", failed);
                framer.send(&[CMD_CAN_START, failed as u8], link, timer);
            }

            CMD_CAN_STOP => {
                let failed = can.stop().is_err();
                #[cfg(feature = "defmt")]
                defmt::info!("CAN stop requested, failed={}", failed);
                framer.send(&[CMD_CAN_STOP, failed as u8], link, timer);
            }

            CMD_SEND_DOWNSTREAM => {
                let failed = self.handle_downstream(length, queue).is_err();
                framer.send(&[CMD_SEND_DOWNSTREAM, failed as u8], link, timer);
            }

            // Unknown command: the frame was well-formed, so it is consumed
            // whole, but it triggers no reply.
            _ => {}
        }
    }

    /// Decode the downstream request body and admit it to the queue.
    fn handle_downstream(
        &mut self,
        length: usize,
        queue: &CanTxQueue,
    ) -> Result<(), DownstreamError> {
        // Body bytes follow the command byte; anything past what the
        // largest legal request needs is ignored.
        let body_len = (length - FRAME_OVERHEAD - 1).min(MAX_PAYLOAD - 1);
        let mut body = [0u8; MAX_PAYLOAD - 1];
        for (index, slot) in body.iter_mut().enumerate().take(body_len) {
            *slot = self.ingress.peek(PAYLOAD_OFFSET + 1 + index).unwrap_or(0);
        }

        let message = command::decode_downstream(&body[..body_len]).map_err(|error| {
            #[cfg(feature = "defmt")]
            defmt::warn!("downstream request rejected: {}", error);
            error
        })?;

        if queue.enqueue(&message) {
            Ok(())
        } else {
            Err(DownstreamError::QueueFull)
        }
    }
}
