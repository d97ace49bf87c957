//! In-memory representation of CAN-FD traffic and controller state as seen
//! by the gateway: pending messages, DLC code translation, and the
//! protocol-status/error-counter snapshots used by the health monitor.
use embedded_can::Id;

//==================================================================================Constants

/// Maximum CAN-FD payload in bytes.
pub const MAX_CAN_DATA: usize = 64;

/// Protocol status "last error code" value meaning no error occurred.
pub const LEC_NO_ERROR: u8 = 0;
/// Protocol status "last error code" value meaning no update since last read.
pub const LEC_NO_CHANGE: u8 = 7;

/// Payload byte counts of the hardware DLC codes above 8.
const FD_DLC_STEPS: [u8; 7] = [12, 16, 20, 24, 32, 48, 64];

//==================================================================================DlcCode

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw 4-bit data length code as the CAN-FD hardware encodes it:
/// 0–8 carry their own byte count, 9–15 select 12/16/20/24/32/48/64 bytes.
pub struct DlcCode(u8);

impl DlcCode {
    /// Wrap a code read back from the peripheral. Values outside the 4-bit
    /// range are kept as-is and decode to zero bytes.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Code for a classic CAN frame. Classic frames carry at most 8 bytes
    /// and never round.
    pub fn for_classic_len(len: u8) -> Option<Self> {
        if len <= 8 {
            Some(Self(len))
        } else {
            None
        }
    }

    /// Code for a CAN-FD frame, rounding the requested length up to the
    /// nearest size the hardware supports. Lengths above 64 are rejected.
    pub fn for_fd_len(len: u8) -> Option<Self> {
        if len <= 8 {
            return Some(Self(len));
        }
        FD_DLC_STEPS
            .iter()
            .position(|&step| len <= step)
            .map(|index| Self(9 + index as u8))
    }

    /// The raw hardware encoding.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Number of payload bytes this code stands for.
    /// Unrecognized codes map to zero.
    pub const fn byte_count(self) -> u8 {
        match self.0 {
            0..=8 => self.0,
            9..=15 => FD_DLC_STEPS[(self.0 - 9) as usize],
            _ => 0,
        }
    }
}

//==================================================================================CanMessage

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Frame format selector for a pending message.
pub enum FrameFormat {
    /// Classic CAN 2.0 data frame.
    Classic,
    /// CAN-FD data frame.
    Fd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One CAN data frame, in either direction.
///
/// Entries of the transmit queue are copied by value in and out; the slot
/// owns its copy exclusively between enqueue and dequeue.
pub struct CanMessage {
    /// Target identifier, 11- or 29-bit.
    pub id: Id,
    /// Classic or FD framing.
    pub format: FrameFormat,
    /// Bit-rate switch for the data phase. Always off on classic frames.
    pub bit_rate_switch: bool,
    /// Hardware data length code.
    pub dlc: DlcCode,
    /// Payload buffer; only `dlc.byte_count()` leading bytes are valid.
    pub data: [u8; MAX_CAN_DATA],
}

impl CanMessage {
    /// Raw 32-bit identifier value, independent of width.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }
}

//==================================================================================Controller state

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Snapshot of the controller's protocol status register.
pub struct ProtocolStatus {
    /// Last error code observed during the arbitration phase.
    pub last_error_code: u8,
    /// Last error code observed during the data phase.
    pub data_last_error_code: u8,
    /// Bus activity state as the controller reports it.
    pub activity: u8,
    /// Controller is in the error-passive state.
    pub error_passive: bool,
    /// At least one error counter crossed the warning limit.
    pub warning: bool,
    /// Controller is bus-off.
    pub bus_off: bool,
    /// Last received FD frame had its error state indicator set.
    pub rx_esi: bool,
    /// Last received FD frame used bit-rate switching.
    pub rx_brs: bool,
    /// Last received frame was an FD frame.
    pub rx_fdf: bool,
    /// A protocol exception event occurred.
    pub protocol_exception: bool,
    /// Current transceiver delay compensation value.
    pub tdc_value: u8,
}

impl ProtocolStatus {
    /// Pack the boolean flags into the status report layout:
    /// bit0 error-passive, bit1 warning, bit2 bus-off, bit3 RxESI,
    /// bit4 RxBRS, bit5 RxFDF, bit6 protocol-exception.
    pub fn flags_byte(&self) -> u8 {
        let mut flags = 0;
        if self.error_passive {
            flags |= 0x01;
        }
        if self.warning {
            flags |= 0x02;
        }
        if self.bus_off {
            flags |= 0x04;
        }
        if self.rx_esi {
            flags |= 0x08;
        }
        if self.rx_brs {
            flags |= 0x10;
        }
        if self.rx_fdf {
            flags |= 0x20;
        }
        if self.protocol_exception {
            flags |= 0x40;
        }
        flags
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Snapshot of the controller's error counter register.
pub struct ErrorCounters {
    /// Transmit error counter.
    pub tx_err_count: u8,
    /// Receive error counter.
    pub rx_err_count: u8,
    /// Receive counter has crossed the error-passive threshold.
    pub rx_error_passive: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Cumulative statistics maintained by the health monitor, readable and
/// resettable by a diagnostics collaborator.
pub struct CanStats {
    /// Most recent receive error counter value.
    pub rx_err_count: u8,
    /// Most recent transmit error counter value.
    pub tx_err_count: u8,
    /// Running maximum of the receive error counter.
    pub rx_err_max: u8,
    /// Running maximum of the transmit error counter.
    pub tx_err_max: u8,
    /// Number of 0→1 transitions of the receive error-passive bit.
    pub passive_err_count: u32,
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
