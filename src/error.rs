//! Error definitions shared across library modules.
//! Wire-level noise (bad sentinel, bad length, bad checksum) never surfaces
//! here: the parser absorbs it through single-byte resynchronization. These
//! types cover the failures a command reports back through its 1-byte flag.
use thiserror_no_std::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that can occur while decoding and admitting a downstream
/// (host → bus) send request.
pub enum DownstreamError {
    /// The frame payload ends before the declared data bytes.
    #[error("Truncated request payload")]
    Truncated,
    /// The identifier does not fit the selected width (11 or 29 bits).
    #[error("Identifier out of range for selected width")]
    IdentifierOutOfRange,
    /// Bit-rate switching was requested on a classic CAN frame.
    #[error("Bit-rate switch is not supported on classic CAN")]
    BitRateSwitchOnClassic,
    /// Requested data length exceeds what the frame format allows.
    #[error("DLC {requested} exceeds maximum of {max}")]
    DlcTooLarge { requested: u8, max: u8 },
    /// The software transmit queue had no free slot.
    #[error("Transmit queue full")]
    QueueFull,
}
