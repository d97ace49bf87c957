//! Timestamp abstraction backing the wire frame header.

/// Free-running 32-bit counter used to stamp outbound frames.
/// Resolution and units are the platform's choice; the gateway only assumes
/// monotonicity with silent wraparound.
pub trait TimestampSource {
    /// Read the current counter value.
    fn ticks(&self) -> u32;
}
