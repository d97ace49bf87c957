//! Outbound byte transport toward the host (typically a USB CDC TX ring).

/// Contract for writing complete wire frames upstream.
///
/// The gateway is best-effort by design: it queries `free_capacity` first
/// and drops the whole frame when the link cannot take it, so `write` is
/// never handed more bytes than the link just advertised.
pub trait HostLink {
    /// Bytes the link can currently accept without blocking.
    fn free_capacity(&self) -> usize;
    /// Queue `bytes` for transmission to the host.
    fn write(&mut self, bytes: &[u8]);
}
