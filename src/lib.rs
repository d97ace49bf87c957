//! `canbridge` library: protocol engine bridging a host-facing byte-stream
//! transport (USB serial) to a CAN-FD bus in a `no_std` environment. The crate
//! exposes the infrastructure modules (SPSC ingress ring) and the gateway
//! logic (wire framing, command codecs, frame dispatch, transmit queue,
//! receive relay, and bus health monitoring).
#![no_std]
//==================================================================================
/// Domain errors (downstream request decoding, queue admission, and related issues).
pub mod error;
/// Gateway protocol implementation: wire framing, command dispatch,
/// CAN transmit/receive paths, and health monitoring.
pub mod gateway;
/// Low-level plumbing shared by the gateway: the SPSC ingress byte ring.
pub mod infra;
//==================================================================================
