//! Infrastructure components independent of the gateway protocol itself.
pub mod spsc;
