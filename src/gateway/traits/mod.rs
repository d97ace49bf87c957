//! Abstraction traits used by the gateway (CAN controller, host link,
//! timestamp source, and execution context).
pub mod can_controller;
pub mod execution;
pub mod host_link;
pub mod timestamp;
