//! Ports layer for the Cache subsystem.
//!
//! Only an outbound (driven) port exists: the raw key/value backend.

pub mod outbound;

pub use outbound::*;
