//! Ports layer for profile reads.

pub mod outbound;

pub use outbound::*;
