//! Ports layer for the Rating subsystem.
//!
//! - `inbound`: what the engine offers (`RatingApi`)
//! - `outbound`: what it needs from a vote store (`VoteLedger`)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
