//! # Shared Types Crate
//!
//! This crate contains the domain entities every subsystem speaks in:
//! profiles, votes, rating categories and paginated results, plus the
//! common store error and the clock port.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **No Credentials in Views**: `Profile` never carries a credential hash;
//!   hashes only travel in `NewProfile` and through the account store port.
//! - **Typed Identifiers**: Profiles are addressed by `ProfileId`, never by a
//!   bare `Uuid` or string.

pub mod clock;
pub mod entities;
pub mod errors;

pub use clock::*;
pub use entities::*;
pub use errors::*;
