//! # Domain Layer - Profile Reads
//!
//! - `pagination`: page clamping, offsets and the count policy
//! - `errors`: ReadError

pub mod errors;
pub mod pagination;

pub use errors::*;
pub use pagination::*;
