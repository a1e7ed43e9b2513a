//! # Authentication
//!
//! - `session`: signed, expiring session tokens
//! - `hasher`: credential hashing port and its HMAC-SHA256 implementation
//! - `extractor`: `AuthenticatedUser`, resolved from the bearer token on
//!   every protected request

pub mod extractor;
pub mod hasher;
pub mod session;

pub use extractor::AuthenticatedUser;
pub use hasher::{CredentialHasher, HashError, HmacHasher};
pub use session::{Claims, IssuedSession, SessionError, SessionKeys};
