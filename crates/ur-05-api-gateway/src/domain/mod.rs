//! # Domain Layer - API Gateway
//!
//! - `config`: listener, CORS and session settings
//! - `error`: ApiError and the status mapping of every subsystem error
//! - `password`: password strength policy
//! - `requests`: request and response bodies

pub mod config;
pub mod error;
pub mod password;
pub mod requests;

pub use config::*;
pub use error::*;
pub use password::*;
pub use requests::*;
