//! Ports layer for the Profile Store.

pub mod account;

pub use account::*;
