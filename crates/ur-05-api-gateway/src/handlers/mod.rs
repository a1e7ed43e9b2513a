//! Route handlers, one module per resource.

pub mod users;
pub mod votes;
