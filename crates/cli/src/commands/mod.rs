//! Command implementations.

pub mod keys;
pub mod nodes;
pub mod session;
