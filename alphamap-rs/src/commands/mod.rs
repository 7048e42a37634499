//! Command implementations

pub mod extract;
