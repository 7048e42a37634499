//! Shared utilities for the alphamap-rs CLI

pub mod files;
pub mod progress;

pub use files::*;
pub use progress::*;
