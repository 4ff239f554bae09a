//! Shared building blocks for the garden map workspace: logging setup,
//! runtime environment checks and small wire types used by several crates.

pub mod types;
pub mod utils;
pub mod env;
