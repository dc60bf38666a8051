//! CLI command implementations.

pub mod digest;
pub mod serve;
