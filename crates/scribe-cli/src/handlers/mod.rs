//! Command handlers.

pub mod mcp;
pub mod serve;
