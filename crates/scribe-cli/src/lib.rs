//! Command-line front end for scribe.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the main.rs binary
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod handlers;
pub mod parser;

pub use commands::Commands;
pub use parser::Cli;
