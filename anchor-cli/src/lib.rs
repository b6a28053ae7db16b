//! anchor command line library
//!
//! The binary in `main.rs` is a thin wrapper; everything here is exported so
//! commands can be driven from tests.

pub mod commands;
pub mod config;
pub mod confirm;
pub mod context;
pub mod fetch;
pub mod storage;

pub use commands::{Cli, Command};
pub use config::Config;
pub use context::Context;
