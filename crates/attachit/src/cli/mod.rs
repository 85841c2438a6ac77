//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the attachit binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands, StyleArg};
pub use handlers::{handle_keys, handle_purge, handle_read, handle_store};
