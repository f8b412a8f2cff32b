//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with nested subcommands (`n8nctl workflow pull`)
//! - Shared config and instance resolution through [`CommandContext`]
//! - Consistent global flag handling

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod project;
pub mod pull;
pub mod push;
pub mod variable;
pub mod workflow;

#[cfg(test)]
pub mod testing;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
