//! Command-line interface for n8nctl.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, ConfigArgs, ConfigCommands, ProjectArgs, ProjectCommands,
    PullArgs, PushArgs, VariableArgs, VariableCommands, WorkflowArgs, WorkflowCommands,
};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
