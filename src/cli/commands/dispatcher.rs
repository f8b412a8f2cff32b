//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the global flags every command sees
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::api::ApiClient;
use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigStore, Instance};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Global settings shared by all commands.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub store: ConfigStore,
    /// `--instance` override.
    pub instance: Option<String>,
    /// `--json` output.
    pub json: bool,
}

impl CommandContext {
    pub fn new(store: ConfigStore, instance: Option<String>, json: bool) -> Self {
        Self {
            store,
            instance,
            json,
        }
    }

    /// Resolve the active instance and build a client for it.
    pub fn connect(&self) -> Result<(Instance, ApiClient)> {
        let config = self.store.load()?;
        let instance = config.resolve_instance(self.instance.as_deref())?.clone();
        tracing::debug!(instance = %instance.name, url = %instance.url, "using instance");

        let client = ApiClient::new(&instance.url, instance.api_key.clone())?;
        Ok((instance, client))
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a dispatcher from the parsed global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let store = ConfigStore::resolve(cli.config.as_deref())?;
        Ok(Self::new(CommandContext::new(
            store,
            cli.instance.clone(),
            cli.json,
        )))
    }

    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, command: &Commands, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.clone();
        match command {
            Commands::Config(args) => {
                super::config::ConfigCommand::new(ctx, args.command.clone()).execute(ui)
            }
            Commands::Workflow(args) => {
                super::workflow::WorkflowCommand::new(ctx, args.command.clone()).execute(ui)
            }
            Commands::Variable(args) => {
                super::variable::VariableCommand::new(ctx, args.command.clone()).execute(ui)
            }
            Commands::Project(args) => {
                super::project::ProjectCommand::new(ctx, args.command.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
