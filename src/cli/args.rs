//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// n8nctl - Pull and push n8n workflows together with their sub-workflows.
#[derive(Debug, Parser)]
#[command(name = "n8nctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (default ~/.config/n8n-cli/config.json)
    #[arg(short, long, global = true, env = "N8NCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Instance to use instead of the current one
    #[arg(short, long, global = true, env = "N8NCTL_INSTANCE")]
    pub instance: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage configured n8n instances
    Config(ConfigArgs),

    /// List, view, pull and push workflows
    #[command(visible_alias = "wf")]
    Workflow(WorkflowArgs),

    /// Manage instance variables
    #[command(visible_alias = "var")]
    Variable(VariableArgs),

    /// List projects
    Project(ProjectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// `config` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommands {
    /// Add an instance (prompts for missing values)
    Init(ConfigInitArgs),

    /// List configured instances
    List,

    /// Make an instance the current one
    Use(ConfigUseArgs),

    /// Remove an instance
    Remove(ConfigRemoveArgs),
}

/// Arguments for `config init`.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigInitArgs {
    /// Instance name
    #[arg(long)]
    pub name: Option<String>,

    /// Instance base URL, e.g. https://n8n.example.com
    #[arg(long)]
    pub url: Option<String>,

    /// API key created under Settings > n8n API
    #[arg(long)]
    pub api_key: Option<String>,

    /// Make this the current instance
    #[arg(long)]
    pub default: bool,
}

/// Arguments for `config use`.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigUseArgs {
    /// Instance name (prompts when omitted)
    pub name: Option<String>,
}

/// Arguments for `config remove`.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigRemoveArgs {
    /// Instance name
    pub name: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `workflow` command.
#[derive(Debug, Clone, Args)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommands,
}

/// `workflow` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum WorkflowCommands {
    /// List workflows (one page)
    List(WorkflowListArgs),

    /// Print a workflow as JSON
    View(WorkflowIdArgs),

    /// Download a workflow, optionally with every sub-workflow it calls
    Pull(PullArgs),

    /// Upload a workflow file or a pulled directory
    Push(PushArgs),

    /// Activate a workflow
    Activate(WorkflowIdArgs),

    /// Deactivate a workflow
    Deactivate(WorkflowIdArgs),
}

/// Arguments for `workflow list`.
#[derive(Debug, Clone, Default, Args)]
pub struct WorkflowListArgs {
    /// Only active workflows
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,

    /// Only inactive workflows
    #[arg(long)]
    pub inactive: bool,

    /// Only workflows with this tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Only workflows with this name
    #[arg(long)]
    pub name: Option<String>,

    /// Only workflows in this project
    #[arg(long)]
    pub project_id: Option<String>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,
}

/// A single workflow id.
#[derive(Debug, Clone, Default, Args)]
pub struct WorkflowIdArgs {
    /// Workflow ID
    pub id: String,
}

/// Arguments for `workflow pull`.
#[derive(Debug, Clone, Args)]
pub struct PullArgs {
    /// Workflow ID
    pub id: String,

    /// Also pull every referenced sub-workflow and write a manifest
    #[arg(short, long)]
    pub recursive: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `workflow push`.
#[derive(Debug, Clone, Args)]
pub struct PushArgs {
    /// Workflow JSON file, or a directory containing manifest.json
    pub path: PathBuf,

    /// Create new workflows instead of updating the originals
    #[arg(long)]
    pub create: bool,

    /// Push the rest when workflows reference each other in a cycle
    #[arg(long)]
    pub skip_cyclic: bool,
}

/// Arguments for the `variable` command.
#[derive(Debug, Clone, Args)]
pub struct VariableArgs {
    #[command(subcommand)]
    pub command: VariableCommands,
}

/// `variable` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum VariableCommands {
    /// List variables (one page)
    List(PageArgs),

    /// Print the value of a variable
    Get(VariableKeyArgs),

    /// Create a variable
    Create(VariableSetArgs),

    /// Change the value of a variable
    Update(VariableSetArgs),

    /// Delete a variable
    Delete(VariableDeleteArgs),
}

/// Page size and cursor for single-page listings.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page size
    #[arg(long, default_value_t = 100)]
    pub limit: u32,

    /// Cursor from a previous page
    #[arg(long)]
    pub cursor: Option<String>,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            limit: 100,
            cursor: None,
        }
    }
}

/// A single variable key.
#[derive(Debug, Clone, Default, Args)]
pub struct VariableKeyArgs {
    /// Variable key
    pub key: String,
}

/// Arguments for `variable create` and `variable update`.
#[derive(Debug, Clone, Default, Args)]
pub struct VariableSetArgs {
    /// Variable key
    pub key: String,

    /// Variable value
    pub value: Option<String>,

    /// Variable value, for values that look like flags
    #[arg(long = "value", id = "value_flag", value_name = "VALUE", conflicts_with = "value")]
    pub value_flag: Option<String>,
}

impl VariableSetArgs {
    /// The value from either the positional argument or `--value`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().or(self.value_flag.as_deref())
    }
}

/// Arguments for `variable delete`.
#[derive(Debug, Clone, Default, Args)]
pub struct VariableDeleteArgs {
    /// Variable key
    pub key: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `project` command.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommands,
}

/// `project` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommands {
    /// List projects (one page)
    List(PageArgs),
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
