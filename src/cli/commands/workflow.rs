//! Workflow command implementation.
//!
//! List, view, activate and deactivate are handled here; pull and push have
//! their own modules.

use crate::api::{ListWorkflowsOptions, Workflow};
use crate::cli::args::{WorkflowCommands, WorkflowListArgs};
use crate::error::Result;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::pull::PullCommand;
use super::push::PushCommand;

/// The workflow command implementation.
pub struct WorkflowCommand {
    ctx: CommandContext,
    command: WorkflowCommands,
}

impl WorkflowCommand {
    pub fn new(ctx: CommandContext, command: WorkflowCommands) -> Self {
        Self { ctx, command }
    }

    fn list(&self, args: &WorkflowListArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (_, client) = self.ctx.connect()?;

        let active = match (args.active, args.inactive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let options = ListWorkflowsOptions {
            active,
            tags: args.tags.clone(),
            name: args.name.clone(),
            project_id: args.project_id.clone(),
            limit: args.limit,
            cursor: args.cursor.clone(),
        };

        let mut spinner = ui.start_spinner("Fetching workflows...");
        let page = match client.list_workflows(&options) {
            Ok(page) => {
                spinner.finish_clear();
                page
            }
            Err(e) => {
                spinner.finish_error("Could not list workflows");
                return Err(e);
            }
        };

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&page)?);
            return Ok(CommandResult::success());
        }

        if page.data.is_empty() {
            ui.message("No workflows found");
        } else {
            let mut table = Table::new(&["ID", "NAME", "ACTIVE", "UPDATED", "TAGS"]);
            for wf in &page.data {
                table.add_row(workflow_row(wf));
            }
            ui.data(&table.render());
        }

        if let Some(cursor) = &page.next_cursor {
            ui.message(&format!("More workflows available: --cursor {}", cursor));
        }

        Ok(CommandResult::success())
    }

    fn view(&self, id: &str, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        use crate::api::WorkflowApi;

        let (_, client) = self.ctx.connect()?;
        let workflow = client.get_workflow(id)?;
        ui.data(&serde_json::to_string_pretty(&workflow)?);
        Ok(CommandResult::success())
    }

    fn set_active(&self, id: &str, active: bool, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (_, client) = self.ctx.connect()?;
        let workflow = if active {
            client.activate_workflow(id)?
        } else {
            client.deactivate_workflow(id)?
        };

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&workflow)?);
        } else {
            let verb = if active { "Activated" } else { "Deactivated" };
            ui.success(&format!("{} workflow '{}' ({})", verb, workflow.name, id));
        }
        Ok(CommandResult::success())
    }
}

fn workflow_row(wf: &Workflow) -> [String; 5] {
    let updated = wf
        .updated_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let tags = wf
        .tags
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    [
        wf.id().unwrap_or_default().to_string(),
        wf.name.clone(),
        if wf.active { "yes" } else { "no" }.to_string(),
        updated,
        tags,
    ]
}

impl Command for WorkflowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.command {
            WorkflowCommands::List(args) => self.list(args, ui),
            WorkflowCommands::View(args) => self.view(&args.id, ui),
            WorkflowCommands::Activate(args) => self.set_active(&args.id, true, ui),
            WorkflowCommands::Deactivate(args) => self.set_active(&args.id, false, ui),
            WorkflowCommands::Pull(args) => {
                PullCommand::new(self.ctx.clone(), args.clone()).execute(ui)
            }
            WorkflowCommands::Push(args) => {
                PushCommand::new(self.ctx.clone(), args.clone()).execute(ui)
            }
        }
    }
}
