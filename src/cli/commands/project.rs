//! Project command implementation.

use crate::cli::args::{PageArgs, ProjectCommands};
use crate::error::Result;
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The project command implementation.
pub struct ProjectCommand {
    ctx: CommandContext,
    command: ProjectCommands,
}

impl ProjectCommand {
    pub fn new(ctx: CommandContext, command: ProjectCommands) -> Self {
        Self { ctx, command }
    }

    fn list(&self, args: &PageArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (_, client) = self.ctx.connect()?;

        let mut spinner = ui.start_spinner("Fetching projects...");
        let page = match client.list_projects(Some(args.limit), args.cursor.as_deref()) {
            Ok(page) => {
                spinner.finish_clear();
                page
            }
            Err(e) => {
                spinner.finish_error("Could not list projects");
                return Err(e);
            }
        };

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&page)?);
            return Ok(CommandResult::success());
        }

        if page.data.is_empty() {
            ui.message("No projects found");
        } else {
            let mut table = Table::new(&["ID", "TYPE", "NAME"]);
            for project in &page.data {
                table.add_row([
                    project.id.clone(),
                    project.kind.clone(),
                    project.name.clone(),
                ]);
            }
            ui.data(&table.render());
        }

        if let Some(cursor) = &page.next_cursor {
            ui.message(&format!("More projects available: --cursor {}", cursor));
        }

        Ok(CommandResult::success())
    }
}

impl Command for ProjectCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.command {
            ProjectCommands::List(args) => self.list(args, ui),
        }
    }
}
