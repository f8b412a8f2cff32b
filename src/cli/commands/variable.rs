//! Variable command implementation.
//!
//! Variables are addressed by key on the command line. The public API only
//! takes ids for update and delete, so those look the key up first.

use crate::api::{ApiClient, Variable};
use crate::cli::args::{PageArgs, VariableCommands, VariableDeleteArgs, VariableSetArgs};
use crate::error::{Result, SyncError};
use crate::ui::{Prompt, Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Values longer than this are cut in the list table.
const MAX_VALUE_WIDTH: usize = 50;

/// The variable command implementation.
pub struct VariableCommand {
    ctx: CommandContext,
    command: VariableCommands,
}

impl VariableCommand {
    pub fn new(ctx: CommandContext, command: VariableCommands) -> Self {
        Self { ctx, command }
    }

    fn list(&self, args: &PageArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (_, client) = self.ctx.connect()?;

        let mut spinner = ui.start_spinner("Fetching variables...");
        let page = match client.list_variables(Some(args.limit), args.cursor.as_deref()) {
            Ok(page) => {
                spinner.finish_clear();
                page
            }
            Err(e) => {
                spinner.finish_error("Could not list variables");
                return Err(e);
            }
        };

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&page)?);
            return Ok(CommandResult::success());
        }

        if page.data.is_empty() {
            ui.message("No variables found");
        } else {
            let mut table = Table::new(&["ID", "KEY", "VALUE"]);
            for var in &page.data {
                table.add_row([
                    var.id.clone().unwrap_or_default(),
                    var.key.clone(),
                    truncate_value(&var.value),
                ]);
            }
            ui.data(&table.render());
        }

        if let Some(cursor) = &page.next_cursor {
            ui.message(&format!("More variables available: --cursor {}", cursor));
        }

        Ok(CommandResult::success())
    }

    fn get(&self, key: &str, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (_, client) = self.ctx.connect()?;
        let var = lookup(&client, key)?;

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&var)?);
        } else {
            ui.data(&var.value);
        }
        Ok(CommandResult::success())
    }

    fn create(&self, args: &VariableSetArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let value = required_value(args)?;
        let (_, client) = self.ctx.connect()?;

        client.create_variable(&args.key, value)?;
        self.report(ui, "Created", &args.key, None, value)
    }

    fn update(&self, args: &VariableSetArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let value = required_value(args)?;
        let (_, client) = self.ctx.connect()?;

        let id = lookup_id(&client, &args.key)?;
        client.update_variable(&id, &args.key, value)?;
        self.report(ui, "Updated", &args.key, Some(id), value)
    }

    fn delete(&self, args: &VariableDeleteArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (_, client) = self.ctx.connect()?;
        let id = lookup_id(&client, &args.key)?;

        if !args.yes && ui.is_interactive() {
            let question = format!("Delete variable '{}'?", args.key);
            let confirmed = ui
                .prompt(&Prompt::confirm("delete", &question, false))?
                .as_bool()
                .unwrap_or(false);
            if !confirmed {
                ui.message("Cancelled");
                return Ok(CommandResult::failure(1));
            }
        }

        client.delete_variable(&id)?;
        ui.success(&format!("Deleted variable '{}'", args.key));
        Ok(CommandResult::success())
    }

    fn report(
        &self,
        ui: &mut dyn UserInterface,
        verb: &str,
        key: &str,
        id: Option<String>,
        value: &str,
    ) -> Result<CommandResult> {
        if self.ctx.json {
            let var = Variable {
                id,
                key: key.to_string(),
                value: value.to_string(),
                kind: None,
            };
            ui.data(&serde_json::to_string_pretty(&var)?);
        } else {
            ui.success(&format!("{} variable '{}'", verb, key));
        }
        Ok(CommandResult::success())
    }
}

fn required_value(args: &VariableSetArgs) -> Result<&str> {
    args.value().ok_or_else(|| SyncError::MissingVariableValue {
        key: args.key.clone(),
    })
}

fn lookup(client: &ApiClient, key: &str) -> Result<Variable> {
    client
        .find_variable(key)?
        .ok_or_else(|| SyncError::VariableNotFound {
            key: key.to_string(),
        })
}

/// Resolve a key to the id the write endpoints need.
fn lookup_id(client: &ApiClient, key: &str) -> Result<String> {
    lookup(client, key)?
        .id
        .ok_or_else(|| SyncError::VariableNotFound {
            key: key.to_string(),
        })
}

fn truncate_value(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_WIDTH {
        return value.to_string();
    }
    let head: String = value.chars().take(MAX_VALUE_WIDTH - 3).collect();
    format!("{}...", head)
}

impl Command for VariableCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.command {
            VariableCommands::List(args) => self.list(args, ui),
            VariableCommands::Get(args) => self.get(&args.key, ui),
            VariableCommands::Create(args) => self.create(args, ui),
            VariableCommands::Update(args) => self.update(args, ui),
            VariableCommands::Delete(args) => self.delete(args, ui),
        }
    }
}
