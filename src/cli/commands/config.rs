//! Config command implementation.
//!
//! `n8nctl config init|list|use|remove` manage the configured instances.

use serde_json::json;

use crate::cli::args::{ConfigCommands, ConfigInitArgs, ConfigRemoveArgs, ConfigUseArgs};
use crate::config::{CliConfig, Instance};
use crate::error::{Result, SyncError};
use crate::ui::{Prompt, PromptOption, PromptType, Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    ctx: CommandContext,
    command: ConfigCommands,
}

impl ConfigCommand {
    pub fn new(ctx: CommandContext, command: ConfigCommands) -> Self {
        Self { ctx, command }
    }

    fn init(&self, args: &ConfigInitArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.ctx.store.load_or_default()?;

        let name = match &args.name {
            Some(name) => name.clone(),
            None => ui
                .prompt(&Prompt::input("name", "Instance name").with_default("default"))?
                .as_string(),
        };
        let url = match &args.url {
            Some(url) => url.clone(),
            None => ui
                .prompt(&Prompt::input("url", "Instance URL (e.g. https://n8n.example.com)"))?
                .as_string(),
        };
        let api_key = match &args.api_key {
            Some(key) => key.clone(),
            None => ui.prompt(&Prompt::password("api_key", "API key"))?.as_string(),
        };

        let instance = Instance::new(name, url, api_key)?;
        let name = instance.name.clone();
        let replaced = config.instances.contains_key(&name);
        config.add_instance(instance, args.default);
        self.ctx.store.save(&config)?;

        let verb = if replaced { "Updated" } else { "Added" };
        ui.success(&format!(
            "{} instance '{}' in {}",
            verb,
            name,
            self.ctx.store.path().display()
        ));
        if config.is_current(&name) {
            ui.message(&format!("'{}' is the current instance", name));
        }

        Ok(CommandResult::success())
    }

    fn list(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.ctx.store.load_or_default()?;

        if self.ctx.json {
            // API keys never leave the config file
            let instances: Vec<_> = config
                .instances
                .values()
                .map(|inst| {
                    json!({
                        "name": inst.name,
                        "url": inst.url,
                        "current": config.is_current(&inst.name),
                    })
                })
                .collect();
            ui.data(&serde_json::to_string_pretty(&instances)?);
            return Ok(CommandResult::success());
        }

        if config.instances.is_empty() {
            ui.message("No instances configured. Run 'n8nctl config init' to add one.");
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(&["", "NAME", "URL", "API KEY"]);
        for inst in config.instances.values() {
            let marker = if config.is_current(&inst.name) { "*" } else { "" };
            table.add_row([
                marker.to_string(),
                inst.name.clone(),
                inst.url.clone(),
                inst.masked_api_key(),
            ]);
        }
        ui.data(&table.render());

        Ok(CommandResult::success())
    }

    fn use_instance(&self, args: &ConfigUseArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.ctx.store.load()?;

        let name = match &args.name {
            Some(name) => name.clone(),
            None => select_instance(&config, ui)?,
        };

        config.use_instance(&name)?;
        self.ctx.store.save(&config)?;
        ui.success(&format!("Now using instance '{}'", name));

        Ok(CommandResult::success())
    }

    fn remove(&self, args: &ConfigRemoveArgs, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = self.ctx.store.load()?;
        if !config.instances.contains_key(&args.name) {
            return Err(SyncError::UnknownInstance {
                name: args.name.clone(),
            });
        }

        if !args.yes && ui.is_interactive() {
            let question = format!("Remove instance '{}'?", args.name);
            let confirmed = ui
                .prompt(&Prompt::confirm("remove", &question, false))?
                .as_bool()
                .unwrap_or(false);
            if !confirmed {
                ui.message("Cancelled");
                return Ok(CommandResult::failure(1));
            }
        }

        config.remove_instance(&args.name)?;
        self.ctx.store.save(&config)?;
        ui.success(&format!("Removed instance '{}'", args.name));
        match &config.current_instance {
            Some(current) => ui.message(&format!("Current instance: '{}'", current)),
            None => ui.message("No instances left. Run 'n8nctl config init' to add one."),
        }

        Ok(CommandResult::success())
    }
}

fn select_instance(config: &CliConfig, ui: &mut dyn UserInterface) -> Result<String> {
    if config.instances.is_empty() {
        return Err(SyncError::NoInstanceSelected);
    }

    let options = config
        .instances
        .values()
        .map(|inst| PromptOption {
            label: format!("{} ({})", inst.name, inst.url),
            value: inst.name.clone(),
        })
        .collect();
    let prompt = Prompt {
        key: "instance".to_string(),
        question: "Instance".to_string(),
        prompt_type: PromptType::Select { options },
        default: config.current_instance.clone(),
    };

    Ok(ui.prompt(&prompt)?.as_string())
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.command {
            ConfigCommands::Init(args) => self.init(args, ui),
            ConfigCommands::List => self.list(ui),
            ConfigCommands::Use(args) => self.use_instance(args, ui),
            ConfigCommands::Remove(args) => self.remove(args, ui),
        }
    }
}
