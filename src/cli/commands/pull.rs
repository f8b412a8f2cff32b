//! Pull command implementation.
//!
//! `n8nctl workflow pull <id>` writes one workflow file; with `--recursive`
//! it also pulls every sub-workflow reachable from it and writes a manifest
//! that `workflow push` uses to restore them in order.

use serde_json::json;

use crate::api::WorkflowApi;
use crate::cli::args::PullArgs;
use crate::error::{Result, SyncError};
use crate::sync::{PullResult, RecursivePuller, WorkflowDir};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The pull command implementation.
pub struct PullCommand {
    ctx: CommandContext,
    args: PullArgs,
}

impl PullCommand {
    pub fn new(ctx: CommandContext, args: PullArgs) -> Self {
        Self { ctx, args }
    }

    fn pull_single(&self, api: &dyn WorkflowApi, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let id = &self.args.id;

        let mut spinner = ui.start_spinner(&format!("Pulling workflow {}...", id));
        let workflow = match api.get_workflow(id) {
            Ok(workflow) => workflow,
            Err(e) => {
                spinner.finish_error(&format!("Could not pull workflow {}", id));
                return Err(SyncError::FetchFailed {
                    id: id.clone(),
                    source: Box::new(e),
                });
            }
        };
        spinner.finish_clear();

        let dir = WorkflowDir::new(&self.args.dir);
        let path = dir.write_workflow(&workflow, self.args.force)?;

        if self.ctx.json {
            let summary = json!({
                "id": workflow.id(),
                "name": workflow.name,
                "path": path.display().to_string(),
            });
            ui.data(&serde_json::to_string_pretty(&summary)?);
        } else {
            ui.success(&format!(
                "Pulled '{}' to {}",
                workflow.name,
                path.display()
            ));
        }

        Ok(CommandResult::success())
    }

    fn pull_recursive(
        &self,
        api: &dyn WorkflowApi,
        instance: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let mut spinner = ui.start_spinner(&format!(
            "Pulling workflow {} and its sub-workflows...",
            self.args.id
        ));
        let result = RecursivePuller::new(api)
            .with_instance(Some(instance.to_string()))
            .pull(&self.args.id);
        let result = match result {
            Ok(result) => {
                spinner.finish_clear();
                result
            }
            Err(e) => {
                spinner.finish_error(&format!("Could not pull workflow {}", self.args.id));
                return Err(e);
            }
        };

        for warning in &result.warnings {
            ui.warning(&warning.to_string());
        }

        let dir = WorkflowDir::new(&self.args.dir);
        dir.write_pull(&result, self.args.force)?;

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&pull_summary(&result, &dir))?);
            return Ok(CommandResult::success());
        }

        if ui.output_mode().shows_details() {
            for meta in result.manifest.workflows.values() {
                ui.message(&format!("  {} ({}) -> {}", meta.name, meta.id, meta.filename));
            }
        }
        ui.success(&format!(
            "Pulled {} workflow{} into {}",
            result.workflows.len(),
            if result.workflows.len() == 1 { "" } else { "s" },
            dir.root().display()
        ));
        if !result.warnings.is_empty() {
            ui.warning(&format!(
                "{} sub-workflow{} could not be pulled and will be referenced by ID only",
                result.warnings.len(),
                if result.warnings.len() == 1 { "" } else { "s" }
            ));
        }

        Ok(CommandResult::success())
    }
}

fn pull_summary(result: &PullResult, dir: &WorkflowDir) -> serde_json::Value {
    let workflows: Vec<_> = result
        .manifest
        .workflows
        .values()
        .map(|meta| json!({"id": meta.id, "name": meta.name, "filename": meta.filename}))
        .collect();
    let warnings: Vec<_> = result
        .warnings
        .iter()
        .map(|w| {
            json!({
                "workflowId": w.workflow_id,
                "referencedBy": w.referenced_by,
                "error": w.error.to_string(),
            })
        })
        .collect();

    json!({
        "rootWorkflow": result.manifest.root_workflow,
        "directory": dir.root().display().to_string(),
        "workflows": workflows,
        "warnings": warnings,
    })
}

impl Command for PullCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (instance, client) = self.ctx.connect()?;

        if self.args.recursive {
            self.pull_recursive(&client, &instance.name, ui)
        } else {
            self.pull_single(&client, ui)
        }
    }
}
