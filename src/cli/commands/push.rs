//! Push command implementation.
//!
//! `n8nctl workflow push <path>` uploads a single workflow file, or a
//! directory written by `workflow pull --recursive` in dependency order.

use serde_json::json;

use crate::cli::args::PushArgs;
use crate::error::{PushAction, Result};
use crate::sync::{
    read_workflow_file, CyclePolicy, Manifest, PushMode, PushOutcome, PushReport, Pusher,
    WorkflowDir,
};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The push command implementation.
pub struct PushCommand {
    ctx: CommandContext,
    args: PushArgs,
}

impl PushCommand {
    pub fn new(ctx: CommandContext, args: PushArgs) -> Self {
        Self { ctx, args }
    }

    fn mode(&self) -> PushMode {
        if self.args.create {
            PushMode::Create
        } else {
            PushMode::Update
        }
    }

    fn push_file(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // Read before connecting so a bad file fails without a network round trip
        let workflow = read_workflow_file(&self.args.path)?;
        let (_, client) = self.ctx.connect()?;

        let mut spinner = ui.start_spinner(&format!("Pushing '{}'...", workflow.name));
        let outcome = match Pusher::new(&client, self.mode()).push_one(workflow) {
            Ok(outcome) => {
                spinner.finish_clear();
                outcome
            }
            Err(e) => {
                spinner.finish_error("Push failed");
                return Err(e);
            }
        };

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&outcome_json(&outcome))?);
        } else {
            ui.success(&describe(&outcome));
        }
        Ok(CommandResult::success())
    }

    fn push_dir(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = WorkflowDir::new(&self.args.path);
        let manifest = dir.load_manifest()?;
        let (instance, client) = self.ctx.connect()?;

        warn_on_instance_mismatch(&manifest, &instance.name, self.mode(), ui);

        let cycles = if self.args.skip_cyclic {
            CyclePolicy::Skip
        } else {
            CyclePolicy::Fail
        };

        let mut spinner = ui.start_spinner(&format!(
            "Pushing {} workflow{}...",
            manifest.len(),
            if manifest.len() == 1 { "" } else { "s" }
        ));
        let report = match Pusher::new(&client, self.mode())
            .with_cycle_policy(cycles)
            .push(&manifest, &dir)
        {
            Ok(report) => {
                spinner.finish_clear();
                report
            }
            Err(e) => {
                spinner.finish_error("Push failed");
                return Err(e);
            }
        };

        if !report.skipped.is_empty() {
            ui.warning(&format!(
                "Skipped workflows in a reference cycle: {}",
                report.skipped.join(", ")
            ));
        }

        if self.ctx.json {
            ui.data(&serde_json::to_string_pretty(&report_json(&report))?);
            return Ok(CommandResult::success());
        }

        if ui.output_mode().shows_details() {
            for outcome in &report.pushed {
                ui.message(&format!("  {}", describe(outcome)));
            }
        }
        ui.success(&format!(
            "Pushed {} workflow{} to '{}'",
            report.pushed.len(),
            if report.pushed.len() == 1 { "" } else { "s" },
            instance.name
        ));
        if self.mode() == PushMode::Create {
            if let Some(root) = report.id_mapping.get(&manifest.root_workflow) {
                ui.message(&format!("Root workflow created as {}", root));
            }
        }

        Ok(CommandResult::success())
    }
}

fn warn_on_instance_mismatch(
    manifest: &Manifest,
    target: &str,
    mode: PushMode,
    ui: &mut dyn UserInterface,
) {
    if mode != PushMode::Update {
        return;
    }
    if let Some(source) = manifest.instance.as_deref() {
        if source != target {
            ui.warning(&format!(
                "Workflows were pulled from '{}' but are being pushed to '{}'; use --create to copy them",
                source, target
            ));
        }
    }
}

fn describe(outcome: &PushOutcome) -> String {
    match outcome.action {
        PushAction::Create => format!(
            "Created '{}' as {} (was {})",
            outcome.name,
            outcome.id,
            if outcome.source_id.is_empty() {
                "new"
            } else {
                outcome.source_id.as_str()
            }
        ),
        PushAction::Update => {
            format!("Updated '{}' ({})", outcome.name, outcome.id)
        }
    }
}

fn outcome_json(outcome: &PushOutcome) -> serde_json::Value {
    json!({
        "action": outcome.action.to_string(),
        "sourceId": outcome.source_id,
        "id": outcome.id,
        "name": outcome.name,
    })
}

fn report_json(report: &PushReport) -> serde_json::Value {
    let pushed: Vec<_> = report.pushed.iter().map(outcome_json).collect();
    json!({
        "pushed": pushed,
        "skipped": report.skipped,
        "idMapping": report.id_mapping,
    })
}

impl Command for PushCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.path.is_dir() {
            self.push_dir(ui)
        } else {
            self.push_file(ui)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Workflow;
    use crate::cli::commands::testing::context_for;
    use crate::error::SyncError;
    use crate::sync::{PullResult, WorkflowMeta};
    use crate::ui::MockUI;
    use httpmock::prelude::*;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::path::Path;
    use tempfile::TempDir;

    fn workflow(id: &str, name: &str, refs: &[&str]) -> Workflow {
        let mut wf = Workflow::new(name);
        wf.id = Some(id.to_string());
        for target in refs {
            wf.nodes.push(json!({
                "type": "n8n-nodes-base.executeWorkflow",
                "parameters": {"workflowId": target}
            }));
        }
        wf
    }

    /// Write a pulled directory: Main (A) calls Sub (B).
    fn write_pulled_dir(dir: &Path, instance: Option<&str>) {
        let mut manifest = Manifest::new("A");
        manifest.instance = instance.map(str::to_string);
        let mut workflows = BTreeMap::new();
        for (id, name, refs) in [("A", "Main", vec!["B"]), ("B", "Sub", vec![])] {
            manifest.add_workflow(WorkflowMeta {
                id: id.into(),
                name: name.into(),
                filename: format!("{}.json", name),
                active: false,
            });
            manifest.set_dependencies(id, refs.iter().map(|s| s.to_string()).collect());
            workflows.insert(id.to_string(), workflow(id, name, &refs));
        }
        let result = PullResult {
            workflows,
            manifest,
            warnings: Vec::new(),
        };
        WorkflowDir::new(dir).write_pull(&result, false).unwrap();
    }

    fn args(path: &Path, create: bool) -> PushArgs {
        PushArgs {
            path: path.to_path_buf(),
            create,
            skip_cyclic: false,
        }
    }

    #[test]
    fn directory_without_manifest_fails_before_connecting() {
        let temp = TempDir::new().unwrap();
        let ctx = CommandContext::new(
            crate::config::ConfigStore::new(temp.path().join("missing.json")),
            None,
            false,
        );
        let mut ui = MockUI::new();

        let err = PushCommand::new(ctx, args(temp.path(), false))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, SyncError::ManifestNotFound { .. }));
    }

    #[test]
    fn directory_update_pushes_sub_workflow_first() {
        let server = MockServer::start();
        let sub = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/v1/workflows/B")
                .body_includes(r#""name":"Sub""#);
            then.status(200).json_body(json!({"id": "B", "name": "Sub"}));
        });
        let main = server.mock(|when, then| {
            when.method(PUT).path("/api/v1/workflows/A");
            then.status(200).json_body(json!({"id": "A", "name": "Main"}));
        });
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        write_pulled_dir(&out, Some("test"));
        let ctx = context_for(&temp, &server, false);
        let mut ui = MockUI::new();

        PushCommand::new(ctx, args(&out, false))
            .execute(&mut ui)
            .unwrap();

        sub.assert();
        main.assert();
        assert!(ui.has_success("Pushed 2 workflows to 'test'"));
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn directory_create_rewires_references() {
        let server = MockServer::start();
        let sub = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/workflows")
                .body_includes(r#""name":"Sub""#);
            then.status(200).json_body(json!({"id": "new-sub", "name": "Sub"}));
        });
        let main = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/workflows")
                .body_includes(r#""name":"Main""#)
                .body_includes(r#""workflowId":"new-sub""#);
            then.status(200).json_body(json!({"id": "new-main", "name": "Main"}));
        });
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        write_pulled_dir(&out, Some("elsewhere"));
        let ctx = context_for(&temp, &server, true);
        let mut ui = MockUI::new();

        PushCommand::new(ctx, args(&out, true))
            .execute(&mut ui)
            .unwrap();

        sub.assert();
        main.assert();
        let report: Value = serde_json::from_str(&ui.data_output()[0]).unwrap();
        assert_eq!(report["idMapping"]["A"], "new-main");
        assert_eq!(report["idMapping"]["B"], "new-sub");
        // Creating copies on another instance is the intended use
        assert!(ui.warnings().is_empty());
    }

    #[test]
    fn update_warns_when_instance_differs() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT);
            then.status(200).json_body(json!({"id": "X", "name": "Any"}));
        });
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        write_pulled_dir(&out, Some("prod"));
        let ctx = context_for(&temp, &server, false);
        let mut ui = MockUI::new();

        PushCommand::new(ctx, args(&out, false))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_warning("pulled from 'prod'"));
    }

    #[test]
    fn failing_update_stops_and_names_workflow() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/api/v1/workflows/B");
            then.status(400)
                .json_body(json!({"message": "request/body must have required property 'settings'"}));
        });
        let main = server.mock(|when, then| {
            when.method(PUT).path("/api/v1/workflows/A");
            then.status(200).json_body(json!({"id": "A", "name": "Main"}));
        });
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        write_pulled_dir(&out, None);
        let ctx = context_for(&temp, &server, false);
        let mut ui = MockUI::new();

        let err = PushCommand::new(ctx, args(&out, false))
            .execute(&mut ui)
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("update"));
        assert!(msg.contains("Sub"));
        assert!(msg.contains("required property 'settings'"));
        main.assert_calls(0);
    }

    #[test]
    fn single_file_create() {
        let server = MockServer::start();
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/v1/workflows");
            then.status(200).json_body(json!({"id": "fresh", "name": "Solo"}));
        });
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Solo.json");
        std::fs::write(
            &file,
            serde_json::to_string(&workflow("old", "Solo", &[])).unwrap(),
        )
        .unwrap();
        let ctx = context_for(&temp, &server, false);
        let mut ui = MockUI::new();

        PushCommand::new(ctx, args(&file, true))
            .execute(&mut ui)
            .unwrap();

        create.assert();
        assert!(ui.has_success("Created 'Solo' as fresh (was old)"));
    }

    #[test]
    fn single_file_update_requires_id() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Draft.json");
        std::fs::write(&file, r#"{"name": "Draft", "nodes": [], "connections": {}}"#).unwrap();
        let server = MockServer::start();
        let ctx = context_for(&temp, &server, false);
        let mut ui = MockUI::new();

        let err = PushCommand::new(ctx, args(&file, false))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, SyncError::MissingWorkflowId { .. }));
    }
}
