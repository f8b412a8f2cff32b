//! Pushing pulled workflows back to n8n in dependency order.
//!
//! Unlike pull, push is fail-fast: the first failing remote call stops the
//! run, because later workflows may reference one that never landed.

use std::collections::HashMap;

use crate::api::{Workflow, WorkflowApi};
use crate::error::{PushAction, Result, SyncError};

use super::manifest::Manifest;
use super::references::rewrite_references;

/// Reads stored workflow bodies by manifest filename.
pub trait WorkflowSource {
    fn read_workflow(&self, filename: &str) -> Result<Workflow>;
}

/// How workflows land on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushMode {
    /// Overwrite the workflows the files came from.
    #[default]
    Update,
    /// Create copies with fresh ids and rewire references to them.
    Create,
}

/// What to do when the manifest's references form a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Refuse to push anything.
    #[default]
    Fail,
    /// Push everything else and report the cyclic workflows as skipped.
    Skip,
}

/// One workflow that was pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// Id the workflow had locally.
    pub source_id: String,
    /// Id it has on the server now.
    pub id: String,
    pub name: String,
    pub action: PushAction,
}

/// Result of a manifest push.
#[derive(Debug, Default)]
pub struct PushReport {
    pub pushed: Vec<PushOutcome>,
    /// Cyclic workflows left out under [`CyclePolicy::Skip`].
    pub skipped: Vec<String>,
    /// Old id to new id, filled in create mode.
    pub id_mapping: HashMap<String, String>,
}

/// Applies workflows to the remote side.
pub struct Pusher<A> {
    api: A,
    mode: PushMode,
    cycles: CyclePolicy,
}

impl<A: WorkflowApi> Pusher<A> {
    /// Create a pusher with the default cycle policy.
    pub fn new(api: A, mode: PushMode) -> Self {
        Self {
            api,
            mode,
            cycles: CyclePolicy::default(),
        }
    }

    /// Set the cycle policy.
    pub fn with_cycle_policy(mut self, cycles: CyclePolicy) -> Self {
        self.cycles = cycles;
        self
    }

    /// Push every workflow of `manifest`, referenced workflows first.
    pub fn push(&self, manifest: &Manifest, source: &dyn WorkflowSource) -> Result<PushReport> {
        let order = match self.cycles {
            CyclePolicy::Fail => manifest.checked_push_order()?,
            CyclePolicy::Skip => manifest.push_order(),
        };
        let skipped = manifest.unordered(&order);
        for id in &skipped {
            tracing::warn!(id = %id, "skipping workflow in a reference cycle");
        }

        // Lives for this push only.
        let mut translation: HashMap<String, String> = HashMap::new();
        let mut pushed = Vec::with_capacity(order.len());

        for id in &order {
            let Some(meta) = manifest.workflows.get(id) else {
                continue;
            };

            let mut workflow = source.read_workflow(&meta.filename)?;

            if self.mode == PushMode::Create && !translation.is_empty() {
                let count = rewrite_references(&mut workflow.nodes, &translation);
                tracing::debug!(id = %id, count, "rewrote sub-workflow references");
            }

            let outcome = self.apply(id, &meta.name, workflow)?;
            if outcome.action == PushAction::Create {
                translation.insert(id.clone(), outcome.id.clone());
            }
            pushed.push(outcome);
        }

        tracing::info!(pushed = pushed.len(), skipped = skipped.len(), "push finished");

        Ok(PushReport {
            pushed,
            skipped,
            id_mapping: translation,
        })
    }

    /// Push a single workflow body, outside any manifest.
    pub fn push_one(&self, workflow: Workflow) -> Result<PushOutcome> {
        let source_id = workflow.id().unwrap_or_default().to_string();
        let name = workflow.name.clone();
        self.apply(&source_id, &name, workflow)
    }

    fn apply(&self, source_id: &str, name: &str, mut workflow: Workflow) -> Result<PushOutcome> {
        let failed = |action, source| SyncError::PushFailed {
            action,
            name: name.to_string(),
            id: source_id.to_string(),
            source: Box::new(source),
        };

        match self.mode {
            PushMode::Create => {
                workflow.id = None;
                tracing::debug!(source_id, name, "creating workflow");
                let created = self
                    .api
                    .create_workflow(&workflow)
                    .map_err(|e| failed(PushAction::Create, e))?;
                let id = created.id().map(str::to_string).ok_or_else(|| {
                    failed(
                        PushAction::Create,
                        SyncError::MissingAssignedId {
                            name: name.to_string(),
                        },
                    )
                })?;

                Ok(PushOutcome {
                    source_id: source_id.to_string(),
                    id,
                    name: created.name,
                    action: PushAction::Create,
                })
            }
            PushMode::Update => {
                let target = workflow
                    .id()
                    .map(str::to_string)
                    .ok_or_else(|| SyncError::MissingWorkflowId {
                        name: name.to_string(),
                    })?;
                tracing::debug!(id = %target, name, "updating workflow");
                let updated = self
                    .api
                    .update_workflow(&target, &workflow)
                    .map_err(|e| failed(PushAction::Update, e))?;

                Ok(PushOutcome {
                    source_id: source_id.to_string(),
                    id: updated.id().map(str::to_string).unwrap_or(target),
                    name: updated.name,
                    action: PushAction::Update,
                })
            }
        }
    }
}
