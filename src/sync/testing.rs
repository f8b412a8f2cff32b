//! In-memory `WorkflowApi` for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::api::{Workflow, WorkflowApi};
use crate::error::{Result, SyncError};

use super::references::EXECUTE_WORKFLOW_NODE;

/// A remote call observed by [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Create(Workflow),
    Update(String, Workflow),
}

#[derive(Default)]
pub struct FakeApi {
    workflows: RefCell<HashMap<String, Workflow>>,
    failing_writes: HashSet<String>,
    calls: RefCell<Vec<Call>>,
    next_id: RefCell<usize>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workflow(self, workflow: Workflow) -> Self {
        let id = workflow.id.clone().unwrap_or_default();
        self.workflows.borrow_mut().insert(id, workflow);
        self
    }

    /// Make create/update of a workflow with this name fail.
    pub fn failing_write(mut self, name: &str) -> Self {
        self.failing_writes.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Get(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn check_write(&self, workflow: &Workflow) -> Result<()> {
        if self.failing_writes.contains(&workflow.name) {
            return Err(SyncError::Api {
                status: 500,
                message: format!("cannot save {}", workflow.name),
            });
        }
        Ok(())
    }
}

impl WorkflowApi for FakeApi {
    fn get_workflow(&self, id: &str) -> Result<Workflow> {
        self.calls.borrow_mut().push(Call::Get(id.to_string()));
        self.workflows
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::Api {
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow> {
        self.calls.borrow_mut().push(Call::Create(workflow.clone()));
        self.check_write(workflow)?;

        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let mut created = workflow.clone();
        created.id = Some(format!("new-{}", *next));
        self.workflows
            .borrow_mut()
            .insert(created.id.clone().unwrap_or_default(), created.clone());
        Ok(created)
    }

    fn update_workflow(&self, id: &str, workflow: &Workflow) -> Result<Workflow> {
        self.calls
            .borrow_mut()
            .push(Call::Update(id.to_string(), workflow.clone()));
        self.check_write(workflow)?;
        Ok(workflow.clone())
    }
}

/// A workflow whose nodes execute each of `refs`.
pub fn workflow_with_refs(id: &str, name: &str, refs: &[&str]) -> Workflow {
    let mut workflow = Workflow::new(name);
    workflow.id = Some(id.to_string());
    workflow.nodes.push(json!({
        "name": "Start",
        "type": "n8n-nodes-base.manualTrigger",
        "parameters": {}
    }));
    for (i, reference) in refs.iter().enumerate() {
        workflow.nodes.push(json!({
            "name": format!("Call {}", i),
            "type": EXECUTE_WORKFLOW_NODE,
            "parameters": {"workflowId": reference}
        }));
    }
    workflow
}
