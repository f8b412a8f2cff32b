//! Sub-workflow references embedded in node parameters.
//!
//! An "Execute Workflow" node points at another workflow through one of a few
//! parameter shapes that changed across n8n versions:
//!
//! ```json
//! {"workflowId": "abc"}                                  // direct id
//! {"workflow": {"id": "abc"}}                            // workflow object
//! {"workflowId": {"__rl": true, "value": "abc", ...}}    // resource locator
//! ```
//!
//! Each shape is a [`ReferenceRule`]. When matching a rule, a missing
//! field or a field of the wrong type is "no match", never an error.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

/// Node type of the "Execute Workflow" action node.
pub const EXECUTE_WORKFLOW_NODE: &str = "n8n-nodes-base.executeWorkflow";

/// Node type of the "Execute Workflow Trigger" node.
pub const EXECUTE_WORKFLOW_TRIGGER_NODE: &str = "n8n-nodes-base.executeWorkflowTrigger";

/// One parameter shape that can carry a workflow id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRule {
    /// `parameters.workflowId` is a string.
    DirectId,
    /// `parameters.workflow.id` is a string.
    WorkflowObject,
    /// `parameters.workflowId.value` is a string.
    ResourceLocator,
}

impl ReferenceRule {
    /// All rules, in the order they are applied to a node.
    pub const ALL: [ReferenceRule; 3] = [
        ReferenceRule::DirectId,
        ReferenceRule::WorkflowObject,
        ReferenceRule::ResourceLocator,
    ];

    /// The referenced id, if this rule matches and the id is non-empty.
    pub fn matched_id<'a>(&self, params: &'a Map<String, Value>) -> Option<&'a str> {
        let id = match self {
            Self::DirectId => params.get("workflowId")?.as_str(),
            Self::WorkflowObject => params.get("workflow")?.get("id")?.as_str(),
            Self::ResourceLocator => params.get("workflowId")?.get("value")?.as_str(),
        }?;
        (!id.is_empty()).then_some(id)
    }

    /// Mutable access to the string slot this rule reads.
    fn slot<'a>(&self, params: &'a mut Map<String, Value>) -> Option<&'a mut Value> {
        let slot = match self {
            Self::DirectId => params.get_mut("workflowId")?,
            Self::WorkflowObject => params.get_mut("workflow")?.get_mut("id")?,
            Self::ResourceLocator => params.get_mut("workflowId")?.get_mut("value")?,
        };
        slot.is_string().then_some(slot)
    }
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("type")?.as_str()
}

fn is_reference_source(node: &Value) -> bool {
    matches!(
        node_type(node),
        Some(EXECUTE_WORKFLOW_NODE) | Some(EXECUTE_WORKFLOW_TRIGGER_NODE)
    )
}

/// Collect the workflow ids referenced by a node list.
///
/// Ids come back in first-occurrence order without duplicates. Nodes of other
/// types and malformed parameters are skipped.
pub fn extract_references(nodes: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for node in nodes.iter().filter(|n| is_reference_source(n)) {
        let Some(params) = node.get("parameters").and_then(Value::as_object) else {
            continue;
        };

        for rule in ReferenceRule::ALL {
            if let Some(id) = rule.matched_id(params) {
                if seen.insert(id) {
                    ids.push(id.to_string());
                }
            }
        }
    }

    ids
}

/// Point references at new ids after copies were created.
///
/// Only action nodes ([`EXECUTE_WORKFLOW_NODE`]) are rewritten; trigger nodes
/// are left as they are. Ids missing from `translation` stay untouched.
/// Returns the number of replaced references.
pub fn rewrite_references(nodes: &mut [Value], translation: &HashMap<String, String>) -> usize {
    let mut rewritten = 0;

    for node in nodes.iter_mut() {
        if node_type(node) != Some(EXECUTE_WORKFLOW_NODE) {
            continue;
        }
        let Some(params) = node.get_mut("parameters").and_then(Value::as_object_mut) else {
            continue;
        };

        for rule in ReferenceRule::ALL {
            let Some(slot) = rule.slot(params) else {
                continue;
            };
            let replacement = slot.as_str().and_then(|old| translation.get(old));
            if let Some(new_id) = replacement {
                tracing::debug!(rule = ?rule, new_id = %new_id, "rewriting sub-workflow reference");
                *slot = Value::String(new_id.clone());
                rewritten += 1;
            }
        }
    }

    rewritten
}
