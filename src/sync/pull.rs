//! Recursive pull of a workflow and everything it references.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::api::{Workflow, WorkflowApi};
use crate::error::{Result, SyncError};

use super::manifest::{Manifest, WorkflowMeta};
use super::references::extract_references;
use super::sanitize::{unique_workflow_filename, workflow_filename};

/// Everything a recursive pull produced.
#[derive(Debug)]
pub struct PullResult {
    /// One body per distinct workflow id reached.
    pub workflows: BTreeMap<String, Workflow>,
    pub manifest: Manifest,
    /// Sub-workflows that could not be fetched.
    pub warnings: Vec<PullWarning>,
}

/// A tolerated failure to fetch a referenced sub-workflow.
#[derive(Debug)]
pub struct PullWarning {
    pub workflow_id: String,
    pub referenced_by: String,
    pub error: SyncError,
}

impl fmt::Display for PullWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not pull sub-workflow {} (referenced by {}): {}",
            self.workflow_id, self.referenced_by, self.error
        )
    }
}

/// Walks the sub-workflow graph from a root workflow.
///
/// Every id is fetched at most once, so cycles and shared sub-workflows are
/// handled. A failure on the root aborts the pull; failures further down
/// become [`PullWarning`]s and leave a dangling edge in the manifest.
pub struct RecursivePuller<A> {
    api: A,
    instance: Option<String>,
}

impl<A: WorkflowApi> RecursivePuller<A> {
    /// Create a puller over the given API.
    pub fn new(api: A) -> Self {
        Self {
            api,
            instance: None,
        }
    }

    /// Record the instance name in the produced manifest.
    pub fn with_instance(mut self, instance: Option<String>) -> Self {
        self.instance = instance;
        self
    }

    /// Pull `root_id` and, transitively, every workflow it references.
    pub fn pull(&self, root_id: &str) -> Result<PullResult> {
        let mut manifest = Manifest::new(root_id);
        manifest.instance = self.instance.clone();

        let mut workflows = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();

        // (id, referrer); the root has no referrer
        let mut stack: Vec<(String, Option<String>)> = vec![(root_id.to_string(), None)];

        while let Some((id, referrer)) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }

            tracing::debug!(id = %id, "fetching workflow");
            let workflow = match self.api.get_workflow(&id) {
                Ok(workflow) => workflow,
                Err(error) => match referrer {
                    None => {
                        return Err(SyncError::FetchFailed {
                            id,
                            source: Box::new(error),
                        })
                    }
                    Some(referenced_by) => {
                        tracing::warn!(id = %id, referenced_by = %referenced_by, %error, "skipping sub-workflow");
                        warnings.push(PullWarning {
                            workflow_id: id,
                            referenced_by,
                            error,
                        });
                        continue;
                    }
                },
            };

            let filename = unique_filename(&manifest, &id, &workflow.name);
            manifest.add_workflow(WorkflowMeta {
                id: id.clone(),
                name: workflow.name.clone(),
                filename,
                active: workflow.active,
            });

            let references = extract_references(&workflow.nodes);
            // Reversed so the first reference is visited first.
            for reference in references.iter().rev() {
                if !visited.contains(reference) {
                    stack.push((reference.clone(), Some(id.clone())));
                }
            }
            manifest.set_dependencies(id.clone(), references);
            workflows.insert(id, workflow);
        }

        tracing::info!(
            pulled = workflows.len(),
            skipped = warnings.len(),
            "recursive pull finished"
        );

        Ok(PullResult {
            workflows,
            manifest,
            warnings,
        })
    }
}

/// A filename no other workflow of `manifest` (nor the manifest) uses.
fn unique_filename(manifest: &Manifest, id: &str, name: &str) -> String {
    let filename = unique_workflow_filename(name, id, |f| manifest.filename_in_use(f));
    let preferred = workflow_filename(name);
    if filename != preferred {
        tracing::warn!(%preferred, %filename, "filename already taken");
    }
    filename
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::{workflow_with_refs, FakeApi};

    #[test]
    fn pulls_single_workflow_without_references() {
        let api = FakeApi::new().with_workflow(workflow_with_refs("A", "Main", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        assert_eq!(result.workflows.len(), 1);
        assert_eq!(result.manifest.root_workflow, "A");
        assert_eq!(result.manifest.workflows["A"].filename, "Main.json");
        assert!(result.manifest.dependencies.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn follows_references_transitively() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Main", &["B"]))
            .with_workflow(workflow_with_refs("B", "Sub", &["C"]))
            .with_workflow(workflow_with_refs("C", "Leaf", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        let ids: Vec<_> = result.workflows.keys().cloned().collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(result.manifest.dependencies["A"], vec!["B"]);
        assert_eq!(result.manifest.dependencies["B"], vec!["C"]);
        assert_eq!(api.get_calls(), vec!["A", "B", "C"]);
    }

    #[test]
    fn cycles_terminate() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "First", &["B"]))
            .with_workflow(workflow_with_refs("B", "Second", &["A"]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        let ids: Vec<_> = result.workflows.keys().cloned().collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(result.manifest.dependencies["B"], vec!["A"]);
        assert_eq!(api.get_calls().len(), 2);
    }

    #[test]
    fn diamond_fetches_shared_workflow_once() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Top", &["B", "C"]))
            .with_workflow(workflow_with_refs("B", "Left", &["D"]))
            .with_workflow(workflow_with_refs("C", "Right", &["D"]))
            .with_workflow(workflow_with_refs("D", "Shared", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        assert_eq!(result.workflows.len(), 4);
        let d_fetches = api.get_calls().iter().filter(|id| *id == "D").count();
        assert_eq!(d_fetches, 1);
    }

    #[test]
    fn sub_workflow_failure_becomes_warning() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Main", &["B", "C"]))
            .with_workflow(workflow_with_refs("B", "Sub", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        let ids: Vec<_> = result.workflows.keys().cloned().collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(result.manifest.dependencies["A"], vec!["B", "C"]);
        assert!(!result.manifest.contains("C"));
        assert_eq!(result.manifest.dangling_references(), vec![("A", "C")]);

        assert_eq!(result.warnings.len(), 1);
        let warning = &result.warnings[0];
        assert_eq!(warning.workflow_id, "C");
        assert_eq!(warning.referenced_by, "A");
        assert!(warning.error.is_not_found());
        assert!(warning.to_string().contains("could not pull sub-workflow C"));
    }

    #[test]
    fn unreachable_workflow_is_tried_once() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Main", &["B", "X"]))
            .with_workflow(workflow_with_refs("B", "Sub", &["X"]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(api.get_calls().iter().filter(|id| *id == "X").count(), 1);
    }

    #[test]
    fn root_failure_aborts() {
        let api = FakeApi::new();

        let err = RecursivePuller::new(&api).pull("missing").unwrap_err();

        match err {
            SyncError::FetchFailed { id, source } => {
                assert_eq!(id, "missing");
                assert!(source.is_not_found());
            }
            other => panic!("expected FetchFailed, got {:?}", other),
        }
    }

    #[test]
    fn records_meta_and_instance() {
        let mut wf = workflow_with_refs("A", "Main Flow", &[]);
        wf.active = true;
        let api = FakeApi::new().with_workflow(wf);

        let result = RecursivePuller::new(&api)
            .with_instance(Some("prod".into()))
            .pull("A")
            .unwrap();

        let meta = &result.manifest.workflows["A"];
        assert_eq!(meta.id, "A");
        assert_eq!(meta.name, "Main Flow");
        assert_eq!(meta.filename, "Main_Flow.json");
        assert!(meta.active);
        assert_eq!(result.manifest.instance.as_deref(), Some("prod"));
    }

    #[test]
    fn duplicate_names_get_distinct_filenames() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Worker", &["B"]))
            .with_workflow(workflow_with_refs("B", "Worker", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        assert_eq!(result.manifest.workflows["A"].filename, "Worker.json");
        assert_eq!(result.manifest.workflows["B"].filename, "Worker_B.json");
    }

    #[test]
    fn workflow_named_manifest_does_not_take_manifest_file() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Main", &["B"]))
            .with_workflow(workflow_with_refs("B", "manifest", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        assert_eq!(result.manifest.workflows["B"].filename, "manifest_B.json");
    }

    #[test]
    fn fallback_filename_does_not_collide_with_real_name() {
        // C is really called "Worker_B", so B cannot fall back to that name.
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Main", &["C", "E", "B"]))
            .with_workflow(workflow_with_refs("C", "Worker_B", &[]))
            .with_workflow(workflow_with_refs("E", "Worker", &[]))
            .with_workflow(workflow_with_refs("B", "Worker", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        let workflows = &result.manifest.workflows;
        assert_eq!(workflows["C"].filename, "Worker_B.json");
        assert_eq!(workflows["E"].filename, "Worker.json");
        assert_eq!(workflows["B"].filename, "Worker_B_2.json");
    }

    #[test]
    fn names_differing_only_in_case_get_distinct_files() {
        let api = FakeApi::new()
            .with_workflow(workflow_with_refs("A", "Main", &["B", "C"]))
            .with_workflow(workflow_with_refs("B", "Orders", &[]))
            .with_workflow(workflow_with_refs("C", "orders", &[]));

        let result = RecursivePuller::new(&api).pull("A").unwrap();

        let workflows = &result.manifest.workflows;
        assert_eq!(workflows["B"].filename, "Orders.json");
        assert_eq!(workflows["C"].filename, "orders_C.json");
    }
}
