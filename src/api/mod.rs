//! n8n public API types and client.
//!
//! The sync core only depends on the [`WorkflowApi`] trait, which covers the
//! three remote calls it needs. [`ApiClient`] is the HTTP implementation used
//! by the CLI; tests substitute in-memory fakes.

pub mod client;
pub mod types;

pub use client::{ApiClient, ListWorkflowsOptions, DEFAULT_TIMEOUT};
pub use types::{Page, Project, Tag, Variable, Workflow, WorkflowPage, WorkflowWrite};

use crate::error::Result;

/// Remote workflow operations the sync core relies on.
pub trait WorkflowApi {
    /// Fetch a workflow by id.
    fn get_workflow(&self, id: &str) -> Result<Workflow>;

    /// Create a workflow; the returned body carries the assigned id.
    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow>;

    /// Replace the workflow stored under `id`.
    fn update_workflow(&self, id: &str, workflow: &Workflow) -> Result<Workflow>;
}

impl<T: WorkflowApi + ?Sized> WorkflowApi for &T {
    fn get_workflow(&self, id: &str) -> Result<Workflow> {
        (**self).get_workflow(id)
    }

    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow> {
        (**self).create_workflow(workflow)
    }

    fn update_workflow(&self, id: &str, workflow: &Workflow) -> Result<Workflow> {
        (**self).update_workflow(id, workflow)
    }
}
