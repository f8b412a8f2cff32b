//! The manifest: workflows discovered by a pull and their reference edges.
//!
//! The graph is kept as flat maps keyed by workflow id. Edges may point at ids
//! that are not manifest keys (sub-workflows that could not be fetched); those
//! dangling edges are kept for the record but ignored when ordering a push.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// File name of the manifest inside a pulled directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Metadata about a pulled workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMeta {
    pub id: String,
    pub name: String,
    pub filename: String,
    #[serde(default)]
    pub active: bool,
}

/// Workflow relationships captured by a recursive pull.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The workflow the pull started from.
    pub root_workflow: String,

    /// Workflow id to metadata.
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowMeta>,

    /// Workflow id to the ids it references, in discovery order.
    #[serde(default)]
    pub dependencies: BTreeMap<String, Vec<String>>,

    /// Name of the configured instance the pull came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Manifest {
    /// Create an empty manifest rooted at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root_workflow: root.into(),
            ..Default::default()
        }
    }

    /// Record a pulled workflow.
    pub fn add_workflow(&mut self, meta: WorkflowMeta) {
        self.workflows.insert(meta.id.clone(), meta);
    }

    /// Record the references of `id`. Empty lists are not stored.
    pub fn set_dependencies(&mut self, id: impl Into<String>, references: Vec<String>) {
        if !references.is_empty() {
            self.dependencies.insert(id.into(), references);
        }
    }

    /// Check whether `id` was pulled.
    pub fn contains(&self, id: &str) -> bool {
        self.workflows.contains_key(id)
    }

    /// Number of pulled workflows.
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Check whether no workflow was recorded.
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// Check whether `filename` is already used by another workflow.
    pub fn filename_in_use(&self, filename: &str) -> bool {
        self.workflows
            .values()
            .any(|m| m.filename.eq_ignore_ascii_case(filename))
    }

    /// Edges `(from, to)` whose target is not a manifest key.
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        self.dependencies
            .iter()
            .flat_map(|(from, deps)| deps.iter().map(move |to| (from.as_str(), to.as_str())))
            .filter(|(_, to)| !self.contains(to))
            .collect()
    }

    /// Edges restricted to manifest keys on both ends.
    fn internal_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies
            .iter()
            .filter(move |(from, _)| self.contains(from))
            .flat_map(|(from, deps)| deps.iter().map(move |to| (from.as_str(), to.as_str())))
            .filter(move |(_, to)| self.contains(to))
    }

    /// Workflow ids in push order: referenced workflows before referrers.
    ///
    /// Kahn's algorithm over the manifest keys. Dangling references are
    /// ignored. Members of a dependency cycle never become ready and are
    /// left out of the result; use [`Manifest::checked_push_order`] to turn
    /// that into an error. Ties break by id, so the order is deterministic.
    pub fn push_order(&self) -> Vec<String> {
        let mut in_degree: BTreeMap<&str, usize> =
            self.workflows.keys().map(|id| (id.as_str(), 0)).collect();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for (from, to) in self.internal_edges() {
            dependents.entry(to).or_default().push(from);
            if let Some(degree) = in_degree.get_mut(from) {
                *degree += 1;
            }
        }

        // Start with workflows that reference nothing pushable
        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut order = Vec::with_capacity(self.workflows.len());

        while let Some(id) = queue.pop_front() {
            order.push(id.to_string());

            for &dependent in dependents.get(id).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        order
    }

    /// Like [`Manifest::push_order`], but fails if any workflow would be left out.
    pub fn checked_push_order(&self) -> Result<Vec<String>> {
        let order = self.push_order();
        if order.len() == self.workflows.len() {
            return Ok(order);
        }

        let cycle = self
            .find_cycle()
            .unwrap_or_else(|| self.unordered(&order));

        Err(SyncError::CircularDependency {
            cycle: cycle.join(" -> "),
        })
    }

    /// Manifest keys missing from `order`.
    pub fn unordered(&self, order: &[String]) -> Vec<String> {
        let ordered: HashSet<&str> = order.iter().map(String::as_str).collect();
        self.workflows
            .keys()
            .filter(|id| !ordered.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// Find a reference cycle among manifest keys, returning its path.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        let mut edges: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (from, to) in self.internal_edges() {
            edges.entry(from).or_default().push(to);
        }

        fn dfs<'a>(
            node: &'a str,
            edges: &BTreeMap<&'a str, Vec<&'a str>>,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<&'a str>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node);

            for &next in edges.get(node).into_iter().flatten() {
                match state.get(next).copied().unwrap_or(State::Unvisited) {
                    State::Visiting => {
                        let start = path.iter().position(|n| *n == next).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|n| n.to_string()).collect();
                        cycle.push(next.to_string());
                        return Some(cycle);
                    }
                    State::Unvisited => {
                        if let Some(cycle) = dfs(next, edges, state, path) {
                            return Some(cycle);
                        }
                    }
                    State::Visited => {}
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let mut state: HashMap<&str, State> = HashMap::new();
        let mut path = Vec::new();

        for id in self.workflows.keys() {
            if state.get(id.as_str()).is_none() {
                if let Some(cycle) = dfs(id, &edges, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }
}
