//! Recursive pull and dependency-ordered push of workflow graphs.
//!
//! A workflow can call other workflows through "Execute Workflow" nodes.
//! [`RecursivePuller`] follows those references and records them in a
//! [`Manifest`]; [`Pusher`] replays the stored workflows referenced-first,
//! optionally as fresh copies with their references rewired.
//!
//! # Example
//!
//! ```
//! use n8nctl::sync::{Manifest, WorkflowMeta};
//!
//! let mut manifest = Manifest::new("main");
//! for id in ["main", "sub"] {
//!     manifest.add_workflow(WorkflowMeta {
//!         id: id.to_string(),
//!         name: id.to_string(),
//!         filename: format!("{}.json", id),
//!         active: false,
//!     });
//! }
//! manifest.set_dependencies("main", vec!["sub".to_string()]);
//!
//! assert_eq!(manifest.push_order(), vec!["sub", "main"]);
//! ```

pub mod manifest;
pub mod pull;
pub mod push;
pub mod references;
pub mod sanitize;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use manifest::{Manifest, WorkflowMeta, MANIFEST_FILE};
pub use pull::{PullResult, PullWarning, RecursivePuller};
pub use push::{CyclePolicy, PushMode, PushOutcome, PushReport, Pusher, WorkflowSource};
pub use references::{extract_references, rewrite_references};
pub use sanitize::{sanitize_filename, workflow_filename};
pub use store::{read_workflow_file, WorkflowDir};
