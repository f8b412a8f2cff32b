//! n8nctl - Pull and push n8n workflows together with their sub-workflows.
//!
//! n8nctl talks to the n8n public REST API. Besides listing and viewing
//! workflows it can pull a workflow and every sub-workflow it calls into a
//! directory, and push that directory back to the same or another instance
//! in dependency order, rewriting sub-workflow IDs as new ones are created.
//!
//! # Modules
//!
//! - [`api`] - n8n REST client and workflow types
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Instance configuration stored on disk
//! - [`error`] - Error types and result aliases
//! - [`sync`] - Reference extraction, recursive pull, manifest and push
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use n8nctl::sync::{extract_references, sanitize_filename};
//! use serde_json::json;
//!
//! let nodes = vec![json!({
//!     "type": "n8n-nodes-base.executeWorkflow",
//!     "parameters": {"workflowId": "abc123"}
//! })];
//! assert_eq!(extract_references(&nodes), vec!["abc123"]);
//! assert_eq!(sanitize_filename("Daily: Report"), "Daily_Report");
//! ```
//!
//! For end-to-end pull and push against a mock server, see the integration
//! tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod sync;
pub mod ui;

pub use error::{Result, SyncError};
