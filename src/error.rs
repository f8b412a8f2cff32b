//! Error types for n8nctl operations.
//!
//! This module defines [`SyncError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SyncError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SyncError::Other`) for unexpected errors
//! - Every message names the operation, the workflow or file involved and the
//!   underlying cause, so it can be shown to the user as-is

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which remote write a push was attempting when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushAction {
    Create,
    Update,
}

impl fmt::Display for PushAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Core error type for n8nctl operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// CLI configuration file not found.
    #[error("No configuration found at {path}. Run 'n8nctl config init' first")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the CLI configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No instance is marked as current.
    #[error("No instance selected. Run 'n8nctl config use <name>'")]
    NoInstanceSelected,

    /// The named instance is not configured.
    #[error("Instance '{name}' not found")]
    UnknownInstance { name: String },

    /// The n8n API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The root workflow of a pull could not be fetched.
    #[error("Failed to get workflow {id}: {source}")]
    FetchFailed {
        id: String,
        #[source]
        source: Box<SyncError>,
    },

    /// A remote write failed during push; the push stopped here.
    #[error("Failed to {action} workflow '{name}' ({id}): {source}")]
    PushFailed {
        action: PushAction,
        name: String,
        id: String,
        #[source]
        source: Box<SyncError>,
    },

    /// A directory was pushed but holds no manifest.
    #[error("No manifest.json found in {dir}")]
    ManifestNotFound { dir: PathBuf },

    /// The manifest exists but cannot be read or parsed.
    #[error("Failed to read manifest {path}: {message}")]
    ManifestUnreadable { path: PathBuf, message: String },

    /// A stored workflow file is not valid workflow JSON.
    #[error("Failed to parse {path}: {message}")]
    WorkflowFileParse { path: PathBuf, message: String },

    /// A local file could not be read.
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local file could not be written.
    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refusing to overwrite a local file.
    #[error("File {path} already exists. Use --force to overwrite")]
    FileExists { path: PathBuf },

    /// Two files of a pull would land on the same path.
    #[error("Workflow {id} would be written to {filename}, which is already used by {owner}")]
    FilenameConflict {
        id: String,
        filename: String,
        owner: String,
    },

    /// An update was requested for a workflow body without an id.
    #[error("Workflow '{name}' has no ID. Use --create to create a new workflow")]
    MissingWorkflowId { name: String },

    /// The remote create call returned a workflow without an id.
    #[error("Server did not assign an ID to workflow '{name}'")]
    MissingAssignedId { name: String },

    /// The manifest's dependency edges contain a cycle.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// No variable with this key exists on the instance.
    #[error("Variable '{key}' not found")]
    VariableNotFound { key: String },

    /// `variable create` or `variable update` without a value.
    #[error("No value given for variable '{key}'. Pass it as an argument or with --value")]
    MissingVariableValue { key: String },

    /// HTTP transport error.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding/decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncError {
    /// True if the remote reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 404,
            Self::FetchFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for n8nctl operations.
pub type Result<T> = std::result::Result<T, SyncError>;
