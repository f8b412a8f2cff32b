//! On-disk layout of pulled workflows.
//!
//! A pulled directory holds one pretty-printed JSON file per workflow plus
//! `manifest.json`:
//!
//! ```text
//! out/
//! ├── manifest.json
//! ├── Main.json
//! └── Send_Invoice.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::Workflow;
use crate::error::{Result, SyncError};

use super::manifest::{Manifest, MANIFEST_FILE};
use super::pull::PullResult;
use super::push::WorkflowSource;
use super::sanitize::{unique_workflow_filename, workflow_filename};

/// A directory of pulled workflows.
#[derive(Debug, Clone)]
pub struct WorkflowDir {
    root: PathBuf,
}

impl WorkflowDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest_path().is_file()
    }

    /// Load `manifest.json` from the directory.
    pub fn load_manifest(&self) -> Result<Manifest> {
        let path = self.manifest_path();
        if !path.exists() {
            return Err(SyncError::ManifestNotFound {
                dir: self.root.clone(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| SyncError::ManifestUnreadable {
            path: path.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| SyncError::ManifestUnreadable {
            path,
            message: e.to_string(),
        })
    }

    /// Write `manifest.json`, replacing any previous one.
    pub fn save_manifest(&self, manifest: &Manifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        write_json(&path, manifest)?;
        Ok(path)
    }

    /// Write every pulled workflow and the manifest.
    ///
    /// Without `force`, nothing is written if any target file already exists.
    /// Two workflows sharing a filename, or a workflow using the manifest's
    /// filename, is an error even with `force`.
    pub fn write_pull(&self, result: &PullResult, force: bool) -> Result<Vec<PathBuf>> {
        // Lowercased filename -> who writes it
        let mut owners: HashMap<String, String> =
            HashMap::from([(MANIFEST_FILE.to_ascii_lowercase(), "the manifest".to_string())]);

        let mut targets = Vec::with_capacity(result.workflows.len());
        for (id, workflow) in &result.workflows {
            let filename = result
                .manifest
                .workflows
                .get(id)
                .map(|meta| meta.filename.clone())
                .unwrap_or_else(|| workflow_filename(&workflow.name));

            let previous = owners.insert(filename.to_ascii_lowercase(), format!("workflow {}", id));
            if let Some(owner) = previous {
                return Err(SyncError::FilenameConflict {
                    id: id.clone(),
                    filename,
                    owner,
                });
            }
            targets.push((self.root.join(filename), workflow));
        }

        if !force {
            let manifest_path = self.manifest_path();
            let existing = targets
                .iter()
                .map(|(path, _)| path)
                .chain(std::iter::once(&manifest_path))
                .find(|path| path.exists());
            if let Some(path) = existing {
                return Err(SyncError::FileExists { path: path.clone() });
            }
        }

        fs::create_dir_all(&self.root).map_err(|source| SyncError::FileWrite {
            path: self.root.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(targets.len() + 1);
        for (path, workflow) in targets {
            write_json(&path, workflow)?;
            tracing::debug!(path = %path.display(), "wrote workflow");
            written.push(path);
        }
        written.push(self.save_manifest(&result.manifest)?);

        Ok(written)
    }

    /// Write a single workflow as `<sanitized name>.json`.
    ///
    /// A workflow whose name would map onto the manifest file is written as
    /// `<name>_<id>.json` instead.
    pub fn write_workflow(&self, workflow: &Workflow, force: bool) -> Result<PathBuf> {
        let filename =
            unique_workflow_filename(&workflow.name, workflow.id().unwrap_or_default(), |_| false);
        let path = self.root.join(filename);
        if !force && path.exists() {
            return Err(SyncError::FileExists { path });
        }

        fs::create_dir_all(&self.root).map_err(|source| SyncError::FileWrite {
            path: self.root.clone(),
            source,
        })?;
        write_json(&path, workflow)?;
        Ok(path)
    }
}

impl WorkflowSource for WorkflowDir {
    fn read_workflow(&self, filename: &str) -> Result<Workflow> {
        read_workflow_file(&self.root.join(filename))
    }
}

/// Read and parse a stored workflow file.
pub fn read_workflow_file(path: &Path) -> Result<Workflow> {
    let content = fs::read_to_string(path).map_err(|source| SyncError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| SyncError::WorkflowFileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Pretty-print `value` to `path` through a temp file and rename.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_atomic(path, content.as_bytes())
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp_path = PathBuf::from(temp);

    let to_write_err = |source| SyncError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&temp_path, contents).map_err(to_write_err)?;
    fs::rename(&temp_path, path).map_err(to_write_err)?;
    Ok(())
}
