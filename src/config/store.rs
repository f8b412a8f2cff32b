//! Loading and saving the CLI configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

use super::schema::CliConfig;

/// Location of the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/n8n-cli/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SyncError::ConfigValidationError {
            message: "could not determine home directory; pass --config".to_string(),
        })?;
        Ok(home.join(".config").join("n8n-cli").join("config.json"))
    }

    /// Store at `path`, or at the default location if none is given.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_path().map(Self::new),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the configuration, failing if the file is missing.
    pub fn load(&self) -> Result<CliConfig> {
        if !self.path.exists() {
            return Err(SyncError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|source| SyncError::FileRead {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| SyncError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Load the configuration, or an empty one if the file is missing.
    pub fn load_or_default(&self) -> Result<CliConfig> {
        match self.load() {
            Err(SyncError::ConfigNotFound { .. }) => Ok(CliConfig::default()),
            other => other,
        }
    }

    /// Save the configuration. The file is only readable by its owner.
    pub fn save(&self, config: &CliConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SyncError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');

        let temp_path = self.path.with_extension("json.tmp");
        let to_write_err = |source| SyncError::FileWrite {
            path: self.path.clone(),
            source,
        };
        fs::write(&temp_path, &content).map_err(to_write_err)?;
        restrict_permissions(&temp_path).map_err(to_write_err)?;
        fs::rename(&temp_path, &self.path).map_err(to_write_err)?;

        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Instance;
    use tempfile::TempDir;

    fn sample() -> CliConfig {
        let mut config = CliConfig::default();
        config.add_instance(
            Instance::new("prod", "https://n8n.example.com", "secret").unwrap(),
            false,
        );
        config
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("config.json"));

        let err = store.load().unwrap_err();
        assert!(matches!(err, SyncError::ConfigNotFound { .. }));
        assert!(!store.exists());
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("config.json"));

        assert_eq!(store.load_or_default().unwrap(), CliConfig::default());
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("nested/dir/config.json"));

        store.save(&sample()).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), sample());
        assert!(!temp.path().join("nested/dir/config.json.tmp").exists());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{\"instances\": [").unwrap();

        let err = ConfigStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SyncError::ConfigParseError { .. }));
        // A broken file is not silently replaced by an empty config
        assert!(ConfigStore::new(&path).load_or_default().is_err());
    }

    #[test]
    fn reads_documented_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{
  "currentInstance": "prod",
  "instances": {
    "prod": {"name": "prod", "url": "https://n8n.example.com", "apiKey": "secret"}
  }
}"#,
        )
        .unwrap();

        let config = ConfigStore::new(&path).load().unwrap();
        assert_eq!(config, sample());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(temp.path().join("config.json"));
        store.save(&sample()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn resolve_uses_explicit_path() {
        let store = ConfigStore::resolve(Some(Path::new("/tmp/n8nctl.json"))).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/n8nctl.json"));
    }
}
