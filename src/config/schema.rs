//! Configuration schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// A configured n8n instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,
    /// Base URL, without a trailing slash.
    pub url: String,
    pub api_key: String,
}

impl Instance {
    /// Build an instance, validating and normalizing its fields.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let url = url.into().trim().trim_end_matches('/').to_string();
        let api_key = api_key.into().trim().to_string();

        for (field, value) in [("name", &name), ("url", &url), ("API key", &api_key)] {
            if value.is_empty() {
                return Err(SyncError::ConfigValidationError {
                    message: format!("instance {} must not be empty", field),
                });
            }
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SyncError::ConfigValidationError {
                message: format!("instance URL must start with http:// or https://, got '{}'", url),
            });
        }

        Ok(Self { name, url, api_key })
    }

    /// The API key with all but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

/// Contents of the CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Name of the instance commands talk to by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_instance: Option<String>,

    #[serde(default)]
    pub instances: BTreeMap<String, Instance>,
}

impl CliConfig {
    /// Add or replace an instance.
    ///
    /// The first instance added becomes current, as does any added with
    /// `make_current`.
    pub fn add_instance(&mut self, instance: Instance, make_current: bool) {
        if make_current || self.current_instance.is_none() {
            self.current_instance = Some(instance.name.clone());
        }
        self.instances.insert(instance.name.clone(), instance);
    }

    /// Make `name` the current instance.
    pub fn use_instance(&mut self, name: &str) -> Result<()> {
        if !self.instances.contains_key(name) {
            return Err(SyncError::UnknownInstance {
                name: name.to_string(),
            });
        }
        self.current_instance = Some(name.to_string());
        Ok(())
    }

    /// Remove `name`, returning it.
    ///
    /// If it was current, the first remaining instance by name takes over.
    pub fn remove_instance(&mut self, name: &str) -> Result<Instance> {
        let removed = self
            .instances
            .remove(name)
            .ok_or_else(|| SyncError::UnknownInstance {
                name: name.to_string(),
            })?;

        if self.current_instance.as_deref() == Some(name) {
            self.current_instance = self.instances.keys().next().cloned();
        }
        Ok(removed)
    }

    /// The instance to talk to: `name_override` if given, else the current one.
    pub fn resolve_instance(&self, name_override: Option<&str>) -> Result<&Instance> {
        let name = name_override
            .or(self.current_instance.as_deref())
            .ok_or(SyncError::NoInstanceSelected)?;

        self.instances
            .get(name)
            .ok_or_else(|| SyncError::UnknownInstance {
                name: name.to_string(),
            })
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current_instance.as_deref() == Some(name)
    }
}
