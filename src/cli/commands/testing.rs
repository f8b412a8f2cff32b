//! Shared fixtures for command tests.

use httpmock::MockServer;
use tempfile::TempDir;

use crate::config::{CliConfig, ConfigStore, Instance};

use super::dispatcher::CommandContext;

/// A context whose current instance points at `server`, with API key `test-key`.
pub fn context_for(temp: &TempDir, server: &MockServer, json: bool) -> CommandContext {
    let store = ConfigStore::new(temp.path().join("config.json"));
    let mut config = CliConfig::default();
    config.add_instance(
        Instance::new("test", server.base_url(), "test-key").unwrap(),
        true,
    );
    store.save(&config).unwrap();

    CommandContext::new(store, None, json)
}
