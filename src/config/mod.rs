//! CLI configuration: the n8n instances n8nctl can talk to.
//!
//! The configuration lives in `~/.config/n8n-cli/config.json`:
//!
//! ```json
//! {
//!   "currentInstance": "prod",
//!   "instances": {
//!     "prod": { "name": "prod", "url": "https://n8n.example.com", "apiKey": "..." }
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use n8nctl::config::{CliConfig, ConfigStore, Instance};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let store = ConfigStore::new(temp.path().join("config.json"));
//!
//! let mut config = store.load_or_default().unwrap();
//! config.add_instance(Instance::new("prod", "https://n8n.example.com/", "key").unwrap(), false);
//! store.save(&config).unwrap();
//!
//! let active = store.load().unwrap().resolve_instance(None).unwrap().clone();
//! assert_eq!(active.url, "https://n8n.example.com");
//! ```

pub mod schema;
pub mod store;

pub use schema::{CliConfig, Instance};
pub use store::ConfigStore;
