//! Workflow documents as exchanged with the n8n API.
//!
//! Node records stay untyped (`serde_json::Value`): n8n allows arbitrary
//! third-party node types, and the sync core only reads a few parameter
//! fields. Fields this crate does not model are kept in [`Workflow::extra`]
//! so a pulled file pushes back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An n8n workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Remote identifier; absent for workflows not created yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub active: bool,

    /// Node records, each an object with at least `type` and `parameters`.
    #[serde(default)]
    pub nodes: Vec<Value>,

    #[serde(default = "empty_object")]
    pub connections: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Everything else the server sent (pinData, versionId, shared, meta...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl Workflow {
    /// Create an empty, not-yet-created workflow.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            active: false,
            nodes: Vec::new(),
            connections: empty_object(),
            settings: None,
            static_data: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// The id, treating an empty string as absent.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The subset of fields the API accepts on create and update.
    ///
    /// `id`, `active` and `tags` are read-only on the server side.
    pub fn to_write(&self) -> WorkflowWrite<'_> {
        WorkflowWrite {
            name: &self.name,
            nodes: &self.nodes,
            connections: &self.connections,
            settings: self.settings.as_ref(),
            static_data: self.static_data.as_ref(),
        }
    }
}

/// Request body for workflow create/update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowWrite<'a> {
    pub name: &'a str,
    pub nodes: &'a [Value],
    pub connections: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_data: Option<&'a Value>,
}

/// A workflow tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// One page of a workflow listing.
pub type WorkflowPage = Page<Workflow>;

/// A project as returned by `GET /projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// An instance variable (`$vars.<key>` inside workflows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
