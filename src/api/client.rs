//! Blocking HTTP client for the n8n public API (`/api/v1`).

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

use super::types::{Page, Project, Variable, Workflow, WorkflowPage};
use super::WorkflowApi;

/// Overall timeout applied to every API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Filters for a single page of `GET /workflows`.
#[derive(Debug, Clone, Default)]
pub struct ListWorkflowsOptions {
    pub active: Option<bool>,
    pub tags: Vec<String>,
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// n8n API client bound to one instance.
pub struct ApiClient {
    base_url: Url,
    api_key: String,
    timeout: Duration,
    client: Client,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"****")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with the default five-minute timeout.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            SyncError::ConfigValidationError {
                message: format!("invalid instance URL '{}': {}", base_url, e),
            }
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SyncError::ConfigValidationError {
                message: format!("invalid instance URL '{}'", base_url),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("n8nctl/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: parsed,
            api_key: api_key.into(),
            timeout,
            client,
        })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the instance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List one page of workflows.
    pub fn list_workflows(&self, options: &ListWorkflowsOptions) -> Result<WorkflowPage> {
        let mut url = self.endpoint(&["workflows"]);
        {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = options.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(active) = options.active {
                query.append_pair("active", if active { "true" } else { "false" });
            }
            if !options.tags.is_empty() {
                query.append_pair("tags", &options.tags.join(","));
            }
            if let Some(name) = &options.name {
                query.append_pair("name", name);
            }
            if let Some(project_id) = &options.project_id {
                query.append_pair("projectId", project_id);
            }
            if let Some(cursor) = &options.cursor {
                query.append_pair("cursor", cursor);
            }
        }
        // Drop the dangling `?` when no filter was set.
        if url.query() == Some("") {
            url.set_query(None);
        }

        self.send(self.client.get(url))
    }

    /// Activate a workflow.
    pub fn activate_workflow(&self, id: &str) -> Result<Workflow> {
        let url = self.endpoint(&["workflows", id, "activate"]);
        self.send(self.client.post(url))
    }

    /// Deactivate a workflow.
    pub fn deactivate_workflow(&self, id: &str) -> Result<Workflow> {
        let url = self.endpoint(&["workflows", id, "deactivate"]);
        self.send(self.client.post(url))
    }

    /// List one page of projects.
    pub fn list_projects(&self, limit: Option<u32>, cursor: Option<&str>) -> Result<Page<Project>> {
        let url = self.paged(&["projects"], limit, cursor);
        self.send(self.client.get(url))
    }

    /// List one page of instance variables.
    pub fn list_variables(
        &self,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<Page<Variable>> {
        let url = self.paged(&["variables"], limit, cursor);
        self.send(self.client.get(url))
    }

    /// Look a variable up by key, following listing cursors until found.
    pub fn find_variable(&self, key: &str) -> Result<Option<Variable>> {
        let mut cursor: Option<String> = None;
        loop {
            let page = self.list_variables(Some(VARIABLE_PAGE_SIZE), cursor.as_deref())?;
            if let Some(found) = page.data.into_iter().find(|v| v.key == key) {
                return Ok(Some(found));
            }
            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }

    /// Create a variable.
    pub fn create_variable(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, "POST variable");
        let url = self.endpoint(&["variables"]);
        self.send_empty(self.client.post(url).json(&VariableWrite { key, value }))
    }

    /// Replace the key and value of the variable stored under `id`.
    pub fn update_variable(&self, id: &str, key: &str, value: &str) -> Result<()> {
        tracing::debug!(id, key, "PUT variable");
        let url = self.endpoint(&["variables", id]);
        self.send_empty(self.client.put(url).json(&VariableWrite { key, value }))
    }

    /// Delete the variable stored under `id`.
    pub fn delete_variable(&self, id: &str) -> Result<()> {
        tracing::debug!(id, "DELETE variable");
        let url = self.endpoint(&["variables", id]);
        self.send_empty(self.client.delete(url))
    }

    /// Endpoint with optional `limit` and `cursor` query parameters.
    fn paged(&self, segments: &[&str], limit: Option<u32>, cursor: Option<&str>) -> Url {
        let mut url = self.endpoint(segments);
        if limit.is_some() || cursor.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }
        url
    }

    /// Build `<base>/api/v1/<segments...>` with each segment escaped.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.execute(request)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like `send`, for endpoints whose success body carries nothing we use.
    fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        self.execute(request).map(drop)
    }

    fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Page size used when scanning variables for a key.
const VARIABLE_PAGE_SIZE: u32 = 100;

#[derive(Serialize)]
struct VariableWrite<'a> {
    key: &'a str,
    value: &'a str,
}

impl WorkflowApi for ApiClient {
    fn get_workflow(&self, id: &str) -> Result<Workflow> {
        tracing::debug!(id, "GET workflow");
        let url = self.endpoint(&["workflows", id]);
        self.send(self.client.get(url))
    }

    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow> {
        tracing::debug!(name = %workflow.name, "POST workflow");
        let url = self.endpoint(&["workflows"]);
        self.send(self.client.post(url).json(&workflow.to_write()))
    }

    fn update_workflow(&self, id: &str, workflow: &Workflow) -> Result<Workflow> {
        tracing::debug!(id, name = %workflow.name, "PUT workflow");
        let url = self.endpoint(&["workflows", id]);
        self.send(self.client.put(url).json(&workflow.to_write()))
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Prefer the JSON `message` field, fall back to the raw body.
fn api_error(status: u16, body: &str) -> SyncError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    SyncError::Api { status, message }
}
