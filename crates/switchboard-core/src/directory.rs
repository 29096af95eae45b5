//! HTTP client for the agent directory backend.
//!
//! This module wraps the REST surface under `/api/v1`: listing, fetching,
//! batch creation, update, delete, and start of agent records. Every
//! operation is a single request/response with no retry; callers decide
//! whether a failure is surfaced or reduced to a notification.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::agent::{AgentCreate, AgentRecord, AgentUpdate};

/// Default backend base URL, matching the development server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Body of a successful start response. The backend reports "already
/// running" through this message rather than an error status.
const ALREADY_RUNNING_MESSAGE: &str = "Agent is already running";

/// Represents an error from the agent directory backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The backend could not be reached at all.
    #[error("agent directory not reachable at {base_url}: {detail}")]
    Connection { base_url: String, detail: String },

    /// The backend answered with a non-success status code.
    #[error("agent directory returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode agent directory response: {0}")]
    Decode(String),
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The backend launched the agent process.
    Started,
    /// The agent was already running; a soft success, not an error.
    AlreadyRunning,
}

#[derive(Deserialize)]
struct StartResponse {
    message: String,
}

/// Typed accessor for the agent directory REST surface.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    /// Base URL including the API prefix (e.g., "http://localhost:8000/api/v1").
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl DirectoryClient {
    /// Creates a client against the default development backend.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Creates a client against a custom base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL including the API prefix, without a
    ///   trailing slash (e.g., "http://10.0.0.5:8000/api/v1")
    pub fn with_base_url(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists agent records with backend-side pagination.
    ///
    /// # Errors
    /// Returns a `DirectoryError` on transport failure, non-success
    /// status, or an undecodable body. Callers on the listing path treat
    /// any error as "empty or failed" and offer a manual retry.
    pub async fn list(&self, skip: usize, limit: usize) -> Result<Vec<AgentRecord>> {
        debug!(skip, limit, "listing agents");
        let url = format!("{}/agents/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;
        let response = Self::check_status(response).await?;

        response.json::<Vec<AgentRecord>>().await.map_err(|e| {
            error!(error = %e, "Failed to parse agent list response");
            DirectoryError::Decode(e.to_string())
        })
    }

    /// Fetches a single agent record.
    ///
    /// # Errors
    /// Returns `DirectoryError::Status` with 404 when the agent does not
    /// exist, alongside the usual transport and decode failures.
    pub async fn get(&self, id: i64) -> Result<AgentRecord> {
        debug!(agent_id = id, "fetching agent");
        let url = format!("{}/agents/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;
        let response = Self::check_status(response).await?;

        response.json::<AgentRecord>().await.map_err(|e| {
            error!(error = %e, agent_id = id, "Failed to parse agent response");
            DirectoryError::Decode(e.to_string())
        })
    }

    /// Creates a batch of agents in a single call.
    ///
    /// The backend is the arbiter of partial success; a non-success
    /// response means the whole batch failed from the client's view.
    ///
    /// # Errors
    /// Returns a `DirectoryError`; callers keep the editor open so the
    /// batch can be retried unchanged.
    pub async fn create_batch(&self, drafts: &[AgentCreate]) -> Result<Vec<AgentRecord>> {
        debug!(count = drafts.len(), "creating agent batch");
        let url = format!("{}/agents/", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(drafts)
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;
        let response = Self::check_status(response).await?;

        response.json::<Vec<AgentRecord>>().await.map_err(|e| {
            error!(error = %e, "Failed to parse created agents response");
            DirectoryError::Decode(e.to_string())
        })
    }

    /// Applies a partial update to one agent.
    ///
    /// Fields left as `None` are absent from the payload and untouched by
    /// the backend.
    ///
    /// # Errors
    /// Returns a `DirectoryError`; callers keep the editor open for retry.
    pub async fn update(&self, id: i64, update: &AgentUpdate) -> Result<AgentRecord> {
        debug!(agent_id = id, "updating agent");
        let url = format!("{}/agents/{}", self.base_url, id);

        let response = self
            .client
            .put(&url)
            .json(update)
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;
        let response = Self::check_status(response).await?;

        response.json::<AgentRecord>().await.map_err(|e| {
            error!(error = %e, agent_id = id, "Failed to parse updated agent response");
            DirectoryError::Decode(e.to_string())
        })
    }

    /// Deletes one agent. Any 2xx response is success; the body is ignored.
    ///
    /// # Errors
    /// Returns a `DirectoryError` on transport failure or non-success
    /// status.
    pub async fn delete(&self, id: i64) -> Result<()> {
        debug!(agent_id = id, "deleting agent");
        let url = format!("{}/agents/{}", self.base_url, id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Asks the backend to start an agent process.
    ///
    /// # Errors
    /// Returns a `DirectoryError` on transport failure, non-success
    /// status, or a body without the expected message field. An agent
    /// that is already running is `Ok(StartOutcome::AlreadyRunning)`.
    pub async fn start(&self, id: i64) -> Result<StartOutcome> {
        debug!(agent_id = id, "starting agent");
        let url = format!("{}/agents/{}/start", self.base_url, id);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;
        let response = Self::check_status(response).await?;

        let body: StartResponse = response.json().await.map_err(|e| {
            error!(error = %e, agent_id = id, "Failed to parse start response");
            DirectoryError::Decode(e.to_string())
        })?;

        if body.message == ALREADY_RUNNING_MESSAGE {
            debug!(agent_id = id, "agent was already running");
            Ok(StartOutcome::AlreadyRunning)
        } else {
            Ok(StartOutcome::Started)
        }
    }

    fn connection_error(&self, e: &reqwest::Error) -> DirectoryError {
        error!(error = %e, base_url = %self.base_url, "Failed to reach agent directory");
        if e.is_connect() {
            DirectoryError::Connection {
                base_url: self.base_url.clone(),
                detail: "connection refused. Is the backend running?".to_string(),
            }
        } else {
            DirectoryError::Connection {
                base_url: self.base_url.clone(),
                detail: e.to_string(),
            }
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!(status = %status, detail = %detail, "Agent directory returned error status");
        Err(DirectoryError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

impl Default for DirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(id: i64, name: &str, file_name: Option<&str>) -> String {
        let file_name = file_name
            .map(|f| format!(r#""file_name": "{}","#, f))
            .unwrap_or_default();
        format!(
            r#"{{
                "id": {id},
                "name": "{name}",
                "agent_type": "slack",
                "command": "python",
                "args": ["app.py"],
                "is_active": true,
                "created_at": "2024-05-01T10:30:00",
                "updated_at": "2024-05-01T10:30:00",
                {file_name}
                "file_id": {id}
            }}"#
        )
    }

    #[test]
    fn test_client_new_uses_default_base_url() {
        let client = DirectoryClient::new();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = DirectoryClient::with_base_url("http://example.test/api/v1/".to_string());
        assert_eq!(client.base_url(), "http://example.test/api/v1");
    }

    #[tokio::test]
    async fn test_list_decodes_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/agents/")
            .match_query(mockito::Matcher::UrlEncoded("skip".into(), "0".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                "[{},{}]",
                record_json(1, "alpha", Some("batch0001.json")),
                record_json(2, "beta", None)
            ))
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        let agents = client.list(0, 100).await.unwrap();

        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].name, "alpha");
        assert_eq!(agents[0].group_label.as_deref(), Some("batch0001.json"));
        assert!(agents[1].group_label.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_maps_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/agents/")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        let err = client.list(0, 100).await.unwrap_err();

        assert_eq!(
            err,
            DirectoryError::Status {
                status: 500,
                detail: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_get_fetches_single_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/agents/7")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(record_json(7, "gamma", None))
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        let agent = client.get(7).await.unwrap();

        assert_eq!(agent.id, 7);
        assert_eq!(agent.name, "gamma");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_batch_posts_drafts_and_omits_empty_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/agents/")
            .match_body(mockito::Matcher::Json(serde_json::json!([
                {"name": "alpha", "agent_type": "slack", "command": "python", "args": ["app.py"], "is_active": true}
            ])))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{}]", record_json(1, "alpha", None)))
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        let drafts = vec![AgentCreate {
            name: "alpha".to_string(),
            agent_type: "slack".to_string(),
            command: "python".to_string(),
            args: Some(vec!["app.py".to_string()]),
            env: None,
            is_active: Some(true),
            group_label: None,
        }];
        let created = client.create_batch(&drafts).await.unwrap();

        assert_eq!(created.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_puts_partial_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v1/agents/3")
            .match_body(mockito::Matcher::Json(serde_json::json!({"name": "renamed"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(record_json(3, "renamed", None))
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        let update = AgentUpdate {
            name: Some("renamed".to_string()),
            ..AgentUpdate::default()
        };
        let agent = client.update(3, &update).await.unwrap();

        assert_eq!(agent.name, "renamed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/agents/4")
            .with_status(204)
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        client.delete(4).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_distinguishes_already_running() {
        let mut server = mockito::Server::new_async().await;
        let _started = server
            .mock("POST", "/api/v1/agents/1/start")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Agent started successfully"}"#)
            .create_async()
            .await;
        let _running = server
            .mock("POST", "/api/v1/agents/2/start")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Agent is already running"}"#)
            .create_async()
            .await;

        let client = DirectoryClient::with_base_url(format!("{}/api/v1", server.url()));
        assert_eq!(client.start(1).await.unwrap(), StartOutcome::Started);
        assert_eq!(client.start(2).await.unwrap(), StartOutcome::AlreadyRunning);
    }

    #[tokio::test]
    async fn test_connection_error_names_base_url() {
        // Port 9 (discard) is a safe "nothing listening" target.
        let client = DirectoryClient::with_base_url("http://127.0.0.1:9/api/v1".to_string());
        let err = client.list(0, 10).await.unwrap_err();

        match err {
            DirectoryError::Connection { base_url, .. } => {
                assert_eq!(base_url, "http://127.0.0.1:9/api/v1");
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }
}
