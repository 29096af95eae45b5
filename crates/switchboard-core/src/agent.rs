//! Agent directory data model.
//!
//! Wire types for the backend's `/api/v1/agents` surface. Field names on
//! the wire are snake_case; the provenance fields `file_name`/`file_id`
//! are exposed here as `group_label`/`group_id` because the client only
//! ever uses them as an opaque grouping key.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A managed agent record as stored by the backend.
///
/// The client holds a cached, possibly stale copy; every mutation goes
/// through the directory client and is followed by a full refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Backend-assigned record id.
    pub id: i64,
    /// Agent name, unique within a provenance group.
    pub name: String,
    /// Free-form agent category (e.g., "slack", "filesystem").
    pub agent_type: String,
    /// Executable the backend launches for this agent.
    pub command: String,
    /// Ordered argument list, absent when the agent takes none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    /// Environment variables, absent when the agent needs none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    /// Whether the agent may be started at all.
    pub is_active: bool,
    /// Backend timestamps (naive ISO 8601, no offset).
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Provenance label, used only as an opaque grouping key.
    #[serde(rename = "file_name", default, skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    /// Backend-assigned group id.
    #[serde(rename = "file_id")]
    pub group_id: i64,
}

impl AgentRecord {
    /// One-line `command arg1 arg2` summary for display and simulated
    /// replies. Always carries the space after the command, matching the
    /// chat reply format even when the argument list is empty.
    pub fn command_line(&self) -> String {
        let args = self
            .args
            .as_ref()
            .map(|a| a.join(" "))
            .unwrap_or_default();
        format!("{} {}", self.command, args)
    }
}

/// Payload for one entry of a batch create request.
///
/// Optional fields are omitted from the JSON body entirely, never sent as
/// null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCreate {
    pub name: String,
    pub agent_type: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Provenance label; settable on create only.
    #[serde(rename = "file_name", skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
}

/// Partial-field update payload. Omitted fields are left untouched by the
/// backend, so every field is optional and absent unless set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
