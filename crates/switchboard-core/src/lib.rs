//! Core library for the Switchboard agent console.
//!
//! This crate holds everything below the terminal UI: the agent directory
//! data model and HTTP client, the mention autocomplete state machine, the
//! draft editor used for batch creation and edits, the listing group
//! projection, and the chat session that streams to a running agent.

pub mod agent;
pub mod directory;
pub mod drafts;
pub mod grouping;
pub mod mention;
pub mod session;

pub use agent::{AgentCreate, AgentRecord, AgentUpdate};
pub use directory::{DirectoryClient, DirectoryError, StartOutcome, DEFAULT_BASE_URL};
pub use drafts::{AgentDraft, DraftEditor, DraftError, EditorMode};
pub use grouping::{group_agents, AgentGroup, UNGROUPED};
pub use mention::{extract_mentions, MentionCandidate, MentionState};
pub use session::{
    agent_ws_url, ActiveAgent, ChatMessage, ChatRole, ChatSession, SessionNotice, SessionState,
};
