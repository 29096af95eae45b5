//! Draft editor state for agent creation and editing.
//!
//! Holds the in-memory list of agent drafts behind the create/edit form:
//! one draft per tab, one focused at a time, with typed per-field setters,
//! submit-time validation, and payload builders. No I/O happens here; the
//! UI drives submission through the directory client.

use indexmap::IndexMap;
use thiserror::Error;

use crate::agent::{AgentCreate, AgentRecord, AgentUpdate};

/// Command pre-filled into a blank draft.
const DEFAULT_COMMAND: &str = "python";
/// Argument list pre-filled into a blank draft.
const DEFAULT_ARG: &str = "app.py";

/// A validation failure, reported together with all others at submit time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("agent {position}: name is required")]
    MissingName { position: usize },

    #[error("agent {position}: agent type is required")]
    MissingAgentType { position: usize },

    #[error("agent {position}: command is required")]
    MissingCommand { position: usize },

    #[error("duplicate agent name '{name}'")]
    DuplicateName { name: String },
}

/// One editable draft, keyed by a local temporary id that never reaches
/// the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDraft {
    pub draft_id: u64,
    pub name: String,
    pub agent_type: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: IndexMap<String, String>,
    pub is_active: bool,
}

impl AgentDraft {
    fn blank(draft_id: u64) -> Self {
        Self {
            draft_id,
            name: String::new(),
            agent_type: String::new(),
            command: DEFAULT_COMMAND.to_string(),
            args: vec![DEFAULT_ARG.to_string()],
            env: IndexMap::new(),
            is_active: true,
        }
    }

    fn from_record(record: &AgentRecord, draft_id: u64) -> Self {
        Self {
            draft_id,
            name: record.name.clone(),
            agent_type: record.agent_type.clone(),
            command: record.command.clone(),
            args: record.args.clone().unwrap_or_default(),
            env: record.env.clone().unwrap_or_default(),
            is_active: record.is_active,
        }
    }
}

/// Whether the editor creates new agents or edits one existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// One or more drafts submitted as a single batch create.
    CreateBatch,
    /// Exactly one draft pre-filled from the record with this id; tab
    /// management is disabled.
    EditExisting { id: i64 },
}

/// State machine over a list of drafts with one focused tab.
///
/// In batch mode the editor is never empty: removing the last draft
/// immediately replaces it with a blank one.
#[derive(Debug, Clone)]
pub struct DraftEditor {
    mode: EditorMode,
    drafts: Vec<AgentDraft>,
    focused: usize,
    next_draft_id: u64,
}

impl DraftEditor {
    /// Open the editor in batch mode with a single blank draft.
    pub fn create_batch() -> Self {
        let mut editor = Self {
            mode: EditorMode::CreateBatch,
            drafts: Vec::new(),
            focused: 0,
            next_draft_id: 1,
        };
        let draft = AgentDraft::blank(editor.take_draft_id());
        editor.drafts.push(draft);
        editor
    }

    /// Open the editor on an existing record.
    pub fn edit_record(record: &AgentRecord) -> Self {
        let mut editor = Self {
            mode: EditorMode::EditExisting { id: record.id },
            drafts: Vec::new(),
            focused: 0,
            next_draft_id: 1,
        };
        let draft = AgentDraft::from_record(record, editor.take_draft_id());
        editor.drafts.push(draft);
        editor
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// True when editing an existing record (tab management disabled).
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::EditExisting { .. })
    }

    pub fn drafts(&self) -> &[AgentDraft] {
        &self.drafts
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused(&self) -> &AgentDraft {
        &self.drafts[self.focused]
    }

    /// Focus the draft at `index`; out-of-range indices are ignored.
    pub fn focus(&mut self, index: usize) {
        if index < self.drafts.len() {
            self.focused = index;
        }
    }

    /// Append a blank draft and focus it. Batch mode only.
    pub fn add_blank(&mut self) {
        if self.is_editing() {
            return;
        }
        let draft = AgentDraft::blank(self.take_draft_id());
        self.drafts.push(draft);
        self.focused = self.drafts.len() - 1;
    }

    /// Deep-copy the focused draft with a `-copy` name suffix and focus
    /// the copy. Batch mode only.
    pub fn duplicate_focused(&mut self) {
        if self.is_editing() {
            return;
        }
        let mut copy = self.focused().clone();
        copy.draft_id = self.take_draft_id();
        copy.name = format!("{}-copy", copy.name);
        self.drafts.push(copy);
        self.focused = self.drafts.len() - 1;
    }

    /// Remove the focused draft. Batch mode only. The first remaining
    /// draft takes focus; removing the last draft leaves one blank draft.
    pub fn remove_focused(&mut self) {
        if self.is_editing() {
            return;
        }
        self.drafts.remove(self.focused);
        if self.drafts.is_empty() {
            let draft = AgentDraft::blank(self.take_draft_id());
            self.drafts.push(draft);
        }
        self.focused = 0;
    }

    pub fn set_name(&mut self, name: &str) {
        self.focused_mut().name = name.to_string();
    }

    pub fn set_agent_type(&mut self, agent_type: &str) {
        self.focused_mut().agent_type = agent_type.to_string();
    }

    pub fn set_command(&mut self, command: &str) {
        self.focused_mut().command = command.to_string();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.focused_mut().is_active = is_active;
    }

    pub fn push_arg(&mut self, arg: &str) {
        self.focused_mut().args.push(arg.to_string());
    }

    /// Replace the argument at `index`; out-of-range indices are ignored.
    pub fn set_arg(&mut self, index: usize, arg: &str) {
        if let Some(slot) = self.focused_mut().args.get_mut(index) {
            *slot = arg.to_string();
        }
    }

    /// Remove the argument at `index`; out-of-range indices are ignored.
    pub fn remove_arg(&mut self, index: usize) {
        let args = &mut self.focused_mut().args;
        if index < args.len() {
            args.remove(index);
        }
    }

    /// Insert or update one environment variable.
    pub fn set_env(&mut self, key: &str, value: &str) {
        self.focused_mut()
            .env
            .insert(key.to_string(), value.to_string());
    }

    /// Remove one environment variable; unknown keys are ignored.
    pub fn remove_env(&mut self, key: &str) {
        self.focused_mut().env.shift_remove(key);
    }

    /// Check every draft and collect all violations: name, type, and
    /// command must be non-empty after trimming, and trimmed names must
    /// be unique across the batch. Each duplicated name is reported once.
    pub fn validate(&self) -> Vec<DraftError> {
        let mut errors = Vec::new();

        for (i, draft) in self.drafts.iter().enumerate() {
            let position = i + 1;
            if draft.name.trim().is_empty() {
                errors.push(DraftError::MissingName { position });
            }
            if draft.agent_type.trim().is_empty() {
                errors.push(DraftError::MissingAgentType { position });
            }
            if draft.command.trim().is_empty() {
                errors.push(DraftError::MissingCommand { position });
            }
        }

        let mut seen = Vec::new();
        let mut reported = Vec::new();
        for draft in &self.drafts {
            let name = draft.name.trim();
            if name.is_empty() {
                continue;
            }
            if seen.contains(&name) && !reported.contains(&name) {
                errors.push(DraftError::DuplicateName {
                    name: name.to_string(),
                });
                reported.push(name);
            }
            seen.push(name);
        }

        errors
    }

    /// Build the batch create payload. Empty args/env are omitted from
    /// the wire entirely.
    pub fn create_payload(&self) -> Vec<AgentCreate> {
        self.drafts
            .iter()
            .map(|draft| AgentCreate {
                name: draft.name.clone(),
                agent_type: draft.agent_type.clone(),
                command: draft.command.clone(),
                args: non_empty_args(&draft.args),
                env: non_empty_env(&draft.env),
                is_active: Some(draft.is_active),
                group_label: None,
            })
            .collect()
    }

    /// Build the single-record update payload from the focused draft,
    /// under the same empty-field omission rule.
    pub fn update_payload(&self) -> AgentUpdate {
        let draft = self.focused();
        AgentUpdate {
            name: Some(draft.name.clone()),
            agent_type: Some(draft.agent_type.clone()),
            command: Some(draft.command.clone()),
            args: non_empty_args(&draft.args),
            env: non_empty_env(&draft.env),
            is_active: Some(draft.is_active),
        }
    }

    fn focused_mut(&mut self) -> &mut AgentDraft {
        &mut self.drafts[self.focused]
    }

    fn take_draft_id(&mut self) -> u64 {
        let id = self.next_draft_id;
        self.next_draft_id += 1;
        id
    }
}

fn non_empty_args(args: &[String]) -> Option<Vec<String>> {
    if args.is_empty() {
        None
    } else {
        Some(args.to_vec())
    }
}

fn non_empty_env(env: &IndexMap<String, String>) -> Option<IndexMap<String, String>> {
    if env.is_empty() {
        None
    } else {
        Some(env.clone())
    }
}
