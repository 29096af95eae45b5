//! Mention autocomplete state management.
//!
//! Tracks whether the cursor sits inside an active `@name` token, filters
//! agent candidates against the token's search key, and splices a chosen
//! mention back into the text. Pure text/state transforms; no I/O.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::agent::AgentRecord;

/// Matches an `@` plus zero or more word characters at the end of the
/// text before the cursor. Zero word characters is a valid (empty) key.
static ACTIVE_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w*)$").expect("active token regex should be valid"));

/// Broader pattern used when routing a finished message: allows internal
/// hyphens so names like `billing-bot` resolve.
static MENTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w+(?:-\w+)*)").expect("mention regex should be valid"));

/// A single mention candidate drawn from the agent cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionCandidate {
    /// Agent name inserted on commit.
    pub name: String,
    /// Agent type, shown next to the name and matched by the filter.
    pub agent_type: String,
}

/// Result of committing a candidate: the respliced text and the new
/// cursor position (in characters), landing just after the inserted
/// trailing space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionCommit {
    pub text: String,
    pub cursor: usize,
}

/// State for the mention autocomplete popup.
///
/// `update` must be called on every text or cursor change; it re-detects
/// the active token from scratch, so deleting characters can re-enter or
/// exit suggesting state.
#[derive(Debug, Clone, Default)]
pub struct MentionState {
    /// Whether the cursor currently sits inside an active mention token.
    is_active: bool,
    /// Search key: the text between `@` and the cursor.
    query: String,
    /// Character offset of the token's `@`.
    token_start: usize,
    /// Character offset of the cursor when the token was detected.
    token_end: usize,
    /// Candidates matching the current search key.
    candidates: Vec<MentionCandidate>,
    /// Currently highlighted candidate index.
    selected_index: usize,
}

impl MentionState {
    /// Create an idle mention state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the active token and candidate list for the given text,
    /// cursor (in characters), and agent cache.
    ///
    /// Recomputation always resets the highlighted index to 0.
    pub fn update(&mut self, text: &str, cursor: usize, agents: &[AgentRecord]) {
        let prefix = &text[..byte_offset(text, cursor)];
        let Some(caps) = ACTIVE_TOKEN_REGEX.captures(prefix) else {
            self.deactivate();
            return;
        };

        let query = caps[1].to_string();
        self.token_start = cursor - query.chars().count() - 1;
        self.token_end = cursor;
        self.candidates = filter_candidates(&query, agents);
        self.query = query;
        self.is_active = true;
        self.selected_index = 0;
    }

    /// Whether the popup should be showing.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The current search key (text after `@`).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Candidates matching the current search key.
    pub fn candidates(&self) -> &[MentionCandidate] {
        &self.candidates
    }

    /// Index of the highlighted candidate.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The highlighted candidate, if any.
    pub fn selected(&self) -> Option<&MentionCandidate> {
        self.candidates.get(self.selected_index)
    }

    /// Move the highlight down one entry, clamped to the last index.
    pub fn select_next(&mut self) {
        if !self.candidates.is_empty() {
            let max_index = self.candidates.len() - 1;
            self.selected_index = (self.selected_index + 1).min(max_index);
        }
    }

    /// Move the highlight up one entry, clamped to index 0.
    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Replace the active token with `@<name> ` for the highlighted
    /// candidate and exit suggesting state.
    ///
    /// Returns `None` when not suggesting or no candidate is highlighted,
    /// in which case a confirm key should submit the message instead.
    pub fn commit(&mut self, text: &str) -> Option<MentionCommit> {
        if !self.is_active {
            return None;
        }
        let name = self.selected()?.name.clone();

        let start = byte_offset(text, self.token_start);
        let end = byte_offset(text, self.token_end);
        let commit = MentionCommit {
            text: format!("{}@{} {}", &text[..start], name, &text[end..]),
            cursor: self.token_start + name.chars().count() + 2,
        };
        self.deactivate();
        Some(commit)
    }

    /// Exit suggesting state without touching the text.
    pub fn cancel(&mut self) {
        self.deactivate();
    }

    fn deactivate(&mut self) {
        self.is_active = false;
        self.query.clear();
        self.candidates.clear();
        self.selected_index = 0;
    }
}

/// Extract mentioned names (without the `@`) from a finished message,
/// using the broader hyphen-allowing pattern.
pub fn extract_mentions(text: &str) -> Vec<String> {
    MENTION_REGEX
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// A candidate matches when its name or type contains the search key,
/// case-insensitively on both sides. An empty key matches everything.
fn filter_candidates(query: &str, agents: &[AgentRecord]) -> Vec<MentionCandidate> {
    let query = query.to_lowercase();
    agents
        .iter()
        .filter(|agent| {
            agent.name.to_lowercase().contains(&query)
                || agent.agent_type.to_lowercase().contains(&query)
        })
        .map(|agent| MentionCandidate {
            name: agent.name.clone(),
            agent_type: agent.agent_type.clone(),
        })
        .collect()
}

/// Byte offset of the given character position, saturating at the end.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn agent(name: &str, agent_type: &str) -> AgentRecord {
        let ts = NaiveDateTime::parse_from_str("2024-05-01T10:30:00", "%Y-%m-%dT%H:%M:%S")
            .unwrap();
        AgentRecord {
            id: 1,
            name: name.to_string(),
            agent_type: agent_type.to_string(),
            command: "python".to_string(),
            args: Some(vec!["app.py".to_string()]),
            env: None,
            is_active: true,
            created_at: ts,
            updated_at: ts,
            group_label: None,
            group_id: 1,
        }
    }

    fn cache() -> Vec<AgentRecord> {
        vec![
            agent("slack-agent-1", "slack"),
            agent("billing-bot", "billing"),
            agent("filer", "filesystem"),
        ]
    }

    #[test]
    fn test_activates_on_token_before_cursor() {
        let mut state = MentionState::new();
        state.update("hello @sl", 9, &cache());
        assert!(state.is_active());
        assert_eq!(state.query(), "sl");
        assert_eq!(state.candidates().len(), 1);
        assert_eq!(state.candidates()[0].name, "slack-agent-1");
    }

    #[test]
    fn test_idle_without_token_or_across_whitespace() {
        let mut state = MentionState::new();
        state.update("hello there", 11, &cache());
        assert!(!state.is_active());

        state.update("@filer check", 12, &cache());
        assert!(!state.is_active());
    }

    #[test]
    fn test_empty_query_matches_all_candidates() {
        let mut state = MentionState::new();
        state.update("@", 1, &cache());
        assert!(state.is_active());
        assert_eq!(state.query(), "");
        assert_eq!(state.candidates().len(), 3);
    }

    #[test]
    fn test_filter_matches_name_or_type_case_insensitively() {
        let mut state = MentionState::new();
        state.update("@FILE", 5, &cache());
        // "filer" by name, and "filesystem" type also contains "file".
        assert_eq!(state.candidates().len(), 1);
        assert_eq!(state.candidates()[0].name, "filer");

        state.update("@BILL", 5, &cache());
        assert_eq!(state.candidates().len(), 1);
        assert_eq!(state.candidates()[0].name, "billing-bot");
    }

    #[test]
    fn test_deleting_characters_reenters_and_exits() {
        let mut state = MentionState::new();
        state.update("@sl x", 5, &cache());
        assert!(!state.is_active());
        // Deleting back to the token re-activates.
        state.update("@sl", 3, &cache());
        assert!(state.is_active());
        state.update("", 0, &cache());
        assert!(!state.is_active());
    }

    #[test]
    fn test_update_resets_selection() {
        let mut state = MentionState::new();
        state.update("@", 1, &cache());
        state.select_next();
        assert_eq!(state.selected_index(), 1);
        state.update("@b", 2, &cache());
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let mut state = MentionState::new();
        state.update("@", 1, &cache());

        state.select_previous();
        assert_eq!(state.selected_index(), 0);

        state.select_next();
        state.select_next();
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_index(), 2);
    }

    #[test]
    fn test_commit_replaces_token_and_places_cursor() {
        let mut state = MentionState::new();
        let text = "ask @bil now";
        state.update(text, 8, &cache());
        assert_eq!(state.query(), "bil");

        let commit = state.commit(text).unwrap();
        assert_eq!(commit.text, "ask @billing-bot  now");
        // Cursor lands right after the inserted trailing space.
        assert_eq!(commit.cursor, 4 + "billing-bot".chars().count() + 2);
        assert!(!state.is_active());
    }

    #[test]
    fn test_commit_handles_multibyte_prefix() {
        let mut state = MentionState::new();
        let text = "héllo @fil";
        state.update(text, 10, &cache());
        assert!(state.is_active());

        let commit = state.commit(text).unwrap();
        assert_eq!(commit.text, "héllo @filer ");
        assert_eq!(commit.cursor, 6 + "filer".chars().count() + 2);
    }

    #[test]
    fn test_commit_inactive_or_empty_returns_none() {
        let mut state = MentionState::new();
        assert!(state.commit("text").is_none());

        state.update("@zzz", 4, &cache());
        assert!(state.is_active());
        assert!(state.candidates().is_empty());
        assert!(state.commit("@zzz").is_none());
    }

    #[test]
    fn test_cancel_keeps_text_untouched() {
        let mut state = MentionState::new();
        state.update("@sl", 3, &cache());
        assert!(state.is_active());
        state.cancel();
        assert!(!state.is_active());
        assert!(state.candidates().is_empty());
    }

    #[test]
    fn test_extract_mentions_allows_hyphens() {
        let mentions = extract_mentions("@billing-bot check @filer and email@host");
        assert_eq!(mentions, vec!["billing-bot", "filer", "host"]);
    }
}
