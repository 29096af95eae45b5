//! Application state and key handling for the agent console.

use std::collections::HashSet;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::debug;

use switchboard_core::{
    ActiveAgent, AgentRecord, ChatSession, DirectoryClient, DraftEditor, EditorMode, MentionState,
    SessionNotice, StartOutcome, UNGROUPED, group_agents,
};

use crate::components::{Dialog, DialogChoice, DialogManager, ToastManager};
use crate::config::TuiConfig;

/// Which pane owns plain keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Listing,
    Chat,
}

/// One visual row of the grouped agent listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingRow {
    /// Group header with its member count
    Group { label: String, count: usize },
    /// Agent row carrying an index into the agent cache
    Agent { index: usize },
}

/// Single-line input with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    value: String,
    cursor: usize,
}

fn byte_at(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(i, _)| i)
}

impl InputBuffer {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = byte_at(&self.value, self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the char before the cursor; false when at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = byte_at(&self.value, self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Replace the whole buffer, clamping the cursor into range.
    pub fn set(&mut self, value: String, cursor: usize) {
        self.cursor = cursor.min(value.chars().count());
        self.value = value;
    }
}

/// Form field order inside the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    AgentType,
    Command,
    Args,
    Env,
    Active,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::AgentType => "Type",
            Self::Command => "Command",
            Self::Args => "Args",
            Self::Env => "Env",
            Self::Active => "Active",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::AgentType,
            Self::AgentType => Self::Command,
            Self::Command => Self::Args,
            Self::Args => Self::Env,
            Self::Env => Self::Active,
            Self::Active => Self::Name,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Name => Self::Active,
            Self::AgentType => Self::Name,
            Self::Command => Self::AgentType,
            Self::Args => Self::Command,
            Self::Env => Self::Args,
            Self::Active => Self::Env,
        }
    }
}

/// Form state layered over the draft editor: one focused field plus the
/// live edit buffer. Text fields sync into the focused draft on every
/// keystroke; Args and Env use the buffer as an entry composer.
pub struct EditorUi {
    pub editor: DraftEditor,
    pub field: FormField,
    pub buffer: InputBuffer,
    pub errors: Vec<String>,
}

impl EditorUi {
    /// Open the batch creation form.
    pub fn create() -> Self {
        Self::with_editor(DraftEditor::create_batch())
    }

    /// Open the form on an existing record.
    pub fn edit(record: &AgentRecord) -> Self {
        Self::with_editor(DraftEditor::edit_record(record))
    }

    fn with_editor(editor: DraftEditor) -> Self {
        let mut ui = Self {
            editor,
            field: FormField::Name,
            buffer: InputBuffer::default(),
            errors: Vec::new(),
        };
        ui.load_buffer();
        ui
    }

    /// Reload the edit buffer from the focused draft.
    fn load_buffer(&mut self) {
        let value = match self.field {
            FormField::Name => self.editor.focused().name.clone(),
            FormField::AgentType => self.editor.focused().agent_type.clone(),
            FormField::Command => self.editor.focused().command.clone(),
            // Composer fields start empty; Active has no buffer.
            FormField::Args | FormField::Env | FormField::Active => String::new(),
        };
        let cursor = value.chars().count();
        self.buffer.set(value, cursor);
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
        self.load_buffer();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
        self.load_buffer();
    }

    pub fn next_draft(&mut self) {
        self.focus_draft(self.editor.focused_index() + 1);
    }

    pub fn previous_draft(&mut self) {
        self.focus_draft(self.editor.focused_index().saturating_sub(1));
    }

    fn focus_draft(&mut self, index: usize) {
        self.editor.focus(index);
        self.field = FormField::Name;
        self.load_buffer();
    }

    pub fn add_draft(&mut self) {
        self.editor.add_blank();
        self.field = FormField::Name;
        self.load_buffer();
    }

    pub fn duplicate_draft(&mut self) {
        self.editor.duplicate_focused();
        self.field = FormField::Name;
        self.load_buffer();
    }

    pub fn remove_draft(&mut self) {
        self.editor.remove_focused();
        self.field = FormField::Name;
        self.load_buffer();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field == FormField::Active {
            if c == ' ' {
                self.toggle_active();
            }
            return;
        }
        self.buffer.insert_char(c);
        self.sync_text_field();
    }

    /// Backspace edits the buffer; on an empty composer buffer it pops
    /// the last committed entry instead.
    pub fn backspace(&mut self) {
        if self.field == FormField::Active {
            return;
        }
        if self.buffer.backspace() {
            self.sync_text_field();
            return;
        }
        match self.field {
            FormField::Args => {
                let count = self.editor.focused().args.len();
                if count > 0 {
                    self.editor.remove_arg(count - 1);
                }
            }
            FormField::Env => {
                let last = self.editor.focused().env.keys().last().cloned();
                if let Some(key) = last {
                    self.editor.remove_env(&key);
                }
            }
            _ => {}
        }
    }

    /// Enter: commit a composer entry, toggle Active, or advance.
    pub fn submit_field(&mut self) {
        match self.field {
            FormField::Args => {
                let arg = self.buffer.value().trim().to_string();
                if arg.is_empty() {
                    self.next_field();
                } else {
                    self.editor.push_arg(&arg);
                    self.buffer.clear();
                }
            }
            FormField::Env => {
                let entry = self.buffer.value().trim().to_string();
                if entry.is_empty() {
                    self.next_field();
                } else if let Some((key, value)) = entry.split_once('=') {
                    let key = key.trim();
                    if !key.is_empty() {
                        self.editor.set_env(key, value.trim());
                        self.buffer.clear();
                    }
                }
            }
            FormField::Active => self.toggle_active(),
            _ => self.next_field(),
        }
    }

    pub fn toggle_active(&mut self) {
        let active = !self.editor.focused().is_active;
        self.editor.set_active(active);
    }

    fn sync_text_field(&mut self) {
        let value = self.buffer.value().to_string();
        match self.field {
            FormField::Name => self.editor.set_name(&value),
            FormField::AgentType => self.editor.set_agent_type(&value),
            FormField::Command => self.editor.set_command(&value),
            _ => {}
        }
    }
}

/// Top-level application state.
pub struct App {
    /// Whether to quit
    pub should_quit: bool,
    /// Backend base URL shown in the header
    pub base_url: String,
    /// Directory REST client
    pub directory: DirectoryClient,
    /// Chat session and stream
    pub session: ChatSession,

    /// Agent cache in server order
    pub agents: Vec<AgentRecord>,
    /// Last listing load failure, shown with a retry hint
    pub load_error: Option<String>,
    /// Agents started from this console
    pub running: HashSet<i64>,
    /// Grouped listing rows projected from the cache
    pub rows: Vec<ListingRow>,
    /// Selected row index (always an agent row when one exists)
    pub selected_row: usize,

    /// Focused pane
    pub focus: Focus,
    /// Chat input line
    pub chat_input: InputBuffer,
    /// Mention autocomplete state
    pub mention: MentionState,

    /// Open form editor, if any
    pub editor: Option<EditorUi>,
    /// Confirmation dialogs
    pub dialog_manager: DialogManager,
    /// Toast notifications
    pub toast_manager: ToastManager,
    /// Maximum chat messages rendered
    pub max_messages: usize,

    /// Agent ids awaiting delete confirmation
    pending_delete: Vec<i64>,
}

impl App {
    pub fn new(config: &TuiConfig) -> Self {
        let base_url = config.api.base_url.clone();
        Self {
            should_quit: false,
            directory: DirectoryClient::with_base_url(base_url.clone()),
            session: ChatSession::new(base_url.clone()),
            base_url,
            agents: Vec::new(),
            load_error: None,
            running: HashSet::new(),
            rows: Vec::new(),
            selected_row: 0,
            focus: Focus::Listing,
            chat_input: InputBuffer::default(),
            mention: MentionState::new(),
            editor: None,
            dialog_manager: DialogManager::new(),
            toast_manager: ToastManager::new(),
            max_messages: config.ui.max_messages,
            pending_delete: Vec::new(),
        }
    }

    /// Per-frame upkeep: expire toasts and drain session notices.
    pub fn on_tick(&mut self) {
        self.toast_manager.update();
        for notice in self.session.poll_notices() {
            match notice {
                SessionNotice::Connected { agent } => self
                    .toast_manager
                    .success(format!("Connected to {agent}")),
                SessionNotice::ConnectionError { detail } => self
                    .toast_manager
                    .error(format!("Connection error: {detail}")),
            }
        }
    }

    /// Reload the agent cache and rebuild the grouped rows.
    pub async fn refresh_agents(&mut self) {
        match self.directory.list(0, 100).await {
            Ok(agents) => {
                debug!(count = agents.len(), "agent directory refreshed");
                self.set_agents(agents);
            }
            Err(e) => {
                self.load_error = Some(e.to_string());
                self.toast_manager
                    .error(format!("Failed to load agents: {e}"));
            }
        }
    }

    /// Replace the agent cache and rebuild the grouped rows.
    pub fn set_agents(&mut self, agents: Vec<AgentRecord>) {
        self.agents = agents;
        self.load_error = None;
        self.rebuild_rows();
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        for group in group_agents(&self.agents) {
            self.rows.push(ListingRow::Group {
                label: group.label.clone(),
                count: group.members.len(),
            });
            for index in group.members {
                self.rows.push(ListingRow::Agent { index });
            }
        }

        let ids: HashSet<i64> = self.agents.iter().map(|a| a.id).collect();
        self.running.retain(|id| ids.contains(id));
        self.clamp_selection();
    }

    /// Snap the selection onto an agent row, preferring the next one.
    fn clamp_selection(&mut self) {
        let is_agent =
            |row: &ListingRow| matches!(row, ListingRow::Agent { .. });
        if self.rows.get(self.selected_row).is_some_and(is_agent) {
            return;
        }
        let start = self.selected_row.min(self.rows.len());
        let next = self.rows[start..]
            .iter()
            .position(is_agent)
            .map(|offset| start + offset);
        let previous = self.rows[..start].iter().rposition(is_agent);
        self.selected_row = next.or(previous).unwrap_or(0);
    }

    fn move_selection(&mut self, down: bool) {
        let mut index = self.selected_row;
        loop {
            if down {
                if index + 1 >= self.rows.len() {
                    return;
                }
                index += 1;
            } else {
                if index == 0 {
                    return;
                }
                index -= 1;
            }
            if matches!(self.rows[index], ListingRow::Agent { .. }) {
                self.selected_row = index;
                return;
            }
        }
    }

    pub fn selected_agent(&self) -> Option<&AgentRecord> {
        match self.rows.get(self.selected_row)? {
            ListingRow::Agent { index } => self.agents.get(*index),
            ListingRow::Group { .. } => None,
        }
    }

    /// Key hints for the footer, matching the active surface.
    pub fn footer_hints(&self) -> &'static str {
        if self.dialog_manager.is_open() {
            return "↑/↓ Navigate  Enter confirm  Esc cancel";
        }
        if let Some(ui) = &self.editor {
            return if ui.editor.is_editing() {
                "↑/↓ Fields  Enter next/add  Ctrl+S save  Esc cancel"
            } else {
                "↑/↓ Fields  Enter next/add  PgUp/PgDn agent  Ctrl+N add  Ctrl+D duplicate  Ctrl+X remove  Ctrl+S save  Esc cancel"
            };
        }
        match self.focus {
            Focus::Listing => {
                "↑/↓ Select  Enter edit  n New  s Start  c Chat  d Delete  r Refresh  Tab chat  q Quit"
            }
            Focus::Chat => "@ Mention agents  Enter send  Ctrl+D disconnect  Tab agents  Ctrl+C quit",
        }
    }

    pub async fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        // Global quit
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if self.dialog_manager.is_open() {
            match self.dialog_manager.handle_key(key) {
                Some(value) if value == "delete" => self.delete_pending().await,
                Some(_) => self.pending_delete.clear(),
                None => {
                    if !self.dialog_manager.is_open() {
                        self.pending_delete.clear();
                    }
                }
            }
            return Ok(());
        }

        if self.editor.is_some() {
            self.handle_editor_key(key, modifiers).await;
            return Ok(());
        }

        match key {
            KeyCode::Tab if self.focus == Focus::Chat && self.mention.is_active() => {
                self.commit_mention();
            }
            KeyCode::Tab | KeyCode::BackTab => self.cycle_focus(),
            _ => match self.focus {
                Focus::Listing => self.handle_listing_key(key).await,
                Focus::Chat => self.handle_chat_key(key, modifiers),
            },
        }
        Ok(())
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Listing => Focus::Chat,
            Focus::Chat => Focus::Listing,
        };
    }

    async fn handle_listing_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Char('r') => self.refresh_agents().await,
            KeyCode::Char('n') => self.editor = Some(EditorUi::create()),
            KeyCode::Enter => self.open_edit_editor().await,
            KeyCode::Char('s') => self.start_selected().await,
            KeyCode::Char('d') => self.confirm_delete_group(),
            KeyCode::Char('c') => self.connect_selected(),
            _ => {}
        }
    }

    async fn open_edit_editor(&mut self) {
        let Some(id) = self.selected_agent().map(|a| a.id) else {
            return;
        };
        match self.directory.get(id).await {
            Ok(record) => self.editor = Some(EditorUi::edit(&record)),
            Err(e) => self
                .toast_manager
                .error(format!("Failed to load agent: {e}")),
        }
    }

    async fn start_selected(&mut self) {
        let Some((id, is_active)) = self.selected_agent().map(|a| (a.id, a.is_active)) else {
            return;
        };
        if !is_active {
            self.toast_manager.warning("Agent is inactive".to_string());
            return;
        }
        if self.group_sibling_running(id) {
            self.toast_manager
                .warning("Another agent in this group is already running".to_string());
            return;
        }
        match self.directory.start(id).await {
            Ok(StartOutcome::Started) => {
                self.running.insert(id);
                self.toast_manager.success("Agent started".to_string());
            }
            Ok(StartOutcome::AlreadyRunning) => {
                self.running.insert(id);
                self.toast_manager
                    .warning("Agent is already running".to_string());
            }
            Err(e) => self
                .toast_manager
                .error(format!("Failed to start agent: {e}")),
        }
    }

    /// At most one agent per group is started from this console.
    fn group_sibling_running(&self, id: i64) -> bool {
        group_agents(&self.agents)
            .iter()
            .find(|g| g.members.iter().any(|&i| self.agents[i].id == id))
            .is_some_and(|group| {
                group.members.iter().any(|&i| {
                    let member = self.agents[i].id;
                    member != id && self.running.contains(&member)
                })
            })
    }

    /// Open a chat stream to the selected agent and switch to the chat
    /// pane.
    fn connect_selected(&mut self) {
        let Some(agent) = self.selected_agent() else {
            return;
        };
        self.session.connect(ActiveAgent::from_record(agent));
        self.focus = Focus::Chat;
    }

    /// Group bulk delete. The Ungrouped catch-all and groups with a
    /// running member are refused without opening the dialog.
    fn confirm_delete_group(&mut self) {
        let Some(selected_id) = self.selected_agent().map(|a| a.id) else {
            return;
        };
        let groups = group_agents(&self.agents);
        let Some(group) = groups
            .iter()
            .find(|g| g.members.iter().any(|&i| self.agents[i].id == selected_id))
        else {
            return;
        };
        if group.key == UNGROUPED {
            self.toast_manager
                .warning("Ungrouped agents cannot be deleted together".to_string());
            return;
        }
        if group
            .members
            .iter()
            .any(|&i| self.running.contains(&self.agents[i].id))
        {
            self.toast_manager
                .warning("An agent in this group is still running".to_string());
            return;
        }

        self.pending_delete = group.members.iter().map(|&i| self.agents[i].id).collect();
        let dialog = Dialog::new(
            format!(
                "Delete {} agent(s) in {}?",
                self.pending_delete.len(),
                group.label
            ),
            vec![
                DialogChoice::new("Cancel", "cancel"),
                DialogChoice::new("Delete", "delete"),
            ],
        )
        .with_detail("This removes the agents from the platform.".to_string());
        self.dialog_manager.show(dialog);
    }

    async fn delete_pending(&mut self) {
        let ids = std::mem::take(&mut self.pending_delete);
        let total = ids.len();
        if total == 0 {
            return;
        }

        let mut deleted = 0usize;
        for id in ids {
            match self.directory.delete(id).await {
                Ok(()) => {
                    deleted += 1;
                    self.running.remove(&id);
                    self.session.forget_agent(id);
                }
                Err(e) => debug!(id, error = %e, "delete failed"),
            }
        }

        if deleted == total {
            self.toast_manager
                .success(format!("Deleted {deleted} of {total} agents"));
        } else {
            self.toast_manager
                .warning(format!("Deleted {deleted} of {total} agents"));
        }
        self.refresh_agents().await;
    }

    fn handle_chat_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.disconnect();
            }
            KeyCode::Up if self.mention.is_active() => self.mention.select_previous(),
            KeyCode::Down if self.mention.is_active() => self.mention.select_next(),
            KeyCode::Esc if self.mention.is_active() => self.mention.cancel(),
            KeyCode::Enter => {
                if self.mention.is_active() && self.mention.selected().is_some() {
                    self.commit_mention();
                } else {
                    self.send_message();
                }
            }
            KeyCode::Backspace => {
                self.chat_input.backspace();
                self.update_mention();
            }
            KeyCode::Left => {
                self.chat_input.move_left();
                self.update_mention();
            }
            KeyCode::Right => {
                self.chat_input.move_right();
                self.update_mention();
            }
            KeyCode::Home => {
                self.chat_input.move_home();
                self.update_mention();
            }
            KeyCode::End => {
                self.chat_input.move_end();
                self.update_mention();
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.chat_input.insert_char(c);
                self.update_mention();
            }
            _ => {}
        }
    }

    fn update_mention(&mut self) {
        self.mention
            .update(self.chat_input.value(), self.chat_input.cursor(), &self.agents);
    }

    fn commit_mention(&mut self) {
        if let Some(commit) = self.mention.commit(self.chat_input.value()) {
            self.chat_input.set(commit.text, commit.cursor);
        }
    }

    fn send_message(&mut self) {
        let text = self.chat_input.value().trim().to_string();
        if text.is_empty() {
            return;
        }
        self.session.send(&text, &self.agents);
        self.chat_input.clear();
        self.mention.cancel();
    }

    async fn handle_editor_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => {
                self.editor = None;
                return;
            }
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit_editor().await;
                return;
            }
            _ => {}
        }

        let Some(ui) = self.editor.as_mut() else {
            return;
        };
        match key {
            KeyCode::Up => ui.previous_field(),
            KeyCode::Down => ui.next_field(),
            KeyCode::Tab => ui.next_field(),
            KeyCode::BackTab => ui.previous_field(),
            KeyCode::Enter => ui.submit_field(),
            KeyCode::Backspace => ui.backspace(),
            KeyCode::Left => ui.buffer.move_left(),
            KeyCode::Right => ui.buffer.move_right(),
            KeyCode::PageUp => ui.previous_draft(),
            KeyCode::PageDown => ui.next_draft(),
            KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => ui.add_draft(),
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                ui.duplicate_draft();
            }
            KeyCode::Char('x') if modifiers.contains(KeyModifiers::CONTROL) => ui.remove_draft(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => ui.insert_char(c),
            _ => {}
        }
    }

    async fn submit_editor(&mut self) {
        let Some(ui) = self.editor.as_mut() else {
            return;
        };

        let errors = ui.editor.validate();
        if !errors.is_empty() {
            ui.errors = errors.iter().map(ToString::to_string).collect();
            self.toast_manager
                .warning("Fix the highlighted fields first".to_string());
            return;
        }
        ui.errors.clear();

        match ui.editor.mode() {
            EditorMode::CreateBatch => {
                let payload = ui.editor.create_payload();
                match self.directory.create_batch(&payload).await {
                    Ok(created) => {
                        self.toast_manager
                            .success(format!("Created {} agent(s)", created.len()));
                        self.editor = None;
                        self.refresh_agents().await;
                    }
                    Err(e) => self
                        .toast_manager
                        .error(format!("Failed to create agents: {e}")),
                }
            }
            EditorMode::EditExisting { id } => {
                let payload = ui.editor.update_payload();
                match self.directory.update(id, &payload).await {
                    Ok(updated) => {
                        self.toast_manager
                            .success(format!("Updated {}", updated.name));
                        self.editor = None;
                        self.refresh_agents().await;
                    }
                    Err(e) => self
                        .toast_manager
                        .error(format!("Failed to update agent: {e}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_buffer_insert_and_backspace() {
        let mut input = InputBuffer::default();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.value(), "héllo");
        assert_eq!(input.cursor(), 5);

        input.move_left();
        input.move_left();
        input.insert_char('!');
        assert_eq!(input.value(), "hél!lo");

        assert!(input.backspace());
        assert_eq!(input.value(), "héllo");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_input_buffer_backspace_at_start() {
        let mut input = InputBuffer::default();
        input.insert_char('a');
        input.move_home();
        assert!(!input.backspace());
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_input_buffer_set_clamps_cursor() {
        let mut input = InputBuffer::default();
        input.set("ab".to_string(), 9);
        assert_eq!(input.cursor(), 2);
        input.move_right();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_form_field_cycle() {
        let mut field = FormField::Name;
        for _ in 0..6 {
            field = field.next();
        }
        assert_eq!(field, FormField::Name);
        assert_eq!(FormField::Name.previous(), FormField::Active);
    }

    #[test]
    fn test_editor_ui_composer_entries() {
        let mut ui = EditorUi::create();
        ui.field = FormField::Args;
        ui.load_buffer();

        for c in "--verbose".chars() {
            ui.insert_char(c);
        }
        ui.submit_field();
        assert_eq!(
            ui.editor.focused().args,
            vec!["app.py".to_string(), "--verbose".to_string()]
        );
        assert!(ui.buffer.is_empty());

        // Backspace on the empty composer pops the last entry.
        ui.backspace();
        assert_eq!(ui.editor.focused().args, vec!["app.py".to_string()]);
    }

    #[test]
    fn test_editor_ui_env_composer() {
        let mut ui = EditorUi::create();
        ui.field = FormField::Env;
        ui.load_buffer();

        for c in "TOKEN=abc".chars() {
            ui.insert_char(c);
        }
        ui.submit_field();
        assert_eq!(ui.editor.focused().env["TOKEN"], "abc");

        ui.backspace();
        assert!(ui.editor.focused().env.is_empty());
    }

    #[test]
    fn test_editor_ui_text_fields_sync() {
        let mut ui = EditorUi::create();
        for c in "billing-bot".chars() {
            ui.insert_char(c);
        }
        assert_eq!(ui.editor.focused().name, "billing-bot");

        ui.next_field();
        assert_eq!(ui.field, FormField::AgentType);
        assert!(ui.buffer.is_empty());
    }
}
