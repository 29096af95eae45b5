//! Integration tests for console state and key routing.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use switchboard_core::{AgentRecord, ChatRole};
use switchboard_tui::app::{App, Focus, ListingRow};
use switchboard_tui::config::TuiConfig;

fn agent(id: i64, name: &str, agent_type: &str, group: Option<&str>) -> AgentRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "agent_type": agent_type,
        "command": "python",
        "args": ["app.py"],
        "env": {},
        "is_active": true,
        "created_at": "2024-05-01T10:30:00",
        "updated_at": "2024-05-01T10:30:00",
        "file_name": group,
        "file_id": id
    }))
    .expect("agent fixture should deserialize")
}

/// Two slack agents in one group plus an ungrouped filesystem agent.
fn seeded_app() -> App {
    let mut app = App::new(&TuiConfig::default());
    app.set_agents(vec![
        agent(1, "slack-agent-1", "slack", Some("batch0001.json")),
        agent(2, "slack-agent-2", "slack", Some("batch0001.json")),
        agent(3, "fs-agent", "filesystem", None),
    ]);
    app
}

async fn press(app: &mut App, code: KeyCode) {
    app.handle_key(code, KeyModifiers::NONE).await.unwrap();
}

async fn press_ctrl(app: &mut App, c: char) {
    app.handle_key(KeyCode::Char(c), KeyModifiers::CONTROL)
        .await
        .unwrap();
}

async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

#[tokio::test]
async fn test_rows_carry_group_headers_and_selection_snaps() {
    let app = seeded_app();

    assert_eq!(app.rows.len(), 5);
    assert!(matches!(app.rows[0], ListingRow::Group { .. }));
    assert!(matches!(app.rows[3], ListingRow::Group { .. }));
    // Selection starts on the first agent row, not the header.
    assert_eq!(app.selected_row, 1);
}

#[tokio::test]
async fn test_selection_skips_group_headers_and_clamps() {
    let mut app = seeded_app();

    press(&mut app, KeyCode::Down).await;
    assert_eq!(app.selected_row, 2);
    press(&mut app, KeyCode::Down).await; // skips the Ungrouped header
    assert_eq!(app.selected_row, 4);
    press(&mut app, KeyCode::Down).await; // clamped at the last agent
    assert_eq!(app.selected_row, 4);

    press(&mut app, KeyCode::Up).await;
    assert_eq!(app.selected_row, 2);
    press(&mut app, KeyCode::Up).await;
    press(&mut app, KeyCode::Up).await; // clamped at the first agent
    assert_eq!(app.selected_row, 1);
    assert_eq!(
        app.selected_agent().map(|a| a.name.as_str()),
        Some("slack-agent-1")
    );
}

#[tokio::test]
async fn test_tab_cycles_focus() {
    let mut app = seeded_app();
    assert_eq!(app.focus, Focus::Listing);

    press(&mut app, KeyCode::Tab).await;
    assert_eq!(app.focus, Focus::Chat);
    press(&mut app, KeyCode::Tab).await;
    assert_eq!(app.focus, Focus::Listing);
}

#[tokio::test]
async fn test_mention_popup_opens_filters_and_commits() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Tab).await;

    type_text(&mut app, "ping @sl").await;
    assert!(app.mention.is_active());
    assert_eq!(app.mention.candidates().len(), 2);

    press(&mut app, KeyCode::Down).await;
    assert_eq!(
        app.mention.selected().map(|c| c.name.as_str()),
        Some("slack-agent-2")
    );

    // Tab commits while the popup is open instead of cycling focus.
    press(&mut app, KeyCode::Tab).await;
    assert_eq!(app.focus, Focus::Chat);
    assert_eq!(app.chat_input.value(), "ping @slack-agent-2 ");
    assert!(!app.mention.is_active());
}

#[tokio::test]
async fn test_mention_esc_cancels_popup_and_keeps_text() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Tab).await;

    type_text(&mut app, "@fs").await;
    assert!(app.mention.is_active());

    press(&mut app, KeyCode::Esc).await;
    assert!(!app.mention.is_active());
    assert_eq!(app.chat_input.value(), "@fs");
}

#[tokio::test]
async fn test_chat_enter_sends_and_clears_input() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Tab).await;

    type_text(&mut app, "hello there").await;
    press(&mut app, KeyCode::Enter).await;

    assert!(app.chat_input.is_empty());
    let messages = app.session.messages();
    let last = messages.last().unwrap();
    assert_eq!(last.role, ChatRole::User);
    assert_eq!(last.content, "hello there");
}

#[tokio::test]
async fn test_unconnected_send_gets_simulated_reply() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Tab).await;

    type_text(&mut app, "hello").await;
    press(&mut app, KeyCode::Enter).await;

    tokio::time::sleep(Duration::from_millis(1200)).await;
    app.on_tick();

    let messages = app.session.messages();
    let last = messages.last().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert_eq!(last.content, "I received your message.");
}

#[tokio::test]
async fn test_editor_collects_all_violations_and_stays_open() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('n')).await;
    assert!(app.editor.is_some());

    // Blank name and type are both reported at once.
    press_ctrl(&mut app, 's').await;
    let ui = app.editor.as_ref().unwrap();
    assert_eq!(ui.errors.len(), 2);
    assert!(ui.errors.iter().any(|e| e.contains("name is required")));
    assert!(ui.errors.iter().any(|e| e.contains("agent type is required")));
    assert!(!app.toast_manager.toasts().is_empty());
}

#[tokio::test]
async fn test_editor_typing_fills_name_and_ctrl_n_adds_draft() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('n')).await;

    type_text(&mut app, "billing-bot").await;
    let ui = app.editor.as_ref().unwrap();
    assert_eq!(ui.editor.focused().name, "billing-bot");
    assert_eq!(ui.editor.drafts().len(), 1);

    press_ctrl(&mut app, 'n').await;
    let ui = app.editor.as_ref().unwrap();
    assert_eq!(ui.editor.drafts().len(), 2);
    assert_eq!(ui.editor.focused().name, "");

    press(&mut app, KeyCode::PageUp).await;
    let ui = app.editor.as_ref().unwrap();
    assert_eq!(ui.editor.focused().name, "billing-bot");
}

#[tokio::test]
async fn test_editor_esc_closes_without_saving() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('n')).await;
    type_text(&mut app, "temp").await;

    press(&mut app, KeyCode::Esc).await;
    assert!(app.editor.is_none());

    // Listing shortcuts work again.
    press(&mut app, KeyCode::Char('q')).await;
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_start_refused_for_inactive_agent() {
    let mut app = App::new(&TuiConfig::default());
    let mut idle = agent(1, "idle-agent", "slack", None);
    idle.is_active = false;
    app.set_agents(vec![idle]);

    press(&mut app, KeyCode::Char('s')).await;
    assert!(app.running.is_empty());
    assert!(!app.toast_manager.toasts().is_empty());
}

#[tokio::test]
async fn test_start_refused_while_group_member_running() {
    let mut app = seeded_app();
    app.running.insert(1);

    press(&mut app, KeyCode::Down).await;
    assert_eq!(
        app.selected_agent().map(|a| a.name.as_str()),
        Some("slack-agent-2")
    );
    press(&mut app, KeyCode::Char('s')).await;

    assert!(!app.running.contains(&2));
    assert!(!app.toast_manager.toasts().is_empty());
}

#[tokio::test]
async fn test_delete_refused_for_ungrouped_agents() {
    let mut app = App::new(&TuiConfig::default());
    app.set_agents(vec![agent(9, "fs-agent", "filesystem", None)]);

    press(&mut app, KeyCode::Char('d')).await;
    assert!(!app.dialog_manager.is_open());
    assert!(!app.toast_manager.toasts().is_empty());
}

#[tokio::test]
async fn test_delete_refused_while_group_member_running() {
    let mut app = seeded_app();
    app.running.insert(2);

    press(&mut app, KeyCode::Char('d')).await;
    assert!(!app.dialog_manager.is_open());
    assert!(!app.toast_manager.toasts().is_empty());
}

#[tokio::test]
async fn test_delete_dialog_targets_whole_group() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('d')).await;

    let dialog = app.dialog_manager.current().unwrap();
    assert!(dialog.message.contains("2 agent(s)"));
    assert!(dialog.message.contains("Grouped Agent 0001"));
}

#[tokio::test]
async fn test_delete_dialog_cancel_leaves_agents_untouched() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('d')).await;
    assert!(app.dialog_manager.is_open());

    // Default choice is Cancel.
    press(&mut app, KeyCode::Enter).await;
    assert!(!app.dialog_manager.is_open());
    assert_eq!(app.agents.len(), 3);
}

#[tokio::test]
async fn test_delete_dialog_esc_dismisses() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('d')).await;

    press(&mut app, KeyCode::Esc).await;
    assert!(!app.dialog_manager.is_open());
}

#[tokio::test]
async fn test_ctrl_c_quits_from_any_focus() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Tab).await;

    press_ctrl(&mut app, 'c').await;
    assert!(app.should_quit);
}
