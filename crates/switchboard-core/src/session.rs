//! Chat session against a running agent.
//!
//! Owns the message timeline and the single live WebSocket connection.
//! The socket is serviced by a spawned task that reports back over an
//! unbounded channel; the UI loop drains `poll_notices` every tick.
//! Connections carry a generation number so events from a superseded
//! socket are discarded after the session has already applied its close.

use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error};

use futures::{SinkExt, StreamExt};

use crate::agent::AgentRecord;
use crate::grouping::display_label;
use crate::mention::extract_mentions;

/// System message seeding every new session timeline.
const WELCOME_MESSAGE: &str = "Welcome to the Agent Platform! You can mention agents using @ symbol (e.g., @slack-agent-1).";

/// Reason shown when a close carries none.
const CLOSE_FALLBACK_REASON: &str = "Connection closed";

/// Delay before a locally synthesized reply is appended.
const SIMULATED_REPLY_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

/// Role of a timeline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One entry of the append-only session timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
}

/// Connection state. Linear; there is no retry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

/// The agent a connection targets. Kept after a remote close so mention
/// routing knows a selection exists; cleared when the disconnect action
/// tears down a live stream, when the record is deleted, or replaced by
/// the next connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAgent {
    pub id: i64,
    pub name: String,
    /// Display label of the agent's group, when it has one.
    pub group: Option<String>,
}

impl ActiveAgent {
    /// Build from a directory record, deriving the group display label.
    pub fn from_record(record: &AgentRecord) -> Self {
        let group = record
            .group_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .map(display_label);
        Self {
            id: record.id,
            name: record.name.clone(),
            group,
        }
    }

    /// Name with the group label appended when there is one.
    pub fn display_name(&self) -> String {
        match &self.group {
            Some(group) => format!("{} ({group})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Toast-worthy happenings surfaced by `poll_notices`. Timeline appends
/// and state changes are applied internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// The stream reached connected state.
    Connected { agent: String },
    /// The stream reported an error; the close transition follows
    /// separately.
    ConnectionError { detail: String },
}

#[derive(Debug)]
enum SessionEvent {
    Opened { conn: u64 },
    Frame { conn: u64, text: String },
    Failed { conn: u64, detail: String },
    Closed { conn: u64, reason: Option<String> },
    Simulated { text: String },
}

/// Chat session with the message timeline and at most one live stream.
pub struct ChatSession {
    base_url: String,
    state: SessionState,
    active_agent: Option<ActiveAgent>,
    messages: Vec<ChatMessage>,
    next_message_id: u64,
    /// Generation of the current connection; events from older
    /// generations are dropped.
    conn_seq: u64,
    outbound: Option<mpsc::UnboundedSender<String>>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl ChatSession {
    /// Create a disconnected session. `base_url` is the REST base
    /// (including the API prefix); the stream URL is derived from it.
    pub fn new(base_url: String) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            base_url,
            state: SessionState::Disconnected,
            active_agent: None,
            messages: Vec::new(),
            next_message_id: 1,
            conn_seq: 0,
            outbound: None,
            events_tx,
            events_rx,
        };
        session.push_message(ChatRole::System, WELCOME_MESSAGE.to_string());
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    pub fn active_agent(&self) -> Option<&ActiveAgent> {
        self.active_agent.as_ref()
    }

    /// The append-only timeline, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Open a stream to `agent`, tearing down any prior connection
    /// first. The old connection's close transition is applied here,
    /// before the new connection can ever reach connected.
    pub fn connect(&mut self, agent: ActiveAgent) {
        if self.outbound.is_some() {
            self.apply_close(None);
        }
        self.conn_seq += 1;
        let conn = self.conn_seq;
        let url = agent_ws_url(&self.base_url, agent.id);
        debug!(agent_id = agent.id, url = %url, "opening agent stream");

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        self.outbound = Some(outbound_tx);
        self.state = SessionState::Connecting;
        self.active_agent = Some(agent);
        tokio::spawn(stream_task(url, conn, self.events_tx.clone(), outbound_rx));
    }

    /// Close the live stream and clear the agent selection immediately,
    /// without waiting for the socket's close handshake. Without a live
    /// stream this does nothing; a selection left behind by a remote
    /// close stays in place.
    pub fn disconnect(&mut self) {
        if self.outbound.is_none() {
            return;
        }
        self.apply_close(None);
        self.conn_seq += 1;
        self.active_agent = None;
    }

    /// Drop the selection when it points at `agent_id`, tearing down any
    /// live stream to it first. Used when the record is deleted.
    pub fn forget_agent(&mut self, agent_id: i64) {
        if self.active_agent.as_ref().map(|a| a.id) != Some(agent_id) {
            return;
        }
        self.disconnect();
        self.active_agent = None;
    }

    /// Submit user input. The text is always appended as a user message.
    /// When connected it is forwarded verbatim; otherwise mentions are
    /// resolved against `agents` to either auto-connect (first matched
    /// agent, when none is selected) or schedule a simulated reply.
    pub fn send(&mut self, text: &str, agents: &[AgentRecord]) {
        self.push_message(ChatRole::User, text.to_string());

        if self.state == SessionState::Connected {
            if let Some(outbound) = &self.outbound {
                if outbound.send(text.to_string()).is_ok() {
                    return;
                }
            }
        }

        let mentions = extract_mentions(text);
        if !mentions.is_empty() && self.active_agent.is_none() {
            let matched = agents
                .iter()
                .find(|agent| mentions.iter().any(|m| m == &agent.name));
            if let Some(first) = matched {
                let name = first.name.clone();
                self.connect(ActiveAgent::from_record(first));
                self.push_message(ChatRole::System, format!("Connecting to agent: {name}..."));
                return;
            }
        }

        self.schedule_simulated(simulated_reply(text, agents));
    }

    /// Drain pending stream events, apply their transitions to the
    /// timeline and state, and return anything toast-worthy.
    pub fn poll_notices(&mut self) -> Vec<SessionNotice> {
        let mut notices = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                SessionEvent::Opened { conn } if conn == self.conn_seq => {
                    self.state = SessionState::Connected;
                    let agent = self
                        .active_agent
                        .as_ref()
                        .map(ActiveAgent::display_name)
                        .unwrap_or_default();
                    self.push_message(ChatRole::System, format!("Connected to {agent}"));
                    notices.push(SessionNotice::Connected { agent });
                }
                SessionEvent::Frame { conn, text } if conn == self.conn_seq => {
                    let content = frame_content(&text);
                    self.push_message(ChatRole::Assistant, content);
                }
                SessionEvent::Failed { conn, detail } if conn == self.conn_seq => {
                    error!(detail = %detail, "agent stream error");
                    notices.push(SessionNotice::ConnectionError { detail });
                }
                SessionEvent::Closed { conn, reason } if conn == self.conn_seq => {
                    self.apply_close(reason);
                }
                SessionEvent::Simulated { text } => {
                    self.push_message(ChatRole::Assistant, text);
                }
                // Event from a superseded connection.
                _ => {}
            }
        }
        notices
    }

    /// Apply the close transition: system message, disconnected state,
    /// dropped connection handle. The agent selection stays.
    fn apply_close(&mut self, reason: Option<String>) {
        let reason = reason.unwrap_or_else(|| CLOSE_FALLBACK_REASON.to_string());
        debug!(reason = %reason, "agent stream closed");
        self.push_message(ChatRole::System, format!("Disconnected from agent: {reason}"));
        self.state = SessionState::Disconnected;
        self.outbound = None;
    }

    fn schedule_simulated(&self, text: String) {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SIMULATED_REPLY_DELAY).await;
            let _ = events.send(SessionEvent::Simulated { text });
        });
    }

    fn push_message(&mut self, role: ChatRole, content: String) {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(ChatMessage { id, role, content });
    }
}

/// Stream URL for one agent, derived from the REST base URL by swapping
/// the scheme.
pub fn agent_ws_url(base_url: &str, agent_id: i64) -> String {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{ws_base}/agents/ws/{agent_id}")
}

/// Inbound frames are either JSON with a scalar `message` field or
/// shown verbatim. Empty strings, zero, false, and null all fall back
/// to the raw frame text.
fn frame_content(text: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return text.to_string();
    };
    match value.get("message") {
        Some(serde_json::Value::String(message)) if !message.is_empty() => message.clone(),
        Some(serde_json::Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(serde_json::Value::Bool(true)) => "true".to_string(),
        _ => text.to_string(),
    }
}

/// Build the delayed local reply for a message sent while disconnected.
fn simulated_reply(text: &str, agents: &[AgentRecord]) -> String {
    let mentions = extract_mentions(text);
    if mentions.is_empty() {
        return "I received your message.".to_string();
    }

    let matched: Vec<&AgentRecord> = agents
        .iter()
        .filter(|agent| mentions.iter().any(|m| m == &agent.name))
        .collect();
    if matched.is_empty() {
        return "I couldn't find any of the mentioned agents in the system.".to_string();
    }

    let names = matched
        .iter()
        .map(|agent| agent.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let details = matched
        .iter()
        .map(|agent| {
            format!(
                "- {} ({}): {}",
                agent.name,
                agent.agent_type,
                agent.command_line()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "I'll process your request using the {names} agent(s).\n\nAgent details:\n{details}\n\nTo connect to an agent, mention it with @name."
    )
}

/// Services one WebSocket connection: forwards outbound texts, reports
/// inbound frames and lifecycle events tagged with the connection
/// generation. Ends when either side closes.
async fn stream_task(
    url: String,
    conn: u64,
    events: mpsc::UnboundedSender<SessionEvent>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let (mut ws, _) = match connect_async(&url).await {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, url = %url, "failed to open agent stream");
            let _ = events.send(SessionEvent::Failed {
                conn,
                detail: e.to_string(),
            });
            let _ = events.send(SessionEvent::Closed { conn, reason: None });
            return;
        }
    };
    let _ = events.send(SessionEvent::Opened { conn });

    loop {
        tokio::select! {
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(SessionEvent::Frame {
                        conn,
                        text: text.to_string(),
                    });
                }
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .filter(|r| !r.is_empty());
                    let _ = events.send(SessionEvent::Closed { conn, reason });
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let _ = events.send(SessionEvent::Failed {
                        conn,
                        detail: e.to_string(),
                    });
                    let _ = events.send(SessionEvent::Closed { conn, reason: None });
                    break;
                }
                None => {
                    let _ = events.send(SessionEvent::Closed { conn, reason: None });
                    break;
                }
            },
            message = outbound.recv() => match message {
                Some(text) => {
                    if ws.send(Message::text(text)).await.is_err() {
                        let _ = events.send(SessionEvent::Closed { conn, reason: None });
                        break;
                    }
                }
                // Session side hung up; its close transition is already
                // applied, so just shut the socket down.
                None => {
                    let _ = ws.close(None).await;
                    break;
                }
            },
        }
    }
}
