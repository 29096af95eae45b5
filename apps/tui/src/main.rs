//! Switchboard TUI - Management console for the MCP agent platform
//!
//! A terminal interface for browsing, editing, starting, and chatting
//! with the agents registered on a platform backend.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchboard_tui::app::App;
use switchboard_tui::components::{render_dialog, render_toasts};
use switchboard_tui::config::TuiConfig;
use switchboard_tui::views::{
    render_chat, render_editor, render_footer, render_header, render_listing, split_body,
    split_screen,
};

/// Terminal console for the multi MCP agent platform.
#[derive(Parser, Debug)]
#[command(
    name = "switchboard",
    author,
    version,
    about = "Terminal console for the multi MCP agent platform"
)]
struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to an alternate config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Minimal logging, off unless explicitly requested
    let log_enabled = std::env::var("SWITCHBOARD_LOG").is_ok();
    if log_enabled {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "switchboard_tui=debug,switchboard_core=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "off".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(|| std::io::sink()))
            .init();
    }

    let mut config = match &args.config {
        Some(path) => TuiConfig::load_from(path)?,
        None => TuiConfig::load()?,
    };
    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url;
    }
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(&config);
    app.refresh_agents().await;

    let outcome = run(&mut terminal, &mut app, tick_rate).await;

    // Hand the terminal back before surfacing any error
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    outcome
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|frame| draw(frame, app))?;

        // The input poll doubles as the tick timer
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers).await?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let padded_area = area.inner(Margin::new(1, 1));

    let [header_area, main_area, footer_area] = split_screen(padded_area);

    render_header(frame, header_area, app);

    if let Some(editor) = &app.editor {
        render_editor(frame, main_area, editor);
    } else {
        let [listing_area, chat_area] = split_body(main_area);
        render_listing(frame, listing_area, app);
        render_chat(frame, chat_area, app);
    }

    render_footer(frame, footer_area, app.footer_hints());

    if let Some(dialog) = app.dialog_manager.current() {
        render_dialog(frame, area, dialog);
    }

    // Toasts on top of everything
    render_toasts(frame, area, &app.toast_manager);
}
