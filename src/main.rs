//! Fyvio - TV series details in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Interactive series page
//! fyvio tv 1399
//!
//! # CLI mode (for automation)
//! fyvio episodes 1399 --season 2 --json
//! fyvio watch-url 1399 -s 1 -e 1
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use fyvio::api::CatalogClient;
use fyvio::app::App;
use fyvio::cli::{Cli, Command, ExitCode, Output, TvCmd};
use fyvio::commands;
use fyvio::config::Config;
use fyvio::loader::{self, FetchEvent};
use fyvio::logging::{self, LogTarget};
use fyvio::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let output = Output::new(&cli);

    let target = if cli.is_tui_mode() {
        LogTarget::default_file().unwrap_or(LogTarget::Stderr)
    } else {
        LogTarget::Stderr
    };
    if let Err(e) = logging::init(target) {
        output.info(format!("Logging disabled: {:#}", e));
    }

    let config = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs).into(),
        },
        None => Config::load(),
    };

    run(cli, config, &output).await.into()
}

/// Dispatch a parsed command and return its exit code
async fn run(cli: Cli, config: Config, output: &Output) -> ExitCode {
    let base_url = config.base_url(cli.base_url.as_deref());
    let client = CatalogClient::new(&base_url);
    tracing::debug!(%base_url, "using backend");

    match cli.command {
        Command::Tv(cmd) => match run_tui(cmd, &config, client).await {
            Ok(()) => ExitCode::Success,
            Err(e) => output.error(format!("{:#}", e), ExitCode::Error),
        },

        Command::Info(cmd) => commands::info_cmd(cmd, &client, output).await,

        Command::Similar(cmd) => commands::similar_cmd(cmd, &client, output).await,

        Command::Seasons(cmd) => commands::seasons_cmd(cmd, &client, output).await,

        Command::Episodes(cmd) => {
            let season = config.season(cmd.season);
            commands::episodes_cmd(cmd, season, &client, output).await
        }

        Command::WatchUrl(cmd) => commands::watch_url_cmd(cmd, &client, output),

        Command::Config(cmd) => {
            commands::config_cmd(cmd, config, cli.config, cli.base_url.as_deref(), output)
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive series page
async fn run_tui(cmd: TvCmd, config: &Config, client: CatalogClient) -> Result<()> {
    let client = Arc::new(client);
    let mut app = App::new(client.base_url());
    app.open_series(cmd.id, config.season(cmd.season));

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, client).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop: spawn queued fetches, apply finished ones, draw, read keys
async fn run_event_loop(terminal: &mut Tui, app: &mut App, client: Arc<CatalogClient>) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel::<FetchEvent>();
    let mut title: Option<String> = None;

    while app.running {
        for request in app.drain_requests() {
            loader::spawn_fetch(Arc::clone(&client), request, tx.clone());
        }

        while let Ok(fetched) = rx.try_recv() {
            app.handle_fetch(fetched);
        }

        sync_title(terminal, app, &mut title)?;
        terminal.draw(|frame| {
            let area = frame.area();
            ui::render_page(frame, area, app);
        })?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.on_tick();
    }

    Ok(())
}

/// Keep the window title in step with the loaded series
fn sync_title(terminal: &mut Tui, app: &App, current: &mut Option<String>) -> Result<()> {
    let Some(details) = app.page.details.as_ref() else {
        return Ok(());
    };
    let wanted = details.page_title();
    if current.as_deref() != Some(wanted.as_str()) {
        tracing::info!(title = %wanted, description = %details.page_description(), "page loaded");
        execute!(terminal.backend_mut(), SetTitle(&wanted))?;
        *current = Some(wanted);
    }
    Ok(())
}
