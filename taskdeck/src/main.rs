//! `TaskDeck` — terminal kanban client for a REST task board.
//!
//! Launches the TUI, restores any persisted session, and talks to the
//! board server over HTTP. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Against a local server
//! cargo run --bin taskdeck
//!
//! # Against a remote server
//! cargo run --bin taskdeck -- --api-url http://boards.example.com:8080
//!
//! # Or via environment variables
//! TASKDECK_API_URL=http://boards.example.com:8080 cargo run
//! ```

use std::io;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::api::ApiClient;
use taskdeck::app::App;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::session::SessionGuard;
use taskdeck::storage::Storage;
use taskdeck::ui;
use taskdeck::worker::{self, ApiCommand, WorkerConfig};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, "taskdeck starting");

    let storage = match Storage::open_default() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(());
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config, storage).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown
/// to ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    storage: Storage,
) -> io::Result<()> {
    let api = ApiClient::new(&config.api_url);
    let guard = SessionGuard::new(storage.clone());
    let (cmd_tx, mut evt_rx) = worker::spawn_worker(
        api,
        guard,
        WorkerConfig {
            activity_limit: config.activity_limit,
            download_dir: config.download_dir.clone(),
        },
    );

    let mut app = App::new(config, storage);

    // Try to resume the previous session before showing the login screen.
    send(&mut app, &cmd_tx, ApiCommand::Restore);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // Step 2: Drain all pending ApiEvents (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            for cmd in app.apply_event(event) {
                send(&mut app, &cmd_tx, cmd);
            }
        }

        // Step 3: Fire the debounced search if its quiet period elapsed.
        if let Some(cmd) = app.tick(Instant::now()) {
            send(&mut app, &cmd_tx, cmd);
        }

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    for cmd in app.handle_key_event(key) {
                        send(&mut app, &cmd_tx, cmd);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(cmd) = app.handle_mouse_event(mouse) {
                        send(&mut app, &cmd_tx, cmd);
                    }
                }
                _ => {}
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(ApiCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Dispatch a command to the worker, surfacing channel failures in the
/// status bar.
fn send(app: &mut App, tx: &mpsc::Sender<ApiCommand>, cmd: ApiCommand) {
    match tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            app.notification = Some("busy, try again".to_string());
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            app.notification = Some("background worker stopped".to_string());
        }
    }
}
