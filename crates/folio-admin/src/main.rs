//! folio-admin - terminal dashboard and command line for a certificate
//! portfolio service.
//!
//! With no arguments the dashboard opens; subcommands run a single request
//! and exit.

mod app;
mod cli;
mod form;
mod logging;
mod showcase;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use folio_core::Config;

use app::{App, AppState};
use cli::Cli;
use ui::input::{handle_input, handle_mouse};
use ui::render::render;
use ui::tabs::showcase::viewport_rows;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring unreadable config: {:#}", e);
            Config::default()
        }
    };

    if let Some(command) = cli.command {
        logging::init_stderr();
        return cli::run(command, config).await;
    }

    // The dashboard owns the terminal, so logs go to a file
    let _log_guard = logging::init_file(&config.cache_dir()?)?;
    info!("folio-admin starting");

    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if app.is_authenticated() {
        app.fetch_current_user();
    } else {
        app.start_login();
    }
    // The list is public, so load it behind the login overlay too
    app.reload_certificates();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        warn!(error = %e, "Dashboard exited with error");
        eprintln!("Error: {}", e);
    }

    info!("folio-admin shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.showcase.set_viewport_height(viewport_rows(size.height));

        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Ctrl+C always quits
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        return Ok(());
                    }

                    if handle_input(app, key).await? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        app.tick(Instant::now());
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
