// mapty-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mapty_lib::{logging, AppService, ConfiguredGeolocation};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

mod app; // Application state
mod ui; // UI rendering logic

use crate::app::App;

const LOG_FILE_NAME: &str = "mapty-tui.log";
/// Redraw interval while the map pans or the form collapses.
const ANIMATION_FRAME: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let log_path = mapty_lib::get_data_dir_util()
        .context("Failed to determine data directory")?
        .join(LOG_FILE_NAME);
    logging::init_file_logging(&log_path)
        .with_context(|| format!("Failed to open log file {log_path:?}"))?;

    let app_service = AppService::initialize().context("Failed to initialize AppService")?;
    let geolocation = ConfiguredGeolocation::new(app_service.config.home_location);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_service);
    // Lay out once so the map knows its size before the first click.
    terminal.draw(|f| ui::render_ui(f, &mut app))?;
    app.start(&geolocation);
    app.center_cursor();
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "TUI exited with an error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        let animating = app.service.tick(Instant::now());
        app.clear_expired_error();

        terminal.draw(|f| ui::render_ui(f, app))?;

        let timeout = if animating { ANIMATION_FRAME } else { IDLE_POLL };
        if event::poll(timeout)? {
            match event::read()? {
                // Only process key press events
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
