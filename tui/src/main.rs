//! Landing TUI Entry Point
//!
//! Launches the finantic landing page in the terminal.
//!
//! Usage:
//!   landing-tui
//!
//! Environment:
//!   LANDING_CONFIG        Path to a landing.toml
//!   LANDING_WAITLIST_URL  Waitlist endpoint (default: http://localhost:5000/api/waitlist)
//!   RUST_LOG              Log filter; logs go to `<state dir>/finantic/landing-tui.log`

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use landing_core::{load_config, ConfigOverrides};
use landing_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: landing-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or use `ssh -t` when connecting remotely.");
        std::process::exit(1);
    }

    let log_path = init_logging()?;

    let config_path = std::env::var_os("LANDING_CONFIG").map(PathBuf::from);
    let (mut config, source) = load_config(config_path.as_deref())?;
    ConfigOverrides::from_env().apply(&mut config);
    info!(%source, log = %log_path.display(), "Starting landing TUI");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut app = App::new(&config)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Log to a file so output never lands on the alternate screen
fn init_logging() -> anyhow::Result<PathBuf> {
    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("finantic");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let path = dir.join("landing-tui.log");
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("landing_tui=info".parse()?)
                .add_directive("landing_core=info".parse()?),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(path)
}
