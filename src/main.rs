//! IMPOSTOR - a pass-the-device party game
//!
//! Everyone gets the secret word except the impostors. Talk, vote, unmask.

mod app;
mod game;
mod storage;
mod tui;

use app::AppCoordinator;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use game::engine::GameSession;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use storage::{Storage, StorageError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::Tui;

const LOG_FILE: &str = "impostor.log";

/// Pass-the-device impostor party game
#[derive(Parser, Debug)]
#[command(name = "impostor")]
#[command(about = "Pass-the-device impostor party game", long_about = None)]
struct Args {
    /// Seed for the game RNG (deterministic deals)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the database and log (defaults to the OS data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, default_value_t = false)]
    no_save: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let data_dir = match &args.data_dir {
        Some(dir) => Some(dir.clone()),
        None => Storage::data_dir().ok(),
    };
    if let Some(dir) = data_dir.as_deref().filter(|_| !args.no_save) {
        // The terminal belongs to the UI, so logs go to a file or nowhere
        if let Err(e) = init_logging(dir) {
            eprintln!("warning: logging disabled: {}", e);
        }
    }

    let storage = open_storage(&args)?;
    let session = match args.seed {
        Some(seed) => GameSession::with_seed(seed),
        None => GameSession::new(),
    };
    info!(seed = ?args.seed, no_save = args.no_save, "starting");

    let mut app = AppCoordinator::new(storage, session);

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    let poll_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|frame| tui::render(frame, &app))?;

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.quit();
                        }
                        KeyCode::Esc => app.on_escape(),
                        KeyCode::Enter => app.on_enter(),
                        KeyCode::Up => app.on_up(),
                        KeyCode::Down => app.on_down(),
                        KeyCode::Left => app.on_left(),
                        KeyCode::Right => app.on_right(),
                        KeyCode::Tab | KeyCode::BackTab => app.on_tab(),
                        KeyCode::PageUp => app.on_page(-1),
                        KeyCode::PageDown => app.on_page(1),
                        KeyCode::Backspace => app.on_backspace(),
                        KeyCode::Delete => app.on_delete(),
                        KeyCode::Char(c) => app.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        if app.take_bell() {
            terminal.bell()?;
        }

        if app.should_quit {
            break;
        }
    }

    info!("bye");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

/// Send `tracing` output to `impostor.log` in `dir`.
fn init_logging(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Open the database the arguments ask for. A database that cannot be opened
/// is replaced by an in-memory one so the game still runs.
fn open_storage(args: &Args) -> Result<Storage, StorageError> {
    if args.no_save {
        return Storage::open_in_memory();
    }
    let opened = match &args.data_dir {
        Some(dir) => Storage::open_at(dir),
        None => Storage::open(),
    };

    opened.or_else(|e| {
        warn!(error = %e, "could not open the database, nothing will be saved");
        Storage::open_in_memory()
    })
}
