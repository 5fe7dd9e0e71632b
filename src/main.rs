use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use minimax_connect_four::ai::log_worker_panics;
use minimax_connect_four::config::{AppConfig, LoggingConfig};
use minimax_connect_four::controller::{GameObserver, TurnController, TurnState};
use minimax_connect_four::game::Board;
use minimax_connect_four::ui::App;

const HEADLESS_USAGE: &str = "Enter a column (1-7), 'r' to restart, 'd <depth>' or 'q' to quit.";

/// Play Connect Four against a minimax AI.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against a minimax AI")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the AI search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Play on stdin/stdout instead of the terminal UI
    #[arg(long)]
    headless: bool,

    /// Override the log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(depth) = cli.depth {
        app_config.search.depth = depth;
    }
    if let Some(path) = cli.log_file {
        app_config.logging.file = Some(path);
    }
    app_config.validate().context("invalid configuration")?;

    init_logging(&app_config.logging, cli.headless)?;
    info!(depth = app_config.search.depth, headless = cli.headless, "starting");

    if cli.headless {
        run_headless(&app_config)
    } else {
        run_tui(&app_config)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log filter '{}'", logging.level))?;

    match &logging.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        // The TUI owns the terminal, so without a file there is nowhere to log
        None => {}
    }
    Ok(())
}

fn run_tui(config: &AppConfig) -> Result<()> {
    log_worker_panics();
    let mut app = App::new(config).context("starting search worker")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("terminal UI failed")
}

/// Prints every board and status line to stdout.
struct ConsoleObserver;

impl GameObserver for ConsoleObserver {
    fn on_board_changed(&mut self, board: &Board) {
        println!("\n{board}");
    }

    fn on_message(&mut self, text: &str) {
        println!("{text}");
    }
}

fn run_headless(config: &AppConfig) -> Result<()> {
    let mut controller = TurnController::new(Box::new(ConsoleObserver), config)
        .context("starting search worker")?;
    println!("{HEADLESS_USAGE}");

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let mut words = line.split_whitespace();

        // Rejected commands are already reported by the observer
        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("q"), _) => break,
            (Some("r"), _) => {
                let _ = controller.reset_game();
            }
            (Some("d"), Some(depth)) => match depth.parse() {
                Ok(depth) => {
                    let _ = controller.set_search_depth(depth);
                }
                Err(_) => println!("'{depth}' is not a depth."),
            },
            (Some(column), None) => match column.parse::<usize>() {
                Ok(column) if column >= 1 => {
                    if controller.submit_human_move(column - 1).is_ok() {
                        while !controller.wait_for_ai(Duration::from_secs(1)) {}
                    }
                }
                _ => println!("{HEADLESS_USAGE}"),
            },
            _ => println!("{HEADLESS_USAGE}"),
        }

        if matches!(controller.state(), TurnState::GameOver(_)) {
            println!("Type 'r' to play again or 'q' to quit.");
        }
    }

    controller.shutdown();
    Ok(())
}
