/// NGTA MarketPlus (breakout console)
///
/// Polls the market data service's `/god-mode` scanner snapshot and shows the momentum
/// leaderboards plus the six multi-timeframe breakout tables.
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, Stdout},
    sync::Mutex,
    time::Duration,
};

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ngta_console::{
    render_console, spawn_snapshot_feed, Action, ConsoleApp, FeedConfig, FeedHandle,
    HttpSnapshotSource,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "ngta_breakout=info,ngta_console=info,market_plus=info";

/// Get log file path from NGTA_LOG_FILE env var (default: ngta-console.log)
fn get_log_file() -> String {
    std::env::var("NGTA_LOG_FILE").unwrap_or_else(|_| "ngta-console.log".to_string())
}

/// Log to a file so output never lands on the alternate screen.
fn init_logging() -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_file())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let config = FeedConfig::from_env();
    let source = HttpSnapshotSource::new(&config)?;
    info!(url = %source.url(), poll_interval = ?config.poll_interval, "starting market-plus");

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let feed = spawn_snapshot_feed(source, &config);
    let result = run(&mut terminal, &feed);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    feed.shutdown().await;
    info!("market-plus stopped");

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    feed: &FeedHandle,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(250);
    let mut app = ConsoleApp::new();

    loop {
        let snapshot = feed.snapshot();
        let status = feed.status();
        terminal.draw(|f| render_console(f, &app, snapshot.as_deref(), status))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match app.handle_key(key) {
                    Action::Quit => break,
                    Action::Refresh => {
                        if !feed.refresh() {
                            warn!("manual refresh already pending");
                        }
                    }
                    Action::Redraw | Action::None => {}
                }
            }
        }
    }

    Ok(())
}
