use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod analytics;
mod app;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod scrape;
mod tui;

use analytics::{Dashboard, SourceFilter, WordFilter};
use app::App;
use cli::Cli;
use config::Config;
use db::Repository;
use error::Result;
use scrape::ScrapePipeline;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // The tool is useless without storage, so a failure here ends the process.
    let repository = Repository::new(&config.db_path).await?;

    if cli.dedupe {
        let report = repository.collapse_duplicates().await?;
        println!("Removed {} duplicate articles", report.removed);
        if report.unique_index {
            println!("Unique index on link is in place");
        } else {
            println!("Could not create unique index on link (see log)");
        }
        return Ok(());
    }

    if cli.scrape {
        let pipeline = ScrapePipeline::new(&config)?;
        let report = pipeline.run(&repository).await;
        let (_, message) = report.message();
        println!("{message}");
        return Ok(());
    }

    if cli.stats {
        let articles = repository.all_articles().await?;
        let filter = if cli.sources.is_empty() {
            SourceFilter::All
        } else {
            SourceFilter::only(cli.sources)
        };
        let dashboard = Dashboard::build(&articles, &filter, cli.year, &WordFilter::ballet());
        if dashboard.is_empty() {
            tracing::warn!("No data available for visualization");
        }
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    // Initialize app
    let mut app = App::new(&config, repository).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
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
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // A scrape blocks input until it finishes; the "Scraping..." status is already drawn.
        if app.scrape_pending {
            app.run_pending_scrape().await?;
            continue;
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.show_help) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
