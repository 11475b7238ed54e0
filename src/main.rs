use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use covid_trace::app::App;
use covid_trace::config::{Cli, Config};
use covid_trace::data::{self, Dataset};
use covid_trace::map::MapRenderer;
use covid_trace::scraper;
use covid_trace::trace::CovidTrace;
use covid_trace::ui;
use covid_trace::viz::Plot;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "covid-trace.log";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging(&config)?;

    if config.offline {
        info!("Offline, using cached case data");
    } else {
        let status = scraper::refresh(&config.cases_url, &config.cases_path()).await;
        info!(?status, "Case data check finished");
    }

    let app = build_app(&config)?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = run(&mut terminal, app);

    ratatui::restore();

    result
}

/// Log to a file in the log directory; the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(guard)
}

/// Load the tables, build every configured trace and the basemap
fn build_app(config: &Config) -> Result<App> {
    let dataset = Dataset::load(&config.cases_path(), &config.geocodes_path())?;

    let mut traces = Vec::with_capacity(config.traces.len());
    for entry in &config.traces {
        let trace = CovidTrace::new(
            &entry.county,
            &entry.state,
            entry.statistic,
            entry.radius_miles,
            &dataset,
        )
        .with_context(|| format!("Failed to build trace for {}, {}", entry.county, entry.state))?;
        info!(trace = %trace.label(), counties = trace.rows().len(), "Trace built");
        traces.push(trace);
    }

    let plot = Plot::new(traces, config.plot.clone()).context("Invalid plot options")?;

    // Load whatever basemap resolutions are available
    let mut map_renderer = MapRenderer::new();
    if config.data_dir.exists() {
        data::load_basemap(&mut map_renderer, &config.data_dir);
    }

    // Fall back to a simple outline if no data loaded
    if !map_renderer.has_data() {
        info!("No basemap found, using built-in outline");
        data::generate_simple_us(&mut map_renderer);
    }

    Ok(App::new(plot, map_renderer))
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let mut dirty = true;

    // Main loop
    loop {
        if dirty {
            terminal.draw(|frame| ui::render(frame, &app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        dirty = app.handle_key(key.code);
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
