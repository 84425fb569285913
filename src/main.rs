//! `cityweather` command line entry point

use anyhow::{Context, Result};
use cityweather::config::{CityWeatherConfig, LoggingConfig};
use cityweather::progress::IndicatifObserver;
use cityweather::shell::{self, RunStatus, Shell};
use cityweather::{ChartSize, WeatherFetcher, WeatherPipeline};
use clap::Parser;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "cityweather",
    version,
    about = "Fetch, analyze and chart the current weather of a list of cities"
)]
struct Cli {
    /// Comma-separated city list; runs once instead of prompting
    #[arg(long)]
    cities: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the SVG charts are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CityWeatherConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    if let Some(dir) = cli.output_dir {
        config.charts.output_dir = dir;
    }
    init_logging(&config.logging, cli.verbose)?;
    debug!("Configuration loaded: {:?}", config.charts);

    let fetcher = WeatherFetcher::from_config(&config)?;
    let size = ChartSize {
        width: config.charts.width,
        height: config.charts.height,
    };
    let mut shell = Shell::new(
        WeatherPipeline::new(fetcher, size),
        config.charts.output_dir.clone(),
    );

    let mut stdout = io::stdout().lock();
    match cli.cities {
        Some(cities) => {
            let status = shell.submit(&cities, &IndicatifObserver::new(), &mut stdout)?;
            if let RunStatus::Failed(err) = status {
                return Err(err).context("Run failed");
            }
            Ok(())
        }
        None => run_interactive(&mut shell, &mut stdout),
    }
}

/// Prompt for city lists until `quit`, `exit` or end of input
fn run_interactive<C, W>(shell: &mut Shell<C>, out: &mut W) -> Result<()>
where
    C: cityweather::HttpClient,
    W: Write,
{
    shell::print_banner(out)?;
    let interactive = io::stdin().is_terminal();
    info!(interactive, "Starting shell");

    while let Some(line) = read_city_list(interactive)? {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        shell.submit(&line, &IndicatifObserver::new(), out)?;
        writeln!(out)?;
        out.flush()?;
    }
    Ok(())
}

/// Next city list, `None` at end of input
fn read_city_list(interactive: bool) -> Result<Option<String>> {
    if interactive {
        return match Input::<String>::new()
            .with_prompt(shell::PROMPT)
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Ok(Some(line)),
            Err(err) => {
                debug!("Prompt closed: {}", err);
                Ok(None)
            }
        };
    }

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read city list from stdin")?;
    Ok((read > 0).then_some(line))
}

/// Logs go to stderr; stdout carries the report.
///
/// `RUST_LOG` takes precedence, then `--verbose`, then the configured level.
fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("cityweather={level},warn")))
        .context("Invalid log filter")?;

    let ansi = io::stderr().is_terminal();
    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(ansi).with_writer(io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().pretty().with_ansi(ansi).with_writer(io::stderr))
            .try_init(),
    }
    .context("Failed to initialize logging")
}
