//! SeedWorld - watch a population live and die on a terminal grid.
//!
//! Usage:
//!   seedworld
//!   seedworld --seed 7 --tick-delay-ms 50
//!   seedworld --headless --rows 40 --cols 120 --max-runs 5

mod bootstrap;
mod render;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, execute, terminal};
use seedworld_core::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bootstrap::Bootstrap;
use render::{GridRenderer, ProgressLog, STATS_WIDTH};

const HEADLESS_ROWS: u32 = 24;
const HEADLESS_COLS: u32 = 64;

#[derive(Parser, Debug)]
#[command(name = "seedworld", version, about = "Artificial-life simulation on a character grid")]
struct Cli {
    /// JSON config file; absent fields take their defaults
    #[arg(long, env = "SEEDWORLD_CONFIG")]
    config: Option<PathBuf>,

    /// Grid rows (default: terminal height minus one)
    #[arg(long)]
    rows: Option<u32>,

    /// Grid columns (default: terminal width minus the stats panel)
    #[arg(long)]
    cols: Option<u32>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between ticks in milliseconds
    #[arg(long)]
    tick_delay_ms: Option<u64>,

    #[arg(long)]
    initial_population: Option<u32>,

    #[arg(long)]
    initial_food: Option<u32>,

    /// Stop after this many worlds instead of restarting forever
    #[arg(long)]
    max_runs: Option<u64>,

    /// End each world after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Log destination while the grid owns the terminal
    #[arg(long, default_value = "seedworld.log")]
    log_file: PathBuf,

    /// Skip drawing; log progress to stderr instead
    #[arg(long)]
    headless: bool,
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.headless {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    } else {
        let file = File::create(&cli.log_file)
            .with_context(|| format!("failed to create log file {}", cli.log_file.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }
    if let Some(delay) = cli.tick_delay_ms {
        config.tick_delay_ms = delay;
    }
    if let Some(population) = cli.initial_population {
        config.initial_population = population;
    }
    if let Some(food) = cli.initial_food {
        config.initial_food = food;
    }
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<SimConfig> {
    let config = SimConfig::from_json_file(path)?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Explicit dimensions win; otherwise fill the terminal beside the stats panel
fn grid_size(cli: &Cli) -> Result<(u32, u32)> {
    if cli.headless {
        return Ok((
            cli.rows.unwrap_or(HEADLESS_ROWS),
            cli.cols.unwrap_or(HEADLESS_COLS),
        ));
    }
    let (term_cols, term_rows) = terminal::size().context("failed to read terminal size")?;
    let rows = cli
        .rows
        .unwrap_or_else(|| u32::from(term_rows.saturating_sub(1)));
    let cols = cli
        .cols
        .unwrap_or_else(|| u32::from(term_cols.saturating_sub(1 + STATS_WIDTH)));
    Ok((rows, cols))
}

/// Hides the cursor for the lifetime of the grid display
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        execute!(
            io::stdout(),
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(out, cursor::Show, cursor::MoveTo(0, 0));
        let _ = out.flush();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = load_config(&cli)?;
    let (rows, cols) = grid_size(&cli)?;
    config
        .validate_for_grid(rows, cols)
        .context("invalid configuration")?;
    info!(rows, cols, ?config, "starting seedworld");

    let bootstrap = Bootstrap {
        rows,
        cols,
        config,
        max_runs: cli.max_runs,
        max_ticks: cli.max_ticks,
    };

    let summaries = if cli.headless {
        bootstrap.run(vec![Box::new(ProgressLog::every(100))])?
    } else {
        let _guard = TerminalGuard::enter()?;
        bootstrap.run(vec![Box::new(GridRenderer::new(io::stdout()))])?
    };

    info!(runs = summaries.len(), "simulation finished");
    Ok(())
}
