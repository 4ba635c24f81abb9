//! Perch - command-line front end for the Perch launcher.
//!
//! Loads the list and tray-menu files from the data directory, runs one
//! command against them and saves whatever the command changed.

mod commands;
mod host;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use perch_core::config::ExitCodes;
use perch_core::{platform::current_platform, Launchpad, PerchError};
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "perch")]
#[command(about = "Keep and launch your shortcuts from the command line", version)]
struct Args {
    /// Directory holding perch-list.json and perch-menu.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

fn init_logging(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact();

    match EnvFilter::try_from_default_env() {
        Ok(filter) => builder.with_env_filter(filter).init(),
        Err(_) => builder.init(),
    }
}

/// `--data-dir`, or the platform default (created on first run).
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let dir = Launchpad::default_data_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;
    Ok(dir)
}

/// Whether a failed command is worth telling the user about.
fn shown_to_user(err: &anyhow::Error) -> bool {
    err.downcast_ref::<PerchError>()
        .map_or(true, PerchError::is_user_facing)
}

fn report_failure(err: &anyhow::Error) {
    if shown_to_user(err) {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
    } else {
        warn!("{:#}", err);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    info!("Starting Perch on {}", current_platform());

    let data_dir = resolve_data_dir(args.data_dir)?;
    info!("Data directory: {}", data_dir.display());

    let mut pad = match Launchpad::open(&data_dir) {
        Ok(pad) => pad,
        Err(e) => {
            error!("Failed to load launcher data: {}", e);
            eprintln!("Perch cannot start: {}", e);
            std::process::exit(e.startup_exit_code());
        }
    };
    for warning in pad.startup_warnings() {
        warn!("{}", warning);
    }

    if let Err(e) = commands::run(&mut pad, args.command) {
        report_failure(&e);
        std::process::exit(ExitCodes::GENERIC_FAILURE);
    }

    let saved = pad.save_if_dirty().context("saving changes")?;
    if saved > 0 {
        info!("Saved {} data file(s)", saved);
    }
    Ok(())
}
