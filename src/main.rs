use crate::app::App;
use crate::config::Config;
use crate::parser::{detect_default_interface, ProcNetDev, SYS_CLASS_NET};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod history;
mod models;
mod parser;
mod sampler;
mod theme;
mod ui;

fn main() -> ExitCode {
    let config = Config::parse();

    if let Some(path) = config.log_file.as_deref() {
        if let Err(err) = init_logging(path) {
            eprintln!("nbwmon: {err:#}");
            return ExitCode::FAILURE;
        }
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("nbwmon: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// sends diagnostics to `path`; the terminal itself belongs to the dashboard.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("can't open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn run(config: Config) -> Result<()> {
    let interface = match config.interface.clone() {
        Some(interface) => interface,
        None => detect_default_interface(SYS_CLASS_NET)?,
    };
    info!(
        "monitoring {interface} every {:.2}s, {:?} units",
        config.delay,
        config.byte_unit()
    );

    let mut terminal = ratatui::try_init().context("can't initialize terminal")?;
    let result = terminal.size().map_err(error::Error::from).and_then(|size| {
        let mut app = App::new(config, interface, ProcNetDev::default(), size.width);
        app.run(&mut terminal)
    });
    ratatui::restore();

    result?;
    info!("exiting");
    Ok(())
}
