use crate::error::Error;
use crate::models::ByteUnit;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// rows taken by everything that isn't a graph: the title and the stats panel.
const RESERVED_ROWS: u16 = 5;

/// live bandwidth graph for a single network interface.
#[derive(Parser, Debug, Clone)]
#[command(name = "nbwmon", version, about, disable_version_flag = true)]
pub struct Config {
    /// Redraw delay in seconds.
    #[arg(short, long, default_value = "0.5", value_parser = parse_delay)]
    pub delay: f64,

    /// Network interface to monitor. Detected when omitted.
    #[arg(short, long, env = "NBWMON_INTERFACE")]
    pub interface: Option<String>,

    /// Fixed graph height in lines.
    #[arg(short = 'l', long = "lines", value_parser = parse_lines)]
    pub graph_lines: Option<u16>,

    /// Disable colors.
    #[arg(short = 'C', long)]
    pub no_colors: bool,

    /// Use SI (powers of 1000) units.
    #[arg(short, long)]
    pub si_units: bool,

    /// Hide the graph scale.
    #[arg(short = 'S', long)]
    pub hide_scale: bool,

    /// Sync the RX and TX graph maximum.
    #[arg(short = 'm', long)]
    pub sync_max: bool,

    /// Write diagnostics to this file. Filtered with RUST_LOG.
    #[arg(long, env = "NBWMON_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print version.
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code, reason = "handled by clap")]
    version: Option<bool>,
}

impl Config {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay)
    }

    pub fn byte_unit(&self) -> ByteUnit {
        if self.si_units {
            ByteUnit::Decimal
        } else {
            ByteUnit::Binary
        }
    }

    /// the height of each graph for a terminal `rows` tall.
    pub fn graph_height(&self, rows: u16) -> u16 {
        self.graph_lines
            .unwrap_or_else(|| rows.saturating_sub(RESERVED_ROWS) / 2)
            .max(1)
    }
}

fn parse_delay(s: &str) -> Result<f64, Error> {
    let invalid = |reason| Error::InvalidArgument {
        flag: "delay",
        value: s.to_string(),
        reason,
    };

    let delay = s.parse::<f64>().map_err(|_| invalid("not a number"))?;
    if !delay.is_finite() || delay <= 0.0 {
        return Err(invalid("must be a positive number of seconds"));
    }
    Ok(delay)
}

fn parse_lines(s: &str) -> Result<u16, Error> {
    let invalid = |reason| Error::InvalidArgument {
        flag: "lines",
        value: s.to_string(),
        reason,
    };

    match s.parse::<u16>() {
        Ok(0) => Err(invalid("must be at least 1")),
        Ok(lines) => Ok(lines),
        Err(_) => Err(invalid("not a whole number")),
    }
}
