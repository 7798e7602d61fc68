use crate::error::{Error, Result};
use crate::models::Counters;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PROC_NET_DEV: &str = "/proc/net/dev";
pub const SYS_CLASS_NET: &str = "/sys/class/net";

// `IFF_*` bits from <net/if.h>, as exposed in /sys/class/net/<iface>/flags.
const IFF_UP: u32 = 0x1;
const IFF_LOOPBACK: u32 = 0x8;
const IFF_RUNNING: u32 = 0x40;

/// a source of cumulative byte counters for a named interface.
pub trait CounterSource {
    fn read_counters(&self, interface: &str) -> Result<Counters>;
}

/// counters backed by `/proc/net/dev`.
#[derive(Debug, Clone)]
pub struct ProcNetDev {
    path: PathBuf,
}

impl Default for ProcNetDev {
    fn default() -> Self {
        Self::new(PROC_NET_DEV)
    }
}

impl ProcNetDev {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CounterSource for ProcNetDev {
    fn read_counters(&self, interface: &str) -> Result<Counters> {
        let file = File::open(&self.path).map_err(|e| Error::counter_io(interface, e))?;
        parse_proc_net_dev(BufReader::new(file))
            .map_err(|e| Error::counter_io(interface, e))?
            .into_iter()
            .find(|(name, _)| name == interface)
            .map(|(_, counters)| counters)
            .ok_or_else(|| Error::counter_unavailable(interface))
    }
}

/// parses the per-interface rows of `/proc/net/dev`.
///
/// each row is `name: <8 receive fields> <8 transmit fields>`; bytes are the first field of
/// each group. the two header lines and malformed rows are skipped.
pub fn parse_proc_net_dev(reader: impl BufRead) -> io::Result<Vec<(String, Counters)>> {
    let mut output = Vec::new();

    for line in reader.lines().skip(2) {
        let line = line?;
        let Some((name, values)) = line.split_once(':') else {
            continue;
        };

        let values: Vec<u64> = values
            .split_whitespace()
            .filter_map(|x| x.parse().ok())
            .collect();

        if values.len() != 16 {
            continue;
        }

        let counters = Counters {
            rx: values[0],
            tx: values[8],
        };
        output.push((name.trim().to_string(), counters));
    }

    Ok(output)
}

/// returns the first interface, by name, that is up, running and not a loopback.
pub fn detect_default_interface(sys_class_net: impl AsRef<Path>) -> Result<String> {
    let root = sys_class_net.as_ref();
    let entries = fs::read_dir(root).map_err(|_| Error::NoInterfaceFound)?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    for name in names {
        let Some(flags) = read_flags(&root.join(&name).join("flags")) else {
            continue;
        };
        debug!(interface = %name, flags, "inspecting interface");

        if flags & IFF_LOOPBACK != 0 {
            continue;
        }
        if flags & IFF_UP != 0 && flags & IFF_RUNNING != 0 {
            return Ok(name);
        }
    }

    Err(Error::NoInterfaceFound)
}

fn read_flags(path: &Path) -> Option<u32> {
    let raw = fs::read_to_string(path).ok()?;
    let hex = raw.trim().trim_start_matches("0x");
    u32::from_str_radix(hex, 16).ok()
}
