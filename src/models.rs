/// cumulative byte counters for one interface, as reported by the kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub rx: u64,
    pub tx: u64,
}

/// per-interval throughput in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rates {
    pub rx: u64,
    pub tx: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ByteUnit {
    /// powers of 1024 (KiB, MiB, ...).
    #[default]
    Binary,
    /// powers of 1000 (kB, MB, ...).
    Decimal,
}

impl ByteUnit {
    const BINARY: [&'static str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];
    const DECIMAL: [&'static str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

    fn base(self) -> f64 {
        match self {
            ByteUnit::Binary => 1024.0,
            ByteUnit::Decimal => 1000.0,
        }
    }

    fn labels(self) -> &'static [&'static str; 9] {
        match self {
            ByteUnit::Binary => &Self::BINARY,
            ByteUnit::Decimal => &Self::DECIMAL,
        }
    }
}

/// renders a byte count with the largest prefix that keeps the value at or above one.
///
/// raw bytes are printed without decimals, everything else with two.
pub fn format_bytes(data: f64, unit: ByteUnit) -> String {
    let base = unit.base();
    let labels = unit.labels();

    let mut value = data;
    let mut step = 0;
    while value >= base && step < labels.len() - 1 {
        value /= base;
        step += 1;
    }

    if step == 0 {
        format!("{:.0} {}", value, labels[step])
    } else {
        format!("{:.2} {}", value, labels[step])
    }
}
