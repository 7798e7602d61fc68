use std::io;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// the counter source could not supply byte counts for the interface.
    #[error("can't read rx and tx bytes for {interface}")]
    CounterUnavailable {
        interface: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("can't detect network interface")]
    NoInterfaceFound,

    #[error("invalid {flag} value {value:?}: {reason}")]
    InvalidArgument {
        flag: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("terminal error")]
    Terminal(#[from] io::Error),
}

impl Error {
    pub fn counter_unavailable(interface: &str) -> Self {
        Self::CounterUnavailable {
            interface: interface.to_string(),
            source: None,
        }
    }

    pub fn counter_io(interface: &str, source: io::Error) -> Self {
        Self::CounterUnavailable {
            interface: interface.to_string(),
            source: Some(source),
        }
    }
}
