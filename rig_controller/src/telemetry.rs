//! Telemetry ingestion.
//!
//! - [`record`] parses and normalises one channel record.
//! - [`source`] reads the newest record from the channel.
//! - [`store`] holds the latest sample, the shake queue and the ready signal.

pub mod record;
pub mod source;
pub mod store;

pub use record::{normalize, parse_record, RawRecord};
pub use source::{CsvFileSource, TelemetrySource};
pub use store::TelemetryStore;

use std::path::PathBuf;
use thiserror::Error;

/// Telemetry channel errors.
///
/// Only [`TelemetryError::ChannelMissing`] is fatal; everything else skips the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TelemetryError {
    /// The channel resource does not exist.
    #[error("Telemetry channel missing: {}", .0.display())]
    ChannelMissing(PathBuf),

    /// The channel exists but could not be read this tick.
    #[error("Telemetry channel read failed: {0}")]
    Io(String),

    /// Fewer than five fields in the record.
    #[error("Incomplete telemetry record: {found} of 5 fields")]
    Incomplete {
        /// Fields present
        found: usize,
    },

    /// A field is not a finite number.
    #[error("Malformed telemetry field '{field}': {value:?}")]
    Malformed {
        /// Field name
        field: &'static str,
        /// Raw text
        value: String,
    },
}

impl TelemetryError {
    /// Whether the controller must stop.
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ChannelMissing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_channel_is_fatal() {
        assert!(TelemetryError::ChannelMissing(PathBuf::from("x")).is_fatal());
        assert!(!TelemetryError::Io("busy".into()).is_fatal());
        assert!(!TelemetryError::Incomplete { found: 3 }.is_fatal());
        assert!(
            !TelemetryError::Malformed {
                field: "roll",
                value: "abc".into()
            }
            .is_fatal()
        );
    }
}
