//! Telemetry channel readers.

use super::record::{parse_record, RawRecord};
use super::TelemetryError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A channel yielding the newest telemetry record.
pub trait TelemetrySource: Send {
    /// Human-readable channel description for logs.
    fn describe(&self) -> String;

    /// Read the most recent record.
    ///
    /// # Errors
    /// `TelemetryError::ChannelMissing` when the channel is gone, any other
    /// variant when only this read failed.
    fn read_latest(&mut self) -> Result<RawRecord, TelemetryError>;
}

/// CSV file written by the game-side plugin.
///
/// Line 1 is a header, line 2 holds the values. The file is reopened on every
/// read so the producer can rewrite it in place.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail early when the channel does not exist.
    ///
    /// # Errors
    /// `TelemetryError::ChannelMissing`.
    pub fn probe(&self) -> Result<(), TelemetryError> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(TelemetryError::ChannelMissing(self.path.clone()))
        }
    }
}

impl TelemetrySource for CsvFileSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn read_latest(&mut self) -> Result<RawRecord, TelemetryError> {
        let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TelemetryError::ChannelMissing(self.path.clone()),
            _ => TelemetryError::Io(e.to_string()),
        })?;

        match content.lines().nth(1) {
            Some(values) => parse_record(values),
            None => Err(TelemetryError::Incomplete { found: 0 }),
        }
    }
}
