//! # Telemetry sinks
//!
//! `LogTmSink` writes each frame to the log under the `tm` target, `ArchiveTmSink` appends each
//! frame as a row of a CSV archive in the session directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use std::{fs::File, io::Write};

use comms_if::tm::TmFrame;
use util::{
    archive::{ArchiveError, Archiver},
    logger::TM_TARGET,
    session::Session,
};

use crate::ports::TelemetrySink;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name of the telemetry archive, relative to the session's archive directory.
pub const TM_ARCHIVE_FILE: &str = "drive_tm.csv";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Publishes telemetry as `debug` log records.
#[derive(Debug, Default)]
pub struct LogTmSink;

/// Publishes telemetry into a CSV archive.
pub struct ArchiveTmSink<W: Write = File> {
    arch: Archiver<W>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TmSinkError {
    #[error("Could not archive the telemetry frame: {0}")]
    ArchiveError(#[from] ArchiveError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TelemetrySink for LogTmSink {
    fn publish(&mut self, frame: &TmFrame) -> Result<(), TmSinkError> {
        let line = frame
            .entries()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");

        debug!(target: TM_TARGET, "[{:.3}] {}", frame.time_s, line);

        Ok(())
    }
}

impl ArchiveTmSink<File> {
    /// Create the telemetry archive in the given session.
    pub fn new(session: &Session) -> Result<Self, TmSinkError> {
        Ok(Self {
            arch: Archiver::from_path(session, TM_ARCHIVE_FILE)?,
        })
    }
}

impl<W: Write> ArchiveTmSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            arch: Archiver::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.arch.into_inner()
    }
}

impl<W: Write> TelemetrySink for ArchiveTmSink<W> {
    fn publish(&mut self, frame: &TmFrame) -> Result<(), TmSinkError> {
        Ok(self.arch.serialise(frame)?)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
