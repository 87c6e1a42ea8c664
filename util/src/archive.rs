//! Struct archiving functionality
//!
//! Archives are CSV files in the session's `arch` directory, one row per
//! serialised record.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use std::io::Write;
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// Generic over the underlying writer so archives can be kept in memory
/// during testing.
pub struct Archiver<W: Write = File> {
    writer: Writer<W>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not open the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Could not serialise the archive record: {0}")]
    SerialiseError(csv::Error),

    #[error("Could not flush the archive: {0}")]
    FlushError(std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver<File> {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let mut session_path = session.arch_root.clone();
        session_path.push(path);

        // Create the file if it does not exist
        File::create(&session_path).map_err(ArchiveError::FileError)?;

        // Open the file in append mode
        let file = OpenOptions::new()
            .append(true)
            .open(session_path)
            .map_err(ArchiveError::FileError)?;

        Ok(Self::from_writer(file))
    }
}

impl<W: Write> Archiver<W> {
    /// Create a new archiver writing into the given writer.
    ///
    /// The header row is written with the first record.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: WriterBuilder::new()
                .has_headers(true)
                .from_writer(writer)
        }
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        self.writer.serialize(record).map_err(ArchiveError::SerialiseError)?;
        self.writer.flush().map_err(ArchiveError::FlushError)
    }

    /// Consume the archiver and return the underlying writer.
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        time_s: f64,
        left: f64,
        right: f64,
    }

    #[test]
    fn test_archiver_writes_header_once() {
        let mut arch = Archiver::from_writer(Vec::new());

        arch.serialise(Row { time_s: 0.0, left: 0.5, right: -0.5 }).unwrap();
        arch.serialise(Row { time_s: 0.02, left: 1.0, right: 0.0 }).unwrap();

        let bytes = arch.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text, "time_s,left,right\n0.0,0.5,-0.5\n0.02,1.0,0.0\n");
    }
}
