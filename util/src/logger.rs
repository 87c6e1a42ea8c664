//! Logging setup for the drive executable.
//!
//! Every record goes to the session log file. The console gets the same
//! records with coloured level tags, except telemetry (target `tm`), which is
//! written to the file only so it doesn't drown the operator's view.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::fmt;
use thiserror::Error;

use crate::session::{self, Session};

pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target of telemetry records, kept off the console.
pub const TM_TARGET: &str = "tm";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of `INFO` or more verbose, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise logging to the console and to the session log file.
///
/// `min_level` must be `Info` or more verbose. Only one logger can be set per
/// process, a second call fails with `FernInitError`.
pub fn logger_init(
    min_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let console = fern::Dispatch::new()
        .filter(|metadata| metadata.target() != TM_TARGET)
        .format(|out, message, record| {
            let line = format_record(level_tag(record.level()), message, record);
            out.finish(format_args!("{}", line))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            let line = format_record(level_name(record.level()), message, record);
            out.finish(format_args!("{}", line))
        })
        .chain(log_file);

    fern::Dispatch::new()
        .level(min_level)
        .level_for("gilrs", LevelFilter::Warn)
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// `[elapsed tag] message`, with the target added below `Info`.
fn format_record<T: fmt::Display>(tag: T, message: &fmt::Arguments, record: &Record) -> String {
    if record.level() > Level::Info {
        format!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            tag,
            record.target(),
            message
        )
    }
    else {
        format!("[{:10.6} {}] {}", session::get_elapsed_seconds(), tag, message)
    }
}

/// Three letter name of a level.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info  => "INF",
        Level::Warn  => "WRN",
        Level::Error => "ERR"
    }
}

/// Coloured level name for the console.
fn level_tag(level: Level) -> ColoredString {
    let name = level_name(level);

    match level {
        Level::Trace => name.dimmed().italic(),
        Level::Debug => name.dimmed(),
        Level::Info  => name.normal(),
        Level::Warn  => name.yellow(),
        Level::Error => name.red().bold()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
