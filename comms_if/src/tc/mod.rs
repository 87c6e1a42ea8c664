//! # Telecommand module
//!
//! Operator commands sent to the drive executable, either read from a script,
//! produced by a gamepad, or forwarded by some other front end.
//!
//! TCs are JSON objects with a `"type"` string and an optional `"payload"`:
//!
//! ```json
//! {"type": "AXES", "payload": {"left_y": -0.5, "right_y": -0.5, "right_x": 0.0}}
//! {"type": "TOGGLE_MODE"}
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod drive;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde_json::{self, Value};
use thiserror::Error;

// Internal
pub use drive::ControllerAxes;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction to the drive executable from the
/// operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tc {
    /// New raw controller axis readings.
    Axes(ControllerAxes),

    /// Switch between tank and arcade drive.
    ToggleDriveMode,

    /// Zero all wheel encoders.
    ResetEncoders,

    /// Enter safe mode, stopping the motors.
    MakeSafe,

    /// Leave safe mode.
    MakeUnsafe,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC has an invalid type ({0})")]
    InvalidType(String),

    #[error("TC of type {0} is expected to have a payload but it doesn't")]
    MissingPayload(&'static str),

    #[error("TC of type {0} has an invalid payload: {1}")]
    InvalidPayload(&'static str, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        // Parse the JSON string into a value
        let val: Value = serde_json::from_str(json_str)
            .map_err(TcParseError::InvalidJson)?;

        // Get the type of the TC
        let type_str = val["type"].as_str()
            .ok_or_else(|| TcParseError::InvalidType(String::from(
                "Expected \"type\" to be a string"
            )))?;

        match type_str {
            "AXES" => {
                let payload = &val["payload"];
                if payload.is_null() {
                    return Err(TcParseError::MissingPayload("AXES"))
                }

                serde_json::from_value(payload.clone())
                    .map(Tc::Axes)
                    .map_err(|e| TcParseError::InvalidPayload("AXES", e))
            },
            "TOGGLE_MODE" => Ok(Tc::ToggleDriveMode),
            "RESET_ENC" => Ok(Tc::ResetEncoders),
            "SAFE" => Ok(Tc::MakeSafe),
            "UNSAFE" => Ok(Tc::MakeUnsafe),
            t => Err(TcParseError::InvalidType(
                format!("{} is not a recognised TC type", t)
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
