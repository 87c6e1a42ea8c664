//! # Telemetry module
//!
//! A `TmFrame` is produced once per cycle by the drive executable. It is
//! archived as a single CSV row and published as a set of flat key/value
//! entries named for the dashboard.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt;

use crate::eqpt::drive::DriveMode;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const KEY_LEFT_SPEED: &str = "Drivetrain/LeftSpeed";
pub const KEY_RIGHT_SPEED: &str = "Drivetrain/RightSpeed";
pub const KEY_LEFT_POSITION: &str = "Drivetrain/LeftEncoderPosition";
pub const KEY_RIGHT_POSITION: &str = "Drivetrain/RightEncoderPosition";
pub const KEY_LEFT_RATE: &str = "Drivetrain/LeftEncoderRate";
pub const KEY_RIGHT_RATE: &str = "Drivetrain/RightEncoderRate";
pub const KEY_DRIVE_MODE: &str = "Drive Mode";
pub const KEY_SAFE: &str = "Drivetrain/Safe";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Telemetry for one cycle of the drive executable.
///
/// Speeds are the normalised motor demands actually sent this cycle.
/// Positions and rates are in the unit of the odometry wheel diameter
/// (inches with the shipped parameters), per second for rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TmFrame {
    /// Session elapsed time at the start of the cycle.
    pub time_s: f64,

    /// Cycle counter, starting from zero.
    pub cycle: u64,

    pub safe: bool,
    pub drive_mode: DriveMode,

    pub left_speed: f64,
    pub right_speed: f64,

    pub left_position: f64,
    pub right_position: f64,
    pub left_rate: f64,
    pub right_rate: f64,

    pub front_left_position: f64,
    pub front_left_rate: f64,
    pub back_left_position: f64,
    pub back_left_rate: f64,
    pub front_right_position: f64,
    pub front_right_rate: f64,
    pub back_right_position: f64,
    pub back_right_rate: f64,

    /// Raw axes suppressed to zero by the input deadband.
    pub left_y_suppressed: bool,
    pub right_y_suppressed: bool,
    pub right_x_suppressed: bool,

    /// Mixed demands clamped into [-1, +1].
    pub left_saturated: bool,
    pub right_saturated: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single published telemetry value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TmValue {
    Number(f64),
    Bool(bool),
    Text(&'static str),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TmFrame {
    /// Flatten the frame into dashboard key/value entries.
    ///
    /// Status flags are only archived, they have no dashboard entry.
    pub fn entries(&self) -> Vec<(&'static str, TmValue)> {
        use TmValue::*;

        vec![
            (KEY_LEFT_SPEED, Number(self.left_speed)),
            (KEY_RIGHT_SPEED, Number(self.right_speed)),
            (KEY_LEFT_POSITION, Number(self.left_position)),
            (KEY_RIGHT_POSITION, Number(self.right_position)),
            (KEY_LEFT_RATE, Number(self.left_rate)),
            (KEY_RIGHT_RATE, Number(self.right_rate)),
            (KEY_DRIVE_MODE, Text(self.drive_mode.name())),
            (KEY_SAFE, Bool(self.safe)),
            ("Front Left Encoder Position", Number(self.front_left_position)),
            ("Front Left Encoder Rate", Number(self.front_left_rate)),
            ("Back Left Encoder Position", Number(self.back_left_position)),
            ("Back Left Encoder Rate", Number(self.back_left_rate)),
            ("Front Right Encoder Position", Number(self.front_right_position)),
            ("Front Right Encoder Rate", Number(self.front_right_rate)),
            ("Back Right Encoder Position", Number(self.back_right_position)),
            ("Back Right Encoder Rate", Number(self.back_right_rate)),
        ]
    }
}

impl Default for TmFrame {
    fn default() -> Self {
        Self {
            time_s: 0.0,
            cycle: 0,
            safe: true,
            drive_mode: DriveMode::default(),
            left_speed: 0.0,
            right_speed: 0.0,
            left_position: 0.0,
            right_position: 0.0,
            left_rate: 0.0,
            right_rate: 0.0,
            front_left_position: 0.0,
            front_left_rate: 0.0,
            back_left_position: 0.0,
            back_left_rate: 0.0,
            front_right_position: 0.0,
            front_right_rate: 0.0,
            back_right_position: 0.0,
            back_right_rate: 0.0,
            left_y_suppressed: false,
            right_y_suppressed: false,
            right_x_suppressed: false,
            left_saturated: false,
            right_saturated: false,
        }
    }
}

impl fmt::Display for TmValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TmValue::Number(n) => write!(f, "{:.4}", n),
            TmValue::Bool(b) => write!(f, "{}", b),
            TmValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_entries() {
        let frame = TmFrame {
            drive_mode: DriveMode::Arcade,
            left_speed: 0.5,
            right_position: -1.25,
            back_right_rate: 0.75,
            ..Default::default()
        };

        let entries = frame.entries();
        assert_eq!(entries.len(), 16);

        let get = |k: &str| entries.iter().find(|(key, _)| *key == k).map(|(_, v)| *v);

        assert_eq!(get(KEY_LEFT_SPEED), Some(TmValue::Number(0.5)));
        assert_eq!(get(KEY_RIGHT_POSITION), Some(TmValue::Number(-1.25)));
        assert_eq!(get(KEY_DRIVE_MODE), Some(TmValue::Text("Arcade Drive")));
        assert_eq!(get("Back Right Encoder Rate"), Some(TmValue::Number(0.75)));
        assert_eq!(get(KEY_SAFE), Some(TmValue::Bool(true)));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(TmValue::Number(0.5).to_string(), "0.5000");
        assert_eq!(TmValue::Text("Tank Drive").to_string(), "Tank Drive");
        assert_eq!(TmValue::Bool(false).to_string(), "false");
    }
}
