//! # Drivetrain Equipment Interface
//!
//! Demands sent to the drive motor controllers, sensor data read back from the wheel encoders,
//! and the configuration handed to the motor controllers at startup.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of wheels (and so motors and encoders) on the drivetrain.
pub const NUM_WHEELS: usize = 4;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Normalised demands for the two sides of the drivetrain.
///
/// Both values are in the range [-1, +1], positive being forwards.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorCommandPair {
    /// Demand for both left side motors.
    pub left: f64,

    /// Demand for both right side motors.
    pub right: f64,
}

/// A single reading from a wheel encoder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct EncoderPulseReading {
    /// Accumulated signed pulse count since the last reset.
    pub count: i64,

    /// Instantaneous pulse rate.
    ///
    /// Units: pulses/second
    pub rate_pps: f64,
}

/// Readings from all four wheel encoders, sampled together.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct EncoderSensData {
    pub front_left: EncoderPulseReading,
    pub back_left: EncoderPulseReading,
    pub front_right: EncoderPulseReading,
    pub back_right: EncoderPulseReading,
}

/// Configuration applied to every drive motor controller during initialisation.
///
/// None of these settings are used by the kinematics, they are passed through to the hardware
/// output collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotorConfig {
    /// Reset the controllers to their factory defaults before applying this configuration.
    pub factory_reset: bool,

    /// Behaviour of the motors when the demand is zero.
    pub neutral_mode: NeutralMode,

    /// Enable voltage compensation.
    pub voltage_comp_enabled: bool,

    /// The voltage which corresponds to a full (1.0) demand when compensation is enabled.
    ///
    /// Units: volts
    pub voltage_comp_saturation_v: f64,

    /// Time taken to ramp the open loop output from neutral to full.
    ///
    /// Units: seconds
    pub open_loop_ramp_s: f64,

    /// Invert the right side motors so that a positive demand drives the robot forwards.
    pub invert_right: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The mapping used to turn operator inputs into motor demands.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    /// Each stick drives one side of the drivetrain.
    Tank,

    /// One stick axis drives forwards/backwards, another turns.
    Arcade,
}

/// Behaviour of a motor controller output when the demand is zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeutralMode {
    /// Short the motor windings, actively resisting motion.
    Brake,

    /// Let the motor spin freely.
    Coast,
}

/// Identifies one wheel of the drivetrain.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum WheelId {
    FrontLeft,
    BackLeft,
    FrontRight,
    BackRight,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MotorCommandPair {
    /// Both sides stopped.
    pub const STOP: MotorCommandPair = MotorCommandPair { left: 0.0, right: 0.0 };

    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

impl EncoderPulseReading {
    pub const fn new(count: i64, rate_pps: f64) -> Self {
        Self { count, rate_pps }
    }
}

impl EncoderSensData {
    /// Get the reading for a particular wheel.
    pub fn get(&self, wheel: WheelId) -> &EncoderPulseReading {
        match wheel {
            WheelId::FrontLeft => &self.front_left,
            WheelId::BackLeft => &self.back_left,
            WheelId::FrontRight => &self.front_right,
            WheelId::BackRight => &self.back_right,
        }
    }

    /// Get a mutable reference to the reading for a particular wheel.
    pub fn get_mut(&mut self, wheel: WheelId) -> &mut EncoderPulseReading {
        match wheel {
            WheelId::FrontLeft => &mut self.front_left,
            WheelId::BackLeft => &mut self.back_left,
            WheelId::FrontRight => &mut self.front_right,
            WheelId::BackRight => &mut self.back_right,
        }
    }
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            factory_reset: true,
            neutral_mode: NeutralMode::Brake,
            voltage_comp_enabled: true,
            voltage_comp_saturation_v: 12.0,
            open_loop_ramp_s: 0.2,
            invert_right: true,
        }
    }
}

impl DriveMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            DriveMode::Tank => DriveMode::Arcade,
            DriveMode::Arcade => DriveMode::Tank,
        }
    }

    /// Display name of the mode, as shown on the dashboard.
    pub fn name(self) -> &'static str {
        match self {
            DriveMode::Tank => "Tank Drive",
            DriveMode::Arcade => "Arcade Drive",
        }
    }
}

impl Default for DriveMode {
    fn default() -> Self {
        DriveMode::Tank
    }
}

impl std::fmt::Display for DriveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl WheelId {
    /// All wheels in encoder order.
    pub const ALL: [WheelId; NUM_WHEELS] = [
        WheelId::FrontLeft,
        WheelId::BackLeft,
        WheelId::FrontRight,
        WheelId::BackRight,
    ];

    /// Position of the wheel in `WheelId::ALL`.
    pub fn index(self) -> usize {
        match self {
            WheelId::FrontLeft => 0,
            WheelId::BackLeft => 1,
            WheelId::FrontRight => 2,
            WheelId::BackRight => 3,
        }
    }

    /// True for wheels on the left side of the drivetrain.
    pub fn is_left(self) -> bool {
        matches!(self, WheelId::FrontLeft | WheelId::BackLeft)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
