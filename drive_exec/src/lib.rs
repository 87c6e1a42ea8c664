//! # Drive library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the drive crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Input shaping - deadband suppression and rescaling of the raw joystick axes
pub mod input_shaper;

/// Drive control - mixes shaped inputs into left/right motor demands
pub mod drive_ctrl;

/// Odometry - per side position and rate from the wheel encoders
pub mod odometry;

/// Mode controller - owns the tank/arcade drive mode
pub mod mode_ctrl;

/// Interfaces to the motors, encoders and telemetry consumers
pub mod ports;

/// Simulated motors and encoders
pub mod sim_drive;

/// Telemetry sinks writing to the log and to the session archive
pub mod tm_sink;

/// Executable parameters
pub mod params;

/// Global data store
pub mod data_store;

/// Telecommand processor
pub mod tc_processor;

/// One pass of the control pipeline
pub mod cycle;

/// Gamepad operator input
#[cfg(feature = "gamepad")]
pub mod gamepad;
