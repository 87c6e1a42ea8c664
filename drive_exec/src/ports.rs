//! # Hardware and telemetry ports
//!
//! The drive executable talks to the outside world only through these traits,
//! so the same cycle runs against the simulated drivetrain, real hardware or
//! test doubles.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::drive::{EncoderSensData, MotorCommandPair, MotorConfig},
    tm::TmFrame,
};

use crate::tm_sink::TmSinkError;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The drive motor controllers.
pub trait MotorOutput {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply the configuration to every motor controller. Called once before the first demand.
    fn configure(&mut self, config: &MotorConfig) -> Result<(), Self::Error>;

    /// Send normalised demands to both sides.
    fn set_demands(&mut self, dems: MotorCommandPair) -> Result<(), Self::Error>;

    /// Stop all motors immediately.
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// The wheel encoders.
pub trait EncoderFeedback {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sample all four encoders together.
    fn read(&mut self) -> Result<EncoderSensData, Self::Error>;

    /// Zero all four pulse counters together.
    fn reset(&mut self) -> Result<(), Self::Error>;
}

/// A consumer of telemetry frames.
pub trait TelemetrySink {
    fn publish(&mut self, frame: &TmFrame) -> Result<(), TmSinkError>;
}
