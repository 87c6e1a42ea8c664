//! # Communications interface crate.
//!
//! Provides the interface types exchanged between the drive control core and
//! its collaborators: operator commands in, equipment demands and sensor data,
//! and telemetry out.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Operator commands (telecommands)
pub mod tc;

/// Demand and sensor data definitions for equipment (the drivetrain)
pub mod eqpt;

/// Telemetry frame definitions
pub mod tm;
