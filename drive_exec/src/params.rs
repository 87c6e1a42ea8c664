//! # Drive Executable Parameters
//!
//! This module provide parameters for the drive executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use comms_if::eqpt::drive::{DriveMode, MotorConfig};

use crate::sim_drive::SimParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DriveExecParams {

    /// Number of control cycles per second.
    ///
    /// Units: hertz
    pub cycle_frequency_hz: f64,

    /// Drive mode at startup.
    pub initial_mode: DriveMode,

    /// Write every telemetry frame to the log under the `tm` target.
    #[serde(default)]
    pub log_tm: bool,

    /// Write every telemetry frame to the session's CSV archive.
    #[serde(default = "default_true")]
    pub archive_tm: bool,

    /// Configuration applied to all drive motor controllers.
    #[serde(default)]
    pub motor_config: MotorConfig,

    /// Simulated drivetrain parameters.
    #[serde(default)]
    pub sim: SimParams,
}

fn default_true() -> bool {
    true
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::drive::NeutralMode;

    #[test]
    fn test_parse_minimal() {
        let p: DriveExecParams = util::params::from_str(
            "cycle_frequency_hz = 50.0\ninitial_mode = \"Tank\"\n"
        ).unwrap();

        assert_eq!(p.initial_mode, DriveMode::Tank);
        assert!(p.archive_tm);
        assert!(!p.log_tm);
        assert_eq!(p.motor_config, MotorConfig::default());
        assert!(p.sim.reverse_right_encoders);
    }

    #[test]
    fn test_parse_full() {
        let p: DriveExecParams = util::params::from_str(r#"
            cycle_frequency_hz = 20.0
            initial_mode = "Arcade"
            log_tm = true
            archive_tm = false

            [motor_config]
            factory_reset = true
            neutral_mode = "Coast"
            voltage_comp_enabled = true
            voltage_comp_saturation_v = 12.0
            open_loop_ramp_s = 0.5
            invert_right = true

            [sim]
            free_speed_pps = 5000.0
            battery_voltage_v = 12.0
            reverse_right_encoders = false
        "#).unwrap();

        assert_eq!(p.cycle_frequency_hz, 20.0);
        assert_eq!(p.initial_mode, DriveMode::Arcade);
        assert_eq!(p.motor_config.neutral_mode, NeutralMode::Coast);
        assert_eq!(p.motor_config.open_loop_ramp_s, 0.5);
        assert_eq!(p.sim.free_speed_pps, 5000.0);
        assert!(!p.archive_tm);
    }
}
