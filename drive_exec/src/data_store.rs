//! # Data Store

use comms_if::{
    eqpt::drive::{DriveMode, EncoderSensData, MotorCommandPair},
    tc::ControllerAxes,
};
use log::{info, warn};
use std::collections::HashSet;

use crate::{
    drive_ctrl,
    input_shaper,
    mode_ctrl::ModeCtrl,
    odometry,
};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the drivetrain has been put into safe mode
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum SafeModeCause {
    MakeSafeTc,
    NoOperatorInput,
    MotorOutputFailure,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// Session elapsed time at the start of this cycle
    pub cycle_time_s: f64,

    // Safe mode variables
    /// Determines if the drivetrain is in safe mode.
    pub safe: bool,

    /// Every cause currently holding the drivetrain in safe mode.
    pub safe_causes: HashSet<SafeModeCause>,

    // Operator input
    /// Latest raw controller axes, held until replaced.
    pub axes: ControllerAxes,

    /// Encoders will be zeroed at the start of the next cycle.
    pub encoder_reset_pending: bool,

    // ModeCtrl
    pub mode_ctrl: ModeCtrl,

    /// The mode read from `mode_ctrl` for this cycle.
    pub drive_mode: DriveMode,

    // InputShaper
    pub input_shaper: input_shaper::InputShaper,
    pub shaped_input: input_shaper::ShapedInput,
    pub input_shaper_status_rpt: input_shaper::StatusReport,

    // DriveCtrl
    pub drive_ctrl: drive_ctrl::DriveCtrl,
    pub motor_dems: MotorCommandPair,
    pub drive_ctrl_status_rpt: drive_ctrl::StatusReport,

    // Odometry
    pub odometry: odometry::Odometry,
    pub encoder_sens_data: EncoderSensData,
    pub drive_odom: odometry::DriveOdometry,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Puts the drivetrain into safe mode with the given cause.
    ///
    /// Causes accumulate, each one must be cleared by its own `make_unsafe`.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if self.safe_causes.insert(cause) {
            warn!("Make safe requested, cause: {:?}", cause);
        }

        if !self.safe {
            self.safe = true;
            self.drive_ctrl.make_safe();
        }
    }

    /// Clears the given safe mode cause.
    ///
    /// Returns `Ok(())` if safe mode is no longer active, or `Err(())` if other causes still hold
    /// it.
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> Result<(), ()> {
        if self.safe_causes.remove(&cause) {
            info!("Safe mode cause {:?} cleared", cause);
        }

        if !self.safe_causes.is_empty() {
            return Err(());
        }

        if self.safe {
            self.safe = false;
            self.drive_ctrl.make_unsafe();
            info!("All safe mode causes cleared, safe mode disabled");
        }

        Ok(())
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the per-cycle outputs. The raw axes, the pending encoder reset and the frozen mode
    /// are kept.
    pub fn cycle_start(&mut self, cycle_time_s: f64) {
        self.cycle_time_s = cycle_time_s;

        self.shaped_input = input_shaper::ShapedInput::default();
        self.input_shaper_status_rpt = input_shaper::StatusReport::default();
        self.motor_dems = MotorCommandPair::default();
        self.drive_ctrl_status_rpt = drive_ctrl::StatusReport::default();
        self.drive_odom = odometry::DriveOdometry::default();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
