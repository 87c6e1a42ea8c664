//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use comms_if::eqpt::drive::{DriveMode, MotorCommandPair};
use util::module::State;

use crate::input_shaper::ShapedInput;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state
#[derive(Debug, Default)]
pub struct DriveCtrl {
    /// While safe the output is always the zero pair.
    safe: bool,

    pub(crate) report: StatusReport,
}

/// Input data to drive control.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    /// Mode frozen for this cycle.
    pub mode: DriveMode,

    /// Shaped operator inputs for this cycle.
    pub shaped: ShapedInput,
}

/// Status report for DriveCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// The left demand was outside [-1, +1] and has been clamped.
    pub left_saturated: bool,

    /// The right demand was outside [-1, +1] and has been clamped.
    pub right_saturated: bool,

    /// The output was forced to zero by safe mode.
    pub stopped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for DriveCtrl {
    type InitData = ();
    type InitError = Infallible;

    type InputData = InputData;
    type OutputData = MotorCommandPair;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the DriveCtrl module.
    ///
    /// DriveCtrl has no parameters, initialisation just clears any state.
    fn init(&mut self, _init_data: Self::InitData) -> Result<(), Self::InitError> {
        *self = Self::default();
        Ok(())
    }

    /// Perform cyclic processing of drive control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();

        let output = if self.safe {
            self.report.stopped = true;
            MotorCommandPair::STOP
        }
        else {
            let (pair, [left_sat, right_sat]) = super::limit(
                super::calc_raw(input_data.mode, &input_data.shaped)
            );

            self.report.left_saturated = left_sat;
            self.report.right_saturated = right_sat;

            pair
        };

        trace!("DriveCtrl output ({:?}): {:?}", input_data.mode, output);

        Ok((output, self.report))
    }
}

impl DriveCtrl {
    /// Stop the motors, all further outputs are zero until `make_unsafe`.
    pub fn make_safe(&mut self) {
        if !self.safe {
            info!("DriveCtrl made safe, motors stopped");
        }
        self.safe = true;
    }

    /// Resume mixing operator inputs.
    pub fn make_unsafe(&mut self) {
        if self.safe {
            info!("DriveCtrl made unsafe");
        }
        self.safe = false;
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn input(mode: DriveMode, forward: f64, turn: f64) -> InputData {
        InputData {
            mode,
            shaped: ShapedInput {
                tank_left: forward,
                tank_right: turn,
                arcade_forward: forward,
                arcade_turn: turn,
            },
        }
    }

    #[test]
    fn test_saturation_report() {
        let mut dc = DriveCtrl::default();

        let (out, rpt) = dc.proc(&input(DriveMode::Arcade, 0.8, 0.8)).unwrap();
        assert_eq!(out, MotorCommandPair::new(1.0, 0.0));
        assert!(rpt.left_saturated);
        assert!(!rpt.right_saturated);

        // Report is cleared each cycle
        let (_, rpt) = dc.proc(&input(DriveMode::Tank, 0.2, 0.2)).unwrap();
        assert_eq!(rpt, StatusReport::default());
    }

    #[test]
    fn test_safe_mode_stops() {
        let mut dc = DriveCtrl::default();

        dc.make_safe();
        let (out, rpt) = dc.proc(&input(DriveMode::Tank, 0.9, -0.9)).unwrap();
        assert_eq!(out, MotorCommandPair::STOP);
        assert!(rpt.stopped);

        dc.make_unsafe();
        let (out, _) = dc.proc(&input(DriveMode::Tank, 0.9, -0.9)).unwrap();
        assert_eq!(out, MotorCommandPair::new(0.9, -0.9));
    }

    #[test]
    fn test_init_clears_safe() {
        let mut dc = DriveCtrl::default();
        dc.make_safe();
        dc.init(()).unwrap();
        assert!(!dc.is_safe());
    }
}
