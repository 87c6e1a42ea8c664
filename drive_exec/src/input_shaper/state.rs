//! Implementations for the InputShaper state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{shape, square, Deadband, InputShaperError, Params};
use comms_if::tc::ControllerAxes;
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Input shaping module state
#[derive(Debug, Default)]
pub struct InputShaper {
    deadband: Deadband,
    square_inputs: bool,
}

/// Shaped operator inputs, positive meaning forwards (or a right turn).
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct ShapedInput {
    /// Left side demand when in tank mode.
    pub tank_left: f64,

    /// Right side demand when in tank mode.
    pub tank_right: f64,

    /// Forward demand when in arcade mode.
    pub arcade_forward: f64,

    /// Turn demand when in arcade mode.
    pub arcade_turn: f64,
}

/// Status report for InputShaper processing.
///
/// A flag is raised when a non-zero reading was suppressed by the deadband.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    pub left_y_suppressed: bool,
    pub right_y_suppressed: bool,
    pub right_x_suppressed: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for InputShaper {
    type InitData = &'static str;
    type InitError = InputShaperError;

    type InputData = ControllerAxes;
    type OutputData = ShapedInput;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the InputShaper module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;

        *self = Self::from_params(&params)?;

        info!(
            "InputShaper deadband: {}, squared inputs: {}",
            self.deadband.width(),
            self.square_inputs
        );

        Ok(())
    }

    /// Shape one set of controller axes.
    ///
    /// The Y axes report forwards as negative, so they are negated here and
    /// the outputs read positive forwards.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let left_y = self.shape_axis(-input_data.left_y);
        let right_y = self.shape_axis(-input_data.right_y);
        let right_x = self.shape_axis(input_data.right_x);

        let output = ShapedInput {
            tank_left: left_y,
            tank_right: right_y,
            arcade_forward: left_y,
            arcade_turn: right_x,
        };

        let report = StatusReport {
            left_y_suppressed: input_data.left_y != 0.0 && left_y == 0.0,
            right_y_suppressed: input_data.right_y != 0.0 && right_y == 0.0,
            right_x_suppressed: input_data.right_x != 0.0 && right_x == 0.0,
        };

        trace!("InputShaper output: {:?}", output);

        Ok((output, report))
    }
}

impl InputShaper {
    /// Build the module directly from a set of parameters.
    pub fn from_params(params: &Params) -> Result<Self, InputShaperError> {
        Ok(Self {
            deadband: Deadband::new(params.deadband)?,
            square_inputs: params.square_inputs,
        })
    }

    fn shape_axis(&self, raw: f64) -> f64 {
        let shaped = shape(raw, self.deadband);

        if self.square_inputs {
            square(shaped)
        }
        else {
            shaped
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn shaper(square_inputs: bool) -> InputShaper {
        InputShaper::from_params(&Params { deadband: 0.1, square_inputs }).unwrap()
    }

    #[test]
    fn test_forward_is_positive() {
        let mut s = shaper(false);

        // Both sticks pushed fully away from the operator
        let (out, rpt) = s.proc(&ControllerAxes::new(-1.0, -1.0, 0.0)).unwrap();

        assert_eq!(out.tank_left, 1.0);
        assert_eq!(out.tank_right, 1.0);
        assert_eq!(out.arcade_forward, 1.0);
        assert_eq!(out.arcade_turn, 0.0);
        assert_eq!(rpt, StatusReport::default());
    }

    #[test]
    fn test_turn_not_negated() {
        let mut s = shaper(false);

        let (out, _) = s.proc(&ControllerAxes::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(out.arcade_turn, 1.0);

        let (out, _) = s.proc(&ControllerAxes::new(0.0, 0.0, -0.55)).unwrap();
        assert!((out.arcade_turn + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_suppression_report() {
        let mut s = shaper(false);

        let (out, rpt) = s.proc(&ControllerAxes::new(0.05, -0.5, -0.02)).unwrap();

        assert_eq!(out.tank_left, 0.0);
        assert!(out.tank_right > 0.0);
        assert_eq!(out.arcade_turn, 0.0);
        assert!(rpt.left_y_suppressed);
        assert!(!rpt.right_y_suppressed);
        assert!(rpt.right_x_suppressed);
    }

    #[test]
    fn test_squared_inputs() {
        let mut s = shaper(true);

        let (out, _) = s.proc(&ControllerAxes::new(-0.55, 0.55, 0.0)).unwrap();

        assert!((out.tank_left - 0.25).abs() < 1e-12);
        assert!((out.tank_right + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_params() {
        let e = InputShaper::from_params(&Params { deadband: 1.2, square_inputs: false });
        assert!(matches!(e, Err(InputShaperError::InvalidDeadband(_))));
    }
}
