//! Implementations for the Odometry state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{aggregate, convert, distance_per_pulse, OdometryError, Params, SideOdometry};
use comms_if::eqpt::drive::{EncoderSensData, WheelId, NUM_WHEELS};
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Odometry module state
#[derive(Debug, Default)]
pub struct Odometry {
    /// Fixed at initialisation.
    dist_per_pulse: f64,
}

/// Output of odometry processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct DriveOdometry {
    pub left: SideOdometry,
    pub right: SideOdometry,

    /// Per wheel values, in `WheelId::ALL` order.
    pub wheels: [SideOdometry; NUM_WHEELS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for Odometry {
    type InitData = &'static str;
    type InitError = OdometryError;

    type InputData = EncoderSensData;
    type OutputData = DriveOdometry;
    type StatusReport = ();
    type ProcError = Infallible;

    /// Initialise the Odometry module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;

        *self = Self::from_params(&params)?;

        info!("Odometry distance per pulse: {:.6}", self.dist_per_pulse);

        Ok(())
    }

    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let dpp = self.dist_per_pulse;

        let mut wheels = [SideOdometry::default(); NUM_WHEELS];
        for wheel in WheelId::ALL.iter() {
            wheels[wheel.index()] = convert(input_data.get(*wheel), dpp);
        }

        let output = DriveOdometry {
            left: aggregate(&input_data.front_left, &input_data.back_left, dpp),
            right: aggregate(&input_data.front_right, &input_data.back_right, dpp),
            wheels,
        };

        trace!("Odometry left: {:?}, right: {:?}", output.left, output.right);

        Ok((output, ()))
    }
}

impl Odometry {
    /// Build the module directly from a set of parameters.
    pub fn from_params(params: &Params) -> Result<Self, OdometryError> {
        Ok(Self {
            dist_per_pulse: distance_per_pulse(params)?,
        })
    }

    pub fn dist_per_pulse(&self) -> f64 {
        self.dist_per_pulse
    }
}

impl DriveOdometry {
    /// Get the values for a single wheel.
    pub fn wheel(&self, wheel: WheelId) -> SideOdometry {
        self.wheels[wheel.index()]
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
