//! # Simulated drivetrain
//!
//! Stands in for the four motor controllers and their encoders. Motor output is ramped and
//! scaled the way the real controllers would after `configure`, shaft speed follows the applied
//! voltage directly (no inertia) and is integrated into encoder pulses once per cycle.
//!
//! Shaft direction follows the applied voltage. The right hand motors are mounted mirrored, so
//! on the real robot the right motor output is inverted to drive forwards and the right encoders
//! are reversed to count positive forwards. Both settings are modelled here.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};
use serde::Deserialize;
use std::{cell::RefCell, rc::Rc};

use comms_if::eqpt::drive::{
    EncoderPulseReading, EncoderSensData, MotorCommandPair, MotorConfig, NeutralMode, WheelId,
    NUM_WHEELS,
};
use util::maths::clamp;

use crate::ports::{EncoderFeedback, MotorOutput};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Voltage at which `SimParams::free_speed_pps` is reached.
pub const NOMINAL_VOLTAGE_V: f64 = 12.0;

/// Fraction of shaft speed kept each cycle by a coasting motor.
const COAST_DECAY: f64 = 0.9;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated drivetrain.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Encoder pulse rate of an unloaded motor at the nominal voltage.
    ///
    /// Units: pulses/second
    pub free_speed_pps: f64,

    /// Units: volts
    pub battery_voltage_v: f64,

    /// Reverse the direction of the right hand encoders.
    pub reverse_right_encoders: bool,
}

/// Handle to a simulated drivetrain.
///
/// Clones share the same simulation, so one handle can be used as the `MotorOutput` and another
/// as the `EncoderFeedback`.
#[derive(Debug, Clone)]
pub struct SimDrivetrain {
    state: Rc<RefCell<SimState>>,
}

#[derive(Debug)]
struct SimState {
    params: SimParams,
    period_s: f64,

    config: Option<MotorConfig>,

    /// Ramped controller output for the left and right sides.
    output: [f64; 2],

    /// Shaft speed of each motor, positive in the shaft's own forward direction.
    ///
    /// Units: pulses/second
    shaft_pps: [f64; NUM_WHEELS],

    /// Raw pulses counted since the last reset, before any direction reversal.
    raw_pulses: [f64; NUM_WHEELS],
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimDriveError {
    #[error("The simulation period must be positive and finite, found {0}")]
    InvalidPeriod(f64),

    #[error("Motor demand sent before the motor controllers were configured")]
    NotConfigured,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            free_speed_pps: 7000.0,
            battery_voltage_v: 12.5,
            reverse_right_encoders: true,
        }
    }
}

impl SimDrivetrain {
    /// Create a new simulation which advances by `period_s` for every demand sent to it.
    pub fn new(params: SimParams, period_s: f64) -> Result<Self, SimDriveError> {
        if !period_s.is_finite() || period_s <= 0.0 {
            return Err(SimDriveError::InvalidPeriod(period_s));
        }

        Ok(Self {
            state: Rc::new(RefCell::new(SimState {
                params,
                period_s,
                config: None,
                output: [0.0; 2],
                shaft_pps: [0.0; NUM_WHEELS],
                raw_pulses: [0.0; NUM_WHEELS],
            })),
        })
    }
}

impl MotorOutput for SimDrivetrain {
    type Error = SimDriveError;

    fn configure(&mut self, config: &MotorConfig) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        if config.factory_reset {
            state.output = [0.0; 2];
            state.shaft_pps = [0.0; NUM_WHEELS];
        }

        info!("Simulated motor controllers configured: {:?}", config);
        state.config = Some(*config);

        Ok(())
    }

    fn set_demands(&mut self, dems: MotorCommandPair) -> Result<(), Self::Error> {
        self.state.borrow_mut().advance(Some(dems))
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().advance(None)
    }
}

impl EncoderFeedback for SimDrivetrain {
    type Error = SimDriveError;

    fn read(&mut self) -> Result<EncoderSensData, Self::Error> {
        let state = self.state.borrow();
        let mut data = EncoderSensData::default();

        for wheel in WheelId::ALL.iter() {
            let dir = if !wheel.is_left() && state.params.reverse_right_encoders {
                -1.0
            } else {
                1.0
            };

            let i = wheel.index();
            *data.get_mut(*wheel) = EncoderPulseReading::new(
                (state.raw_pulses[i] * dir).round() as i64,
                state.shaft_pps[i] * dir,
            );
        }

        Ok(data)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        debug!("Simulated encoders reset");
        self.state.borrow_mut().raw_pulses = [0.0; NUM_WHEELS];
        Ok(())
    }
}

impl SimState {
    /// Advance the simulation by one period. `None` demands stop the motors, bypassing the ramp.
    fn advance(&mut self, dems: Option<MotorCommandPair>) -> Result<(), SimDriveError> {
        let config = self.config.ok_or(SimDriveError::NotConfigured)?;

        match dems {
            Some(d) => {
                let targets = [d.left, d.right];
                for side in 0..2 {
                    self.output[side] = ramp(self.output[side], targets[side], &config, self.period_s);
                }
            }
            None => self.output = [0.0; 2],
        }

        for wheel in WheelId::ALL.iter() {
            let i = wheel.index();

            let mut applied = self.output[if wheel.is_left() { 0 } else { 1 }];
            if !wheel.is_left() && config.invert_right {
                applied = -applied;
            }

            let volts = if config.voltage_comp_enabled {
                applied * config.voltage_comp_saturation_v
            } else {
                applied * self.params.battery_voltage_v
            };
            let volts = clamp(
                &volts,
                &-self.params.battery_voltage_v,
                &self.params.battery_voltage_v,
            );

            self.shaft_pps[i] = if applied == 0.0 && config.neutral_mode == NeutralMode::Coast {
                self.shaft_pps[i] * COAST_DECAY
            } else {
                self.params.free_speed_pps * volts / NOMINAL_VOLTAGE_V
            };

            self.raw_pulses[i] += self.shaft_pps[i] * self.period_s;
        }

        Ok(())
    }
}

/// Move `current` towards `target` no faster than the configured open loop ramp allows.
fn ramp(current: f64, target: f64, config: &MotorConfig, period_s: f64) -> f64 {
    if config.open_loop_ramp_s <= 0.0 {
        return target;
    }

    let max_step = period_s / config.open_loop_ramp_s;
    current + clamp(&(target - current), &-max_step, &max_step)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
