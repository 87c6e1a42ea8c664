//! Odometry module
//!
//! Converts the four wheel encoder readings into per-side position and rate
//! estimates. Each side has a front and back encoder on the same gearbox, the
//! side estimate is the plain mean of the pair. Nothing is filtered or
//! integrated between cycles.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use comms_if::eqpt::drive::EncoderPulseReading;
use util::maths::mean2;

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position and rate of one side (or one wheel) of the drivetrain.
///
/// Units are those of the wheel diameter parameter, position in distance
/// units and rate in distance units/second.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct SideOdometry {
    pub position: f64,
    pub rate: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during Odometry initialisation.
#[derive(Debug, thiserror::Error)]
pub enum OdometryError {
    #[error("The {0} must be positive and finite, found {1}")]
    InvalidGeometry(&'static str, f64),

    #[error("Could not load the Odometry parameters: {0}")]
    ParamsLoadError(#[from] util::params::LoadError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Distance travelled by the wheel for one encoder pulse.
///
/// `(pi * wheel_diameter) / (pulses_per_revolution * gear_ratio)`
pub fn distance_per_pulse(params: &Params) -> Result<f64, OdometryError> {
    let checks = [
        ("wheel diameter", params.wheel_diameter),
        ("pulses per revolution", params.pulses_per_revolution),
        ("gear ratio", params.gear_ratio),
    ];

    for (name, value) in checks.iter() {
        if !value.is_finite() || *value <= 0.0 {
            return Err(OdometryError::InvalidGeometry(name, *value))
        }
    }

    Ok(
        (std::f64::consts::PI * params.wheel_diameter)
        / (params.pulses_per_revolution * params.gear_ratio)
    )
}

/// Convert a single encoder reading into distance units.
pub fn convert(reading: &EncoderPulseReading, dist_per_pulse: f64) -> SideOdometry {
    SideOdometry {
        position: reading.count as f64 * dist_per_pulse,
        rate: reading.rate_pps * dist_per_pulse,
    }
}

/// Aggregate the front and back readings of one side.
pub fn aggregate(
    front: &EncoderPulseReading,
    back: &EncoderPulseReading,
    dist_per_pulse: f64
) -> SideOdometry {
    let front = convert(front, dist_per_pulse);
    let back = convert(back, dist_per_pulse);

    SideOdometry {
        position: mean2(front.position, back.position),
        rate: mean2(front.rate, back.rate),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aggregate() {
        let side = aggregate(
            &EncoderPulseReading::new(10, 2.0),
            &EncoderPulseReading::new(12, 2.0),
            1.0
        );

        assert_eq!(side.position, 11.0);
        assert_eq!(side.rate, 2.0);
    }

    #[test]
    fn test_aggregate_scales() {
        let side = aggregate(
            &EncoderPulseReading::new(-100, -40.0),
            &EncoderPulseReading::new(-300, 0.0),
            0.5
        );

        assert_eq!(side.position, -100.0);
        assert_eq!(side.rate, -10.0);
    }

    #[test]
    fn test_distance_per_pulse() {
        let dpp = distance_per_pulse(&Params::default()).unwrap();

        // 6 inch wheel, 80 pulses/rev, 10.71:1
        let expected = std::f64::consts::PI * 6.0 / (80.0 * 10.71);
        assert!((dpp - expected).abs() < 1e-15);
        assert!((dpp - 0.02199995).abs() < 1e-8);
    }

    #[test]
    fn test_invalid_geometry() {
        let bad = [
            Params { wheel_diameter: 0.0, ..Default::default() },
            Params { pulses_per_revolution: -80.0, ..Default::default() },
            Params { gear_ratio: f64::NAN, ..Default::default() },
        ];

        for p in bad.iter() {
            assert!(matches!(
                distance_per_pulse(p),
                Err(OdometryError::InvalidGeometry(_, _))
            ));
        }
    }
}
