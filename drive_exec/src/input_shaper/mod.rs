//! Input shaping module
//!
//! Conditions raw joystick axis readings before they reach the drive mixer.
//! Readings inside the deadband are suppressed to exactly zero, the remaining
//! travel is rescaled linearly so that the output still spans the full
//! [-1, +1] range without a jump at the deadband edge.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use util::maths::lin_map;

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Deadband used when none is configured.
pub const DEFAULT_DEADBAND: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A validated deadband width, always in the range `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Deadband(f64);

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during InputShaper initialisation.
#[derive(Debug, thiserror::Error)]
pub enum InputShaperError {
    #[error("The deadband must be in the range [0, 1), found {0}")]
    InvalidDeadband(f64),

    #[error("Could not load the InputShaper parameters: {0}")]
    ParamsLoadError(#[from] util::params::LoadError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Deadband {
    /// Create a new deadband, rejecting widths outside `[0, 1)`.
    ///
    /// A width of 1 or more would leave no travel to rescale into.
    pub fn new(width: f64) -> Result<Self, InputShaperError> {
        if (0.0..1.0).contains(&width) {
            Ok(Self(width))
        }
        else {
            Err(InputShaperError::InvalidDeadband(width))
        }
    }

    /// The width of the deadband.
    pub fn width(self) -> f64 {
        self.0
    }
}

impl Default for Deadband {
    fn default() -> Self {
        Self(DEFAULT_DEADBAND)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Apply the deadband to a single raw axis reading.
///
/// Readings with a magnitude below the deadband give exactly `0.0`, others are
/// mapped from `[deadband, 1]` onto `[0, 1]` keeping their sign. `raw` is not
/// limited, readings outside `[-1, +1]` map outside `[-1, +1]`.
pub fn shape(raw: f64, deadband: Deadband) -> f64 {
    let magnitude = raw.abs();

    if magnitude < deadband.0 {
        return 0.0
    }

    lin_map((deadband.0, 1.0), (0.0, 1.0), magnitude).copysign(raw)
}

/// Square a shaped value keeping its sign, giving finer control at low
/// speeds.
pub fn square(value: f64) -> f64 {
    value * value.abs()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-12;

    fn db(width: f64) -> Deadband {
        Deadband::new(width).unwrap()
    }

    #[test]
    fn test_deadband_validation() {
        assert!(Deadband::new(0.0).is_ok());
        assert!(Deadband::new(0.99).is_ok());
        assert!(matches!(
            Deadband::new(1.0),
            Err(InputShaperError::InvalidDeadband(w)) if w == 1.0
        ));
        assert!(Deadband::new(-0.1).is_err());
        assert!(Deadband::new(f64::NAN).is_err());
        assert!(Deadband::new(1.5).is_err());
        assert_eq!(Deadband::default().width(), 0.1);
    }

    #[test]
    fn test_shape_suppresses_inside_deadband() {
        let d = db(0.1);

        for raw in &[0.0, 0.05, -0.05, 0.0999, -0.0999] {
            assert_eq!(shape(*raw, d), 0.0);
        }

        assert_eq!(shape(0.0, db(0.0)), 0.0);
        assert_eq!(shape(0.0, db(0.5)), 0.0);
    }

    #[test]
    fn test_shape_boundary_values() {
        let d = db(0.1);

        assert_eq!(shape(1.0, d), 1.0);
        assert_eq!(shape(-1.0, d), -1.0);
        assert_eq!(shape(0.1, d), 0.0);
        assert!((shape(0.55, d) - 0.5).abs() < EPS);
        assert!((shape(-0.55, d) + 0.5).abs() < EPS);
    }

    #[test]
    fn test_shape_sign_and_magnitude() {
        let d = db(0.1);

        for i in 10..100 {
            let raw = i as f64 / 100.0;
            let pos = shape(raw, d);
            let neg = shape(-raw, d);

            // Odd function
            assert_eq!(pos, -neg);

            // Sign is kept for non-zero output
            assert!(pos >= 0.0);

            // Output never larger than input, strictly smaller inside (0, 1)
            assert!(pos < raw);
        }

        // With no deadband shaping is the identity
        assert_eq!(shape(0.37, db(0.0)), 0.37);
    }

    #[test]
    fn test_shape_continuous_at_deadband() {
        let d = db(0.2);

        assert!(shape(0.2 + 1e-9, d) < 1e-8);
        assert_eq!(shape(0.2 - 1e-9, d), 0.0);
    }

    #[test]
    fn test_square() {
        assert_eq!(square(0.5), 0.25);
        assert_eq!(square(-0.5), -0.25);
        assert_eq!(square(1.0), 1.0);
        assert_eq!(square(0.0), 0.0);
    }
}
