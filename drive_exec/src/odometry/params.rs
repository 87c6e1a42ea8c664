//! Parameters structure for Odometry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for odometry.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- GEOMETRY ----

    /// Diameter of the drive wheels. All odometry outputs use the units of
    /// this value.
    pub wheel_diameter: f64,

    /// Encoder pulses per motor shaft revolution, after decoding.
    pub pulses_per_revolution: f64,

    /// Motor revolutions per wheel revolution.
    pub gear_ratio: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            wheel_diameter: 6.0,
            pulses_per_revolution: 80.0,
            gear_ratio: 10.71,
        }
    }
}
