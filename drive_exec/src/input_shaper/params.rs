//! Parameters structure for InputShaper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for input shaping.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Width of the dead zone around the centre of each axis.
    ///
    /// Must be in the range [0, 1).
    pub deadband: f64,

    /// Square the shaped values (keeping sign) for finer low speed control.
    #[serde(default)]
    pub square_inputs: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            deadband: super::DEFAULT_DEADBAND,
            square_inputs: false,
        }
    }
}
