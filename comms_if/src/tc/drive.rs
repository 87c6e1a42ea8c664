//! # Drive telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Raw controller axis readings as reported by the gamepad hardware.
///
/// All values are nominally in the range [-1, +1]. The Y axes follow the hardware convention of
/// pushing the stick away from the operator giving a negative value.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerAxes {
    /// Left stick, vertical axis.
    pub left_y: f64,

    /// Right stick, vertical axis.
    pub right_y: f64,

    /// Right stick, horizontal axis. Positive to the right.
    pub right_x: f64,
}

impl ControllerAxes {
    pub const fn new(left_y: f64, right_y: f64, right_x: f64) -> Self {
        Self { left_y, right_y, right_x }
    }
}
