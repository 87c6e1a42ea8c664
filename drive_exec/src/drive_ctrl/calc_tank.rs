//! Tank drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::drive::MotorCommandPair;

use crate::input_shaper::ShapedInput;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Each side follows its own stick.
pub(super) fn calc_tank(input: &ShapedInput) -> MotorCommandPair {
    MotorCommandPair::new(input.tank_left, input.tank_right)
}
