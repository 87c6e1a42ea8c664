//! Arcade drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::drive::MotorCommandPair;

use crate::input_shaper::ShapedInput;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Forward demand shared by both sides, turn demand added to the left and
/// taken from the right. A positive turn is to the right.
///
/// The result is not limited, see `super::limit`.
pub(super) fn calc_arcade(input: &ShapedInput) -> MotorCommandPair {
    MotorCommandPair::new(
        input.arcade_forward + input.arcade_turn,
        input.arcade_forward - input.arcade_turn
    )
}
