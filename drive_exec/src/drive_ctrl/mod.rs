//! Drive control module
//!
//! Mixes shaped operator inputs into normalised left/right motor demands.
//! Demands are saturated by clamping each side to [-1, +1] independently, so
//! a saturated arcade command does not keep the ratio between the two sides.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;
mod calc_arcade;
mod calc_tank;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::drive::{DriveMode, MotorCommandPair};
use util::maths::clamp;

use crate::input_shaper::ShapedInput;

// Internal
pub use state::*;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Mix the shaped inputs into a command pair for the given mode.
pub fn mix(mode: DriveMode, input: &ShapedInput) -> MotorCommandPair {
    limit(calc_raw(mode, input)).0
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Unlimited demands for the given mode.
fn calc_raw(mode: DriveMode, input: &ShapedInput) -> MotorCommandPair {
    match mode {
        DriveMode::Tank => calc_tank::calc_tank(input),
        DriveMode::Arcade => calc_arcade::calc_arcade(input),
    }
}

/// Clamp both sides to [-1, +1], returning which sides were changed.
fn limit(raw: MotorCommandPair) -> (MotorCommandPair, [bool; 2]) {
    let left = clamp(&raw.left, &-1.0, &1.0);
    let right = clamp(&raw.right, &-1.0, &1.0);

    (
        MotorCommandPair::new(left, right),
        [left != raw.left, right != raw.right]
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
