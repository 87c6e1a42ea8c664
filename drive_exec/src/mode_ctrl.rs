//! # Drive mode controller
//!
//! Owns the current drive mode. The executive reads the mode once per cycle,
//! toggles requested by the operator take effect from the next read.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use comms_if::eqpt::drive::DriveMode;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct ModeCtrl {
    mode: DriveMode,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ModeCtrl {
    pub fn new(initial_mode: DriveMode) -> Self {
        info!("Initial drive mode: {}", initial_mode);
        Self { mode: initial_mode }
    }

    pub fn current_mode(&self) -> DriveMode {
        self.mode
    }

    /// Switch to the other mode, returning the new mode.
    pub fn toggle(&mut self) -> DriveMode {
        self.mode = self.mode.toggled();
        info!("Drive mode: {}", self.mode);
        self.mode
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut mc = ModeCtrl::new(DriveMode::Arcade);
        assert_eq!(mc.current_mode(), DriveMode::Arcade);

        assert_eq!(mc.toggle(), DriveMode::Tank);
        assert_eq!(mc.current_mode(), DriveMode::Tank);

        mc.toggle();
        assert_eq!(mc.current_mode(), DriveMode::Arcade);
    }
}
