//! # Telecommand processor module
//!
//! The telecommand processor handles TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};

// Internal
use comms_if::tc::Tc;
use crate::data_store::{DataStore, SafeModeCause};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules.
pub fn exec(ds: &mut DataStore, tc: &Tc) {

    // Handle different Tcs
    match tc {
        Tc::Axes(axes) => {
            trace!("Recieved axes: {:?}", axes);
            ds.axes = *axes;
        },
        Tc::ToggleDriveMode => {
            debug!("Recieved ToggleDriveMode command");
            ds.mode_ctrl.toggle();
        },
        Tc::ResetEncoders => {
            debug!("Recieved ResetEncoders command");
            ds.encoder_reset_pending = true;
        },
        Tc::MakeSafe => {
            debug!("Recieved MakeSafe command");
            ds.make_safe(SafeModeCause::MakeSafeTc);
        },
        Tc::MakeUnsafe => {
            debug!("Recieved MakeUnsafe command");
            if ds.make_unsafe(SafeModeCause::MakeSafeTc).is_err() {
                warn!("Safe mode still held by {:?}", ds.safe_causes);
            }
        }
    }

}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
