//! # Gamepad input
//!
//! Reads operator commands from the first connected gamepad. The sticks are sampled every cycle,
//! Start toggles the drive mode and Select resets the encoders.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use log::{info, warn};

use comms_if::tc::{ControllerAxes, Tc};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct GamepadInput {
    gilrs: Gilrs,
    active: Option<GamepadId>,
}

/// Result of polling the gamepad once.
#[derive(Debug, Default)]
pub struct GamepadPoll {
    /// A gamepad is connected and being used.
    pub connected: bool,

    /// Commands produced since the last poll, in order.
    pub tcs: Vec<Tc>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GamepadError {
    #[error("Could not initialise the gamepad interface: {0}")]
    InitError(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GamepadInput {
    pub fn new() -> Result<Self, GamepadError> {
        let gilrs = Gilrs::new().map_err(|e| GamepadError::InitError(e.to_string()))?;

        let active = gilrs.gamepads().next().map(|(id, gamepad)| {
            info!("Using gamepad {}: {}", id, gamepad.name());
            id
        });

        if active.is_none() {
            warn!("No gamepad connected, waiting for one");
        }

        Ok(Self { gilrs, active })
    }

    /// Drain pending gamepad events and sample the sticks.
    pub fn poll(&mut self) -> GamepadPoll {
        let mut tcs = Vec::new();

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected if self.active.is_none() => {
                    info!("Gamepad {} connected: {}", id, self.gilrs.gamepad(id).name());
                    self.active = Some(id);
                }
                EventType::Disconnected if self.active == Some(id) => {
                    warn!("Gamepad {} disconnected", id);
                    self.active = None;
                }
                EventType::ButtonPressed(button, _) if self.active == Some(id) => {
                    tcs.extend(button_tc(button))
                }
                _ => (),
            }
        }

        if let Some(id) = self.active {
            let gamepad = self.gilrs.gamepad(id);
            tcs.push(Tc::Axes(stick_axes(
                gamepad.value(Axis::LeftStickY),
                gamepad.value(Axis::RightStickY),
                gamepad.value(Axis::RightStickX),
            )));
        }

        GamepadPoll {
            connected: self.active.is_some(),
            tcs,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Command bound to a button press, if any.
fn button_tc(button: Button) -> Option<Tc> {
    match button {
        Button::Start => Some(Tc::ToggleDriveMode),
        Button::Select => Some(Tc::ResetEncoders),
        _ => None,
    }
}

/// Convert gilrs stick values into controller axes.
///
/// gilrs reports up as positive, the axes are forwards-negative.
fn stick_axes(left_y: f32, right_y: f32, right_x: f32) -> ControllerAxes {
    ControllerAxes::new(-left_y as f64, -right_y as f64, right_x as f64)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
