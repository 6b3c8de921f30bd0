//! Controller identity and sensor sample types

use serde::{Deserialize, Serialize};

/// Logical controller ID. Equals the index of the slot that currently owns
/// the controller, so it is stable only between reconciliation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(pub u8);

impl ControllerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Buttons of a motion controller, each with a fixed bit index in the
/// published bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Triangle = 0,
    Circle = 1,
    Cross = 2,
    Square = 3,
    Select = 4,
    Start = 5,
    Ps = 6,
    Move = 7,
}

impl Button {
    pub const COUNT: usize = 8;

    pub const ALL: [Button; Button::COUNT] = [
        Button::Triangle,
        Button::Circle,
        Button::Cross,
        Button::Square,
        Button::Select,
        Button::Start,
        Button::Ps,
        Button::Move,
    ];

    /// Bit for this button in the frame bitmask
    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Per-button pressed states of one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState([bool; Button::COUNT]);

impl ButtonState {
    pub fn set(&mut self, button: Button, down: bool) {
        self.0[button as usize] = down;
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.0[button as usize]
    }

    /// Assemble the frame bitmask, one bit per pressed button
    pub fn bitmask(&self) -> u32 {
        Button::ALL
            .iter()
            .filter(|b| self.is_down(**b))
            .fold(0, |mask, b| mask | b.bit())
    }
}

/// Orientation quaternion (w, x, y, z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quat {
    fn default() -> Self {
        // Identity rotation
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// Position vector in the tracking space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Latest decoded sensor state of one controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerSample {
    pub orientation: Quat,
    pub position: Vec3,
    pub buttons: ButtonState,
    /// Trigger value, 0.0 (released) to 1.0 (fully pressed)
    pub trigger: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_bits_are_distinct() {
        let mut seen = 0u32;
        for button in Button::ALL {
            assert_eq!(seen & button.bit(), 0);
            seen |= button.bit();
        }
        assert_eq!(seen, 0xff);
    }

    #[test]
    fn test_bitmask_assembly() {
        let mut buttons = ButtonState::default();
        assert_eq!(buttons.bitmask(), 0);

        buttons.set(Button::Cross, true);
        buttons.set(Button::Move, true);
        assert_eq!(buttons.bitmask(), Button::Cross.bit() | Button::Move.bit());

        buttons.set(Button::Cross, false);
        assert_eq!(buttons.bitmask(), Button::Move.bit());
    }

    #[test]
    fn test_default_sample_is_identity_pose() {
        let sample = ControllerSample::default();
        assert_eq!(sample.orientation, Quat::default());
        assert_eq!(sample.orientation.w, 1.0);
        assert_eq!(sample.position, Vec3::default());
        assert_eq!(sample.buttons.bitmask(), 0);
        assert_eq!(sample.trigger, 0.0);
    }
}
