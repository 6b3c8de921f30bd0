//! Input-report decoding for the supported motion controller

use wand_core::{Button, ButtonState, ControllerSample};

/// Report id of the standard input report
pub const INPUT_REPORT_ID: u8 = 0x01;

/// Shortest report that still carries buttons and trigger
pub const MIN_INPUT_REPORT_LEN: usize = 7;

/// Decode one raw input report into a sample.
///
/// Layout: byte 0 report id, bytes 1-3 button bitfields, byte 6 the analog
/// trigger (0-255). Orientation and position stay at the identity pose;
/// inertial fusion happens downstream of this service. Returns `None` for
/// reports that are too short or carry an unknown report id.
pub fn decode_input_report(data: &[u8]) -> Option<ControllerSample> {
    if data.len() < MIN_INPUT_REPORT_LEN || data[0] != INPUT_REPORT_ID {
        return None;
    }

    let mut buttons = ButtonState::default();
    buttons.set(Button::Select, data[1] & 0x01 != 0);
    buttons.set(Button::Start, data[1] & 0x08 != 0);
    buttons.set(Button::Triangle, data[2] & 0x10 != 0);
    buttons.set(Button::Circle, data[2] & 0x20 != 0);
    buttons.set(Button::Cross, data[2] & 0x40 != 0);
    buttons.set(Button::Square, data[2] & 0x80 != 0);
    buttons.set(Button::Ps, data[3] & 0x01 != 0);
    buttons.set(Button::Move, data[3] & 0x40 != 0);

    let mut sample = ControllerSample::default();
    sample.buttons = buttons;
    sample.trigger = data[6] as f32 / 255.0;
    Some(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_buttons_and_trigger() {
        // Select + Start, Cross + Square, Move, trigger at full scale
        let data = [INPUT_REPORT_ID, 0x09, 0xc0, 0x40, 0x00, 0x00, 0xff];
        let sample = decode_input_report(&data).unwrap();

        assert!(sample.buttons.is_down(Button::Select));
        assert!(sample.buttons.is_down(Button::Start));
        assert!(sample.buttons.is_down(Button::Cross));
        assert!(sample.buttons.is_down(Button::Square));
        assert!(sample.buttons.is_down(Button::Move));
        assert!(!sample.buttons.is_down(Button::Triangle));
        assert!(!sample.buttons.is_down(Button::Circle));
        assert!(!sample.buttons.is_down(Button::Ps));
        assert_eq!(sample.trigger, 1.0);
    }

    #[test]
    fn test_decode_idle_report() {
        let data = [INPUT_REPORT_ID, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let sample = decode_input_report(&data).unwrap();
        assert_eq!(sample.buttons.bitmask(), 0);
        assert_eq!(sample.trigger, 0.0);
    }

    #[test]
    fn test_reject_short_report() {
        assert!(decode_input_report(&[INPUT_REPORT_ID, 0x00, 0x00]).is_none());
    }

    #[test]
    fn test_reject_unknown_report_id() {
        let data = [0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(decode_input_report(&data).is_none());
    }
}
