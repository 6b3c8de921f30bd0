//! Globally sequenced data frames and the publisher contract

use serde::{Deserialize, Serialize};

use crate::controller::{ControllerId, ControllerSample, Quat, Vec3};

/// One published sensor/button snapshot for one logical controller.
///
/// Sequence numbers are shared across the whole fleet, so downstream
/// consumers get a total order for drop detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    pub controller_id: ControllerId,
    pub sequence: u32,
    pub connected: bool,
    pub tracking_enabled: bool,
    pub tracking_active: bool,
    pub orientation: Quat,
    pub position: Vec3,
    /// One bit per pressed button, see [`crate::Button::bit`]
    pub buttons: u32,
    pub trigger: f32,
}

impl DataFrame {
    /// Build a frame from a controller's latest sample.
    ///
    /// `connected` is always true (only open controllers are polled) and
    /// there is no tracker integration, so `tracking_active` stays false.
    pub fn from_sample(id: ControllerId, sequence: u32, sample: &ControllerSample) -> Self {
        Self {
            controller_id: id,
            sequence,
            connected: true,
            tracking_enabled: true,
            tracking_active: false,
            orientation: sample.orientation,
            position: sample.position,
            buttons: sample.buttons.bitmask(),
            trigger: sample.trigger,
        }
    }
}

/// Sink for completed data frames. Publishing is fire-and-forget and must
/// not block the caller; delivery failures are invisible to the fleet.
pub trait FramePublisher {
    fn publish(&mut self, frame: DataFrame);
}

/// Collects frames in memory, for tests
impl FramePublisher for Vec<DataFrame> {
    fn publish(&mut self, frame: DataFrame) {
        self.push(frame);
    }
}
