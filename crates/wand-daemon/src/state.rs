//! Shared application state for the web surface

use tokio::sync::{broadcast, mpsc, oneshot};
use wand_core::DataFrame;
use wand_fleet::{ControllerStatus, FleetEvent};

use crate::service::FleetCommand;

/// Shared by every HTTP handler and WebSocket session. All fleet access
/// goes through the command channel; the state never touches the slot
/// pool directly.
pub struct AppState {
    pub frames: broadcast::Sender<DataFrame>,
    pub events: broadcast::Sender<FleetEvent>,
    pub commands: mpsc::Sender<FleetCommand>,
}

impl AppState {
    /// Status snapshot fetched from the fleet thread. `None` when the
    /// fleet has shut down.
    pub async fn snapshot(&self) -> Option<Vec<ControllerStatus>> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(FleetCommand::Snapshot { reply })
            .await
            .ok()?;
        rx.await.ok()
    }

    pub async fn set_rumble(&self, id: u8, amount: f32) -> Option<bool> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(FleetCommand::SetRumble { id, amount, reply })
            .await
            .ok()?;
        rx.await.ok()
    }

    pub async fn reset_pose(&self, id: u8) -> Option<bool> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(FleetCommand::ResetPose { id, reply })
            .await
            .ok()?;
        rx.await.ok()
    }

    pub fn subscribe_frames(&self) -> broadcast::Receiver<DataFrame> {
        self.frames.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FleetEvent> {
        self.events.subscribe()
    }
}
