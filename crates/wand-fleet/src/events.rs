//! Fleet events for downstream consumers

use serde::Serialize;
use wand_core::ControllerId;

/// Reported fleet state changes. Everything here is informational or
/// locally recovered; none of it escalates past the fleet manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FleetEvent {
    /// A newly seen device was opened in this slot
    ControllerConnected { id: ControllerId },
    /// A newly seen device refused to open; its slot keeps the device
    /// reserved and the open is retried on a later pass
    ControllerOpenFailed { id: ControllerId, path: String },
    /// Enumeration order shifted and the device's logical id migrated.
    /// Consumers must tolerate this between passes, never within one.
    ControllerMoved { from: ControllerId, to: ControllerId },
    /// An open device was absent from a reconciliation pass
    ControllerVanished { id: ControllerId },
    /// An open device failed a poll read and was closed
    ControllerReadFailed { id: ControllerId },
    /// More devices attached than slots; the excess stays unmanaged
    /// until a slot frees
    CapacityExceeded,
}
