//! Wand Fleet - Controller fleet management
//!
//! This crate owns the hard part of the service: reconciling the set of
//! physically attached controllers against a fixed pool of logical slots,
//! polling every open controller for fresh sensor data, and turning new
//! samples into globally sequenced data frames.
//!
//! - [`SlotPool`] holds the N pre-allocated controller handles; the slot
//!   index is the externally visible logical id
//! - [`FleetManager`] drives the two time-gated passes (poll and rescan)
//!   from a single thread and owns the startup/update/shutdown lifecycle
//! - [`FleetEvent`] reports connects, disconnects, and identity churn
//! - [`FleetConfig`] is the persisted scheduling configuration

pub mod config;
pub mod events;
pub mod handle;
pub mod manager;
pub mod pool;

pub use config::{ConfigError, FleetConfig};
pub use events::FleetEvent;
pub use handle::ControllerHandle;
pub use manager::{ControllerStatus, FleetManager};
pub use pool::{SlotPool, MAX_CONTROLLERS};
