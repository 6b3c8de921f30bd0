//! Transport trait and the types crossing the hardware boundary

use thiserror::Error;
use wand_core::ControllerSample;

#[derive(Error, Debug)]
pub enum HidError {
    #[error("failed to initialize HID subsystem: {0}")]
    Init(String),
    #[error("device enumeration failed: {0}")]
    Enumerate(String),
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },
}

/// Descriptor of one attached device, valid for the enumeration pass that
/// produced it. The path is the equality key across passes; enumeration
/// order may change between passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial: Option<String>,
}

/// Outcome of one non-blocking device read.
///
/// `Failure` means the transport link is gone. It is a normal, locally
/// handled outcome (the device gets closed), not an error to propagate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadResult {
    NoData,
    NewData(ControllerSample),
    Failure,
}

/// Raw device access the fleet manager is written against.
///
/// Every method must return promptly: the caller runs on a single thread
/// that also serves unrelated work, so a blocking `open` or `read` stalls
/// the whole service loop.
pub trait Transport {
    /// An open device handle, exclusively owned by one controller slot.
    type Device;

    /// Bring up the HID subsystem. Failure here is fatal at startup.
    fn initialize(&mut self) -> Result<(), HidError>;

    fn shutdown(&mut self);

    /// One full enumeration pass over currently attached devices.
    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>, HidError>;

    /// Open the device behind a descriptor in non-blocking mode.
    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<Self::Device, HidError>;

    fn close(&mut self, device: Self::Device);

    /// Poll the device for a pending input report without blocking.
    fn read(&mut self, device: &mut Self::Device) -> ReadResult;
}
