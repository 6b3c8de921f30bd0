//! hidapi-backed transport implementation

use std::ffi::CString;

use hidapi::{HidApi, HidDevice};
use tracing::{debug, warn};

use crate::report;
use crate::transport::{DeviceDescriptor, HidError, ReadResult, Transport};

/// Vendor id of the supported motion controllers
pub const WAND_VENDOR_ID: u16 = 0x054c;
/// Product id of the supported motion controllers
pub const WAND_PRODUCT_ID: u16 = 0x03d5;

/// Transport over hidapi. Devices are opened in non-blocking mode so
/// `read` returns immediately when no input report is pending.
#[derive(Default)]
pub struct HidTransport {
    api: Option<HidApi>,
}

impl HidTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HidTransport {
    type Device = HidDevice;

    fn initialize(&mut self) -> Result<(), HidError> {
        let api = HidApi::new().map_err(|e| HidError::Init(e.to_string()))?;
        self.api = Some(api);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.api = None;
    }

    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>, HidError> {
        let api = self
            .api
            .as_mut()
            .ok_or_else(|| HidError::Enumerate("HID subsystem not initialized".into()))?;

        api.refresh_devices()
            .map_err(|e| HidError::Enumerate(e.to_string()))?;

        let descriptors = api
            .device_list()
            .filter(|info| {
                info.vendor_id() == WAND_VENDOR_ID && info.product_id() == WAND_PRODUCT_ID
            })
            .map(|info| DeviceDescriptor {
                path: info.path().to_string_lossy().into_owned(),
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                serial: info.serial_number().map(str::to_owned),
            })
            .collect();

        Ok(descriptors)
    }

    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<HidDevice, HidError> {
        let api = self.api.as_ref().ok_or_else(|| HidError::Open {
            path: descriptor.path.clone(),
            reason: "HID subsystem not initialized".into(),
        })?;

        let path = CString::new(descriptor.path.as_bytes()).map_err(|_| HidError::Open {
            path: descriptor.path.clone(),
            reason: "device path contains an interior NUL".into(),
        })?;

        let device = api.open_path(&path).map_err(|e| HidError::Open {
            path: descriptor.path.clone(),
            reason: e.to_string(),
        })?;

        device.set_blocking_mode(false).map_err(|e| HidError::Open {
            path: descriptor.path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %descriptor.path, "Opened HID device");
        Ok(device)
    }

    fn close(&mut self, device: HidDevice) {
        drop(device);
    }

    fn read(&mut self, device: &mut HidDevice) -> ReadResult {
        let mut buf = [0u8; 64];
        match device.read(&mut buf) {
            Ok(0) => ReadResult::NoData,
            Ok(len) => match report::decode_input_report(&buf[..len]) {
                Some(sample) => ReadResult::NewData(sample),
                None => {
                    debug!(len, "Discarding undecodable input report");
                    ReadResult::NoData
                }
            },
            Err(e) => {
                warn!(error = %e, "HID read failed");
                ReadResult::Failure
            }
        }
    }
}
